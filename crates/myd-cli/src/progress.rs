//! Console progress lines.

/// Prints `[✓] step – info` lines unless quiet.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    quiet: bool,
}

impl Progress {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn is_quiet(self) -> bool {
        self.quiet
    }

    pub fn step(self, name: &str, info: &str) {
        if !self.quiet {
            println!("{}", format_step(name, true, info));
        }
    }

    pub fn warn(self, message: &str) {
        if !self.quiet {
            println!("[!] {message}");
        }
    }
}

pub fn format_step(name: &str, ok: bool, info: &str) -> String {
    let symbol = if ok { "✓" } else { "✗" };
    if info.is_empty() {
        format!("[{symbol}] {name}")
    } else {
        format!("[{symbol}] {name} – {info}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_format() {
        assert_eq!(format_step("Rows loaded", true, "12"), "[✓] Rows loaded – 12");
        assert_eq!(format_step("Transforms", false, ""), "[✗] Transforms");
    }
}
