//! The captured run instant and identity.

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::naming::TokenSet;
use crate::target::ObjectVariant;

/// Resolves an IANA zone name, falling back to UTC.
pub fn resolve_timezone(name: &str) -> Tz {
    match name.trim().parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            warn!(tz = %name, "unknown timezone, using UTC");
            Tz::UTC
        }
    }
}

/// Renders a timestamp as ISO-8601 with second precision and offset.
pub fn iso_timestamp(at: &DateTime<Tz>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Identity and clock of one pipeline run.
///
/// The start instant is captured once; every name, run id and timestamp
/// derived from it agrees.
#[derive(Debug, Clone)]
pub struct RunContext {
    target: ObjectVariant,
    tz: Tz,
    started: DateTime<Tz>,
}

impl RunContext {
    /// Captures the current instant in the named timezone.
    pub fn new(target: ObjectVariant, tz_name: &str) -> Self {
        Self::at(target, resolve_timezone(tz_name), Utc::now())
    }

    pub fn at(target: ObjectVariant, tz: Tz, instant: DateTime<Utc>) -> Self {
        Self {
            target,
            tz,
            started: instant.with_timezone(&tz),
        }
    }

    pub fn target(&self) -> &ObjectVariant {
        &self.target
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn started(&self) -> &DateTime<Tz> {
        &self.started
    }

    /// Current wall-clock time in the run timezone.
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    pub fn label(&self) -> String {
        self.target.label()
    }

    /// `%Y%m%d_%H%M_<label_lower>`.
    pub fn run_id(&self) -> String {
        format!(
            "{}_{}",
            self.started.format("%Y%m%d_%H%M"),
            self.label().to_lowercase()
        )
    }

    /// Identity tokens only; used where output must not depend on time.
    pub fn identity_tokens(&self) -> TokenSet {
        TokenSet::identity(&self.target)
    }

    /// Identity plus timestamp tokens.
    pub fn tokens(&self) -> TokenSet {
        self.identity_tokens().with_timestamps(&self.started)
    }
}
