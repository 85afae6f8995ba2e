//! Extensions shipped with the default registry.

use unicode_normalization::UnicodeNormalization;

use crate::registry::{ExtensionError, ExtensionRegistry};

pub(crate) fn register(registry: &mut ExtensionRegistry) {
    registry.register_transform("text.digits_only", digits_only);
    registry.register_transform("text.collapse_ws", collapse_ws);
    registry.register_transform("text.ascii_fold", ascii_fold);
    registry.register_validator("checks.is_numeric", is_numeric);
    registry.register_validator("checks.iban", iban);
    registry.register_validator("checks.bic", bic);
}

/// Keeps ASCII digits only.
pub fn digits_only(value: &str) -> Result<String, ExtensionError> {
    Ok(value.chars().filter(char::is_ascii_digit).collect())
}

/// Collapses whitespace runs to a single space and trims.
pub fn collapse_ws(value: &str) -> Result<String, ExtensionError> {
    Ok(value.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Decomposes (NFKD) and drops everything outside ASCII.
pub fn ascii_fold(value: &str) -> Result<String, ExtensionError> {
    Ok(value.nfkd().filter(char::is_ascii).collect())
}

/// True when the trimmed value parses as a finite number.
pub fn is_numeric(value: &str) -> Result<bool, ExtensionError> {
    Ok(value
        .trim()
        .parse::<f64>()
        .is_ok_and(f64::is_finite))
}

/// ISO 13616 check digits (mod 97). Spaces are ignored.
///
/// A value without the basic IBAN shape is an error rather than a failed
/// check.
pub fn iban(value: &str) -> Result<bool, ExtensionError> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let bytes = compact.as_bytes();
    let well_formed = (15..=34).contains(&bytes.len())
        && bytes.iter().all(u8::is_ascii_alphanumeric)
        && bytes[..2].iter().all(u8::is_ascii_alphabetic)
        && bytes[2..4].iter().all(u8::is_ascii_digit);
    if !well_formed {
        return Err(ExtensionError::new(format!("malformed IBAN '{}'", value.trim())));
    }
    let rearranged = compact[4..].chars().chain(compact[..4].chars());
    let mut remainder: u32 = 0;
    for c in rearranged {
        let digit = c
            .to_digit(36)
            .ok_or_else(|| ExtensionError::new(format!("malformed IBAN '{}'", value.trim())))?;
        remainder = if digit >= 10 {
            (remainder * 100 + digit) % 97
        } else {
            (remainder * 10 + digit) % 97
        };
    }
    Ok(remainder == 1)
}

/// SWIFT/BIC shape: 4 letters bank, 2 letters country, 2 alphanumeric
/// location, optional 3 alphanumeric branch.
pub fn bic(value: &str) -> Result<bool, ExtensionError> {
    let bytes = value.trim().as_bytes();
    if bytes.len() != 8 && bytes.len() != 11 {
        return Ok(false);
    }
    Ok(bytes[..6].iter().all(u8::is_ascii_uppercase)
        && bytes[6..].iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()))
}
