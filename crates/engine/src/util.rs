//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Trim a required name, rejecting blank input.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Usernames are compared in NFC form so visually identical names collide.
pub(crate) fn normalize_username(value: &str) -> ResultEngine<String> {
    let username: String = normalize_required_name(value, "user")?.nfc().collect();
    Ok(username)
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(
            normalize_required_name("   ", "goal"),
            Err(EngineError::InvalidName("goal name must not be empty".to_string()))
        );
        assert_eq!(normalize_required_name("  Car ", "goal").unwrap(), "Car");
    }

    #[test]
    fn usernames_are_nfc() {
        let decomposed = "Jose\u{301}";
        assert_eq!(normalize_username(decomposed).unwrap(), "Jos\u{e9}");
    }

    #[test]
    fn empty_descriptions_become_none() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(
            normalize_optional_text(Some(" rent ")),
            Some("rent".to_string())
        );
        assert_eq!(normalize_optional_text(None), None);
    }
}
