//! Input validation helpers
//!
//! Centralized limits and validation functions for handler payloads.
//! SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;

// ── Limits ──────────────────────────────────────────────────────────

/// Entity names: competition names etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes on scoring events
pub const MAX_NOTE_LEN: usize = 500;

/// Upper bound on kicks/goals per logged event (sanity cap, not policy)
pub const MAX_KICKS_PER_EVENT: i64 = 1000;

/// Upper bound on refunded tickets per call
pub const MAX_REFUND_COUNT: i64 = 100;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        if v.len() > max_len {
            return Err(AppError::validation(format!(
                "{field} is too long ({} chars, max {max_len})",
                v.len()
            )));
        }
    }
    Ok(())
}

/// Validate a kick/goal count is non-negative and within the sanity cap.
///
/// `goals > kicks_used` is deliberately NOT rejected here: the engine
/// accepts it as a documented policy choice.
pub fn validate_count(value: i64, field: &str) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > MAX_KICKS_PER_EVENT {
        return Err(AppError::validation(format!(
            "{field} is implausibly large ({value}, max {MAX_KICKS_PER_EVENT})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_blank() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Friday Shootout", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn count_bounds() {
        assert!(validate_count(-1, "goals").is_err());
        assert!(validate_count(0, "goals").is_ok());
        assert!(validate_count(MAX_KICKS_PER_EVENT + 1, "kicks_used").is_err());
    }
}
