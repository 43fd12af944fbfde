//! Frame and argument validation rules.

use securenet_core::error::AppError;

/// Rejects frames that are empty or larger than `max_bytes`.
pub fn validate_frame(raw: &str, max_bytes: usize) -> Result<(), AppError> {
    if raw.len() > max_bytes {
        return Err(AppError::validation(format!(
            "Message exceeds maximum size of {max_bytes} bytes"
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty message"));
    }

    Ok(())
}

/// Whether a device name or blacklist item is blank.
///
/// Whitespace-only values count as blank.
///
/// Blank arguments make the operation a local no-op; the store is never
/// contacted for them.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_frame_limits() {
        assert!(validate_frame(r#"{"type":"RequestInitialData"}"#, 64).is_ok());
        assert!(validate_frame("   ", 64).is_err());
        assert!(validate_frame(&"x".repeat(65), 64).is_err());
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \t"));
        assert!(!is_blank("PC1"));
    }
}
