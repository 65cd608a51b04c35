//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates a `#rrggbb` color string.
///
/// # Examples
///
/// ```ignore
/// validate_hex_color("#1a2b3c") // Ok
/// validate_hex_color("1a2b3c")  // Err - missing '#'
/// validate_hex_color("#1a2b3")  // Err - too short
/// ```
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let Some(digits) = color.strip_prefix('#') else {
        let mut err = ValidationError::new("color_prefix");
        err.message = Some("Color must start with '#'".into());
        return Err(err);
    };

    if digits.len() != 6 {
        let mut err = ValidationError::new("color_length");
        err.message =
            Some(format!("Color must have exactly 6 hex digits (got {})", digits.len()).into());
        return Err(err);
    }

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        let mut err = ValidationError::new("color_format");
        err.message = Some("Color must contain only hexadecimal digits".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_hex_color_valid() {
        assert!(validate_hex_color("#000000").is_ok());
        assert!(validate_hex_color("#A1b2C3").is_ok());
    }

    #[test]
    fn test_validate_hex_color_invalid() {
        assert!(validate_hex_color("a1b2c3").is_err()); // no prefix
        assert!(validate_hex_color("#a1b2c").is_err()); // too short
        assert!(validate_hex_color("#a1b2c3d").is_err()); // too long
        assert!(validate_hex_color("#a1b2cg").is_err()); // invalid hex
    }
}
