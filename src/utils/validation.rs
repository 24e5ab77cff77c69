use crate::utils::error::{EtlError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(EtlError::Validation {
            field: field_name.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::Validation {
            field: field_name.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(EtlError::Validation {
            field: field_name.to_string(),
            reason: format!("Value {} must be between {} and {}", value, min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("rooms", "data/rooms.json").is_ok());
        assert!(validate_path("rooms", "").is_err());
        assert!(validate_path("rooms", "   ").is_err());
        assert!(validate_path("rooms", "bad\0path.json").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("output.indent", 4, 0, 16).is_ok());
        assert!(validate_range("output.indent", 0, 0, 16).is_ok());
        assert!(validate_range("output.indent", 17, 0, 16).is_err());
    }
}
