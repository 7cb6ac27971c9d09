use crate::utils::error::{Result, WordWolfError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(WordWolfError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(WordWolfError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(WordWolfError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(WordWolfError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| WordWolfError::MissingConfigError {
            field: field_name.to_string(),
        })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WordWolfError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
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
        return Err(WordWolfError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Checks `low <= high` for a pair of bounds reported under `field_name`.
pub fn validate_ordered<T: PartialOrd + std::fmt::Display>(
    field_name: &str,
    low: T,
    high: T,
) -> Result<()> {
    if low > high {
        return Err(WordWolfError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{}..{}", low, high),
            reason: "Lower bound must not exceed upper bound".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("model.base_url", "https://example.com").is_ok());
        assert!(validate_url("model.base_url", "http://127.0.0.1:9000").is_ok());
        assert!(validate_url("model.base_url", "").is_err());
        assert!(validate_url("model.base_url", "invalid-url").is_err());
        assert!(validate_url("model.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("history.capacity", 10, 1).is_ok());
        assert!(validate_positive_number("history.capacity", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range_and_order() {
        assert!(validate_range("minLevel", 1u8, 1, 5).is_ok());
        assert!(validate_range("minLevel", 0u8, 1, 5).is_err());
        assert!(validate_range("maxLevel", 6u8, 1, 5).is_err());
        assert!(validate_ordered("level", 2u8, 2).is_ok());
        assert!(validate_ordered("level", 4u8, 2).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("key".to_string());
        let absent: Option<String> = None;
        assert_eq!(validate_required_field("model.api_key", &present).unwrap(), "key");
        assert!(matches!(
            validate_required_field("model.api_key", &absent),
            Err(WordWolfError::MissingConfigError { .. })
        ));
    }
}
