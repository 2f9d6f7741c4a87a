use crate::utils::error::{CartError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CartError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 檢查 store / language id 這類的非負整數
pub fn validate_id(field_name: &str, value: &str) -> Result<i64> {
    match value.trim().parse::<i64>() {
        Ok(id) if id >= 0 => Ok(id),
        _ => Err(CartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a non-negative integer".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("HTTP_SERVER", "https://shop.example.com/").is_ok());
        assert!(validate_url("HTTP_SERVER", "http://localhost/").is_ok());
        assert!(validate_url("HTTP_SERVER", "").is_err());
        assert!(validate_url("HTTP_SERVER", "shop.example.com").is_err());
        assert!(validate_url("HTTP_SERVER", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id("CLI_STORE_ID", "0").unwrap(), 0);
        assert_eq!(validate_id("CLI_LANGUAGE_ID", " 2 ").unwrap(), 2);
        assert!(validate_id("CLI_STORE_ID", "-1").is_err());
        assert!(validate_id("CLI_STORE_ID", "default").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("CLI_VERSION", "1.0.0").is_ok());
        assert!(validate_non_empty_string("CLI_VERSION", "   ").is_err());
    }
}
