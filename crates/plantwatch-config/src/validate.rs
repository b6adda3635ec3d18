//! Validation helpers for client configuration values.

use url::Url;

use crate::defaults::MAX_PAGE_SIZE;
use crate::error::{ConfigError, ConfigResult};

pub(crate) fn validate_api_url(value: &str) -> ConfigResult<()> {
    let url = Url::parse(value).map_err(|_| ConfigError::invalid("api_url", value, "not a URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            "api_url",
            value,
            "scheme must be http or https",
        ));
    }
    Ok(())
}

pub(crate) fn validate_storage_prefix(value: &str) -> ConfigResult<()> {
    if value.is_empty() {
        return Err(ConfigError::invalid("storage_prefix", value, "must not be empty"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::invalid(
            "storage_prefix",
            value,
            "must not contain whitespace",
        ));
    }
    Ok(())
}

pub(crate) fn validate_positive(field: &'static str, value: u64) -> ConfigResult<()> {
    if value == 0 {
        return Err(ConfigError::invalid(field, value.to_string(), "must be positive"));
    }
    Ok(())
}

pub(crate) fn validate_page_size(field: &'static str, value: u32) -> ConfigResult<()> {
    if value == 0 || value > MAX_PAGE_SIZE {
        return Err(ConfigError::invalid(
            field,
            value.to_string(),
            "must be between 1 and 1000",
        ));
    }
    Ok(())
}

pub(crate) fn validate_message(value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            field: "session_expired_message",
            value: None,
            reason: "must not be blank",
        });
    }
    Ok(())
}

pub(crate) fn parse_number<T: std::str::FromStr>(field: &'static str, raw: &str) -> ConfigResult<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::invalid(field, raw, "must be a number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_requires_http_scheme() {
        assert!(validate_api_url("https://api.example.com").is_ok());
        assert!(validate_api_url("ftp://api.example.com").is_err());
        assert!(validate_api_url("not a url").is_err());
    }

    #[test]
    fn storage_prefix_rejects_blank_and_whitespace() {
        assert!(validate_storage_prefix("app_").is_ok());
        assert!(validate_storage_prefix("").is_err());
        assert!(validate_storage_prefix("my app").is_err());
    }

    #[test]
    fn page_size_bounds_are_enforced() {
        assert!(validate_page_size("default_page_size", 1).is_ok());
        assert!(validate_page_size("default_page_size", 1_000).is_ok());
        assert!(validate_page_size("default_page_size", 0).is_err());
        assert!(validate_page_size("default_page_size", 1_001).is_err());
    }

    #[test]
    fn parse_number_reports_field() {
        let err = parse_number::<u32>("default_page_size", "ten").unwrap_err();
        match err {
            ConfigError::InvalidField { field, value, .. } => {
                assert_eq!(field, "default_page_size");
                assert_eq!(value.as_deref(), Some("ten"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
