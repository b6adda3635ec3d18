#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
//! Client configuration shared by the Plantwatch browser and CLI surfaces.
//!
//! # Design
//! - Defaults first, then an optional JSON document, then `PLANTWATCH_*` env overrides.
//! - Validation runs once after all layers are applied.
//! - Env lookup is injectable so tests never touch the process environment.

pub mod defaults;
pub mod error;
mod validate;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::{ConfigError, ConfigResult};

use crate::defaults::{
    DEFAULT_API_URL, DEFAULT_OUTLOOK_PAGE_SIZE, DEFAULT_PAGE_SIZE, DEFAULT_SESSION_EXPIRED_MESSAGE,
    DEFAULT_STORAGE_MAX_CHARS, DEFAULT_STORAGE_PREFIX, DEFAULT_SUPER_ADMIN_LEVEL,
    DEFAULT_TIMEOUT_SECS,
};
use crate::validate::{
    parse_number, validate_api_url, validate_message, validate_page_size, validate_positive,
    validate_storage_prefix,
};

/// Environment variable pointing at an optional JSON configuration document.
pub const CONFIG_PATH_ENV: &str = "PLANTWATCH_CONFIG";

const ENV_API_URL: &str = "PLANTWATCH_API_URL";
const ENV_STORAGE_PREFIX: &str = "PLANTWATCH_STORAGE_PREFIX";
const ENV_STORAGE_MAX_CHARS: &str = "PLANTWATCH_STORAGE_MAX_CHARS";
const ENV_SUPER_ADMIN_LEVEL: &str = "PLANTWATCH_SUPER_ADMIN_LEVEL";
const ENV_PAGE_SIZE: &str = "PLANTWATCH_PAGE_SIZE";
const ENV_OUTLOOK_PAGE_SIZE: &str = "PLANTWATCH_OUTLOOK_PAGE_SIZE";
const ENV_TIMEOUT_SECS: &str = "PLANTWATCH_HTTP_TIMEOUT_SECS";
const ENV_SESSION_EXPIRED_MESSAGE: &str = "PLANTWATCH_SESSION_EXPIRED_MESSAGE";

/// Settings consumed by the state core, the REST clients, and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the maintenance REST API.
    pub api_url: String,
    /// Namespace prefix applied to persisted keys.
    pub storage_prefix: String,
    /// Largest serialized value the persistent store accepts.
    pub storage_max_chars: usize,
    /// Role level that identifies super administrators.
    pub super_admin_level: i32,
    /// Page size for entity listings.
    pub default_page_size: u32,
    /// Page size for the asset outlook table.
    pub outlook_page_size: u32,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Message shown once when the API answers 401.
    pub session_expired_message: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            storage_max_chars: DEFAULT_STORAGE_MAX_CHARS,
            super_admin_level: DEFAULT_SUPER_ADMIN_LEVEL,
            default_page_size: DEFAULT_PAGE_SIZE,
            outlook_page_size: DEFAULT_OUTLOOK_PAGE_SIZE,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_expired_message: DEFAULT_SESSION_EXPIRED_MESSAGE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from an optional document plus the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the document cannot be read or parsed, when an
    /// override is malformed, or when the merged configuration fails validation.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV).ok();
        let path = path.or_else(|| env_path.as_deref().map(Path::new));
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Load configuration using a caller-supplied environment lookup.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::load`].
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document; missing fields fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is not valid JSON or
    /// contains unknown fields.
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        serde_json::from_str(raw).map_err(|source| ConfigError::Parse { path: None, source })
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded configuration document");
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })
    }

    fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_API_URL) {
            self.api_url = value;
        }
        if let Some(value) = lookup(ENV_STORAGE_PREFIX) {
            self.storage_prefix = value;
        }
        if let Some(value) = lookup(ENV_STORAGE_MAX_CHARS) {
            self.storage_max_chars = parse_number("storage_max_chars", &value)?;
        }
        if let Some(value) = lookup(ENV_SUPER_ADMIN_LEVEL) {
            self.super_admin_level = parse_number("super_admin_level", &value)?;
        }
        if let Some(value) = lookup(ENV_PAGE_SIZE) {
            self.default_page_size = parse_number("default_page_size", &value)?;
        }
        if let Some(value) = lookup(ENV_OUTLOOK_PAGE_SIZE) {
            self.outlook_page_size = parse_number("outlook_page_size", &value)?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = parse_number("request_timeout_secs", &value)?;
        }
        if let Some(value) = lookup(ENV_SESSION_EXPIRED_MESSAGE) {
            self.session_expired_message = value;
        }
        Ok(())
    }

    /// Validate every field of the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] for the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_api_url(&self.api_url)?;
        validate_storage_prefix(&self.storage_prefix)?;
        validate_positive("storage_max_chars", self.storage_max_chars as u64)?;
        validate_page_size("default_page_size", self.default_page_size)?;
        validate_page_size("outlook_page_size", self.outlook_page_size)?;
        validate_positive("request_timeout_secs", self.request_timeout_secs)?;
        validate_message(&self.session_expired_message)
    }

    /// API base URL without a trailing slash.
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = ClientConfig::load_with(None, |_| None).expect("defaults validate");
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.storage_prefix, "app_");
        assert_eq!(config.storage_max_chars, 5_000_000);
    }

    #[test]
    fn env_overrides_apply_on_top_of_defaults() {
        let lookup = lookup_from(&[
            (ENV_API_URL, "https://maint.example.com/api/"),
            (ENV_SUPER_ADMIN_LEVEL, "7"),
            (ENV_PAGE_SIZE, "25"),
        ]);
        let config = ClientConfig::load_with(None, lookup).expect("overrides validate");
        assert_eq!(config.api_base(), "https://maint.example.com/api");
        assert_eq!(config.super_admin_level, 7);
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.outlook_page_size, DEFAULT_OUTLOOK_PAGE_SIZE);
    }

    #[test]
    fn malformed_override_is_rejected() {
        let lookup = lookup_from(&[(ENV_TIMEOUT_SECS, "soon")]);
        let err = ClientConfig::load_with(None, lookup).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "request_timeout_secs",
                ..
            }
        ));
    }

    #[test]
    fn document_fields_merge_with_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"{{"storage_prefix": "pw_", "outlook_page_size": 50}}"#)?;
        let config = ClientConfig::load_with(Some(file.path()), |_| None)?;
        assert_eq!(config.storage_prefix, "pw_");
        assert_eq!(config.outlook_page_size, 50);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        Ok(())
    }

    #[test]
    fn unknown_document_fields_fail_to_parse() {
        let err = ClientConfig::from_json_str(r#"{"colour": "blue"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: None, .. }));
    }

    #[test]
    fn missing_document_reports_io_error() {
        let err = ClientConfig::load_with(Some(Path::new("/nonexistent/plantwatch.json")), |_| {
            None
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn validation_catches_blank_message() {
        let config = ClientConfig {
            session_expired_message: "  ".into(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
