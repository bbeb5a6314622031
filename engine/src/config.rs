//! Engine configuration
//!
//! Read once at startup and treated as immutable afterwards. The sensitive
//! field toggles default to off, so a missing configuration is the
//! privacy-safe one.

use crate::error::EngineError;
use kirjuri_core::Severity;
use serde::Deserialize;

/// Well-known name of the verbosity-override request header
pub const DEFAULT_OVERRIDE_HEADER: &str = "x-verbosity-token";

/// Engine configuration surface
///
/// # Example (TOML)
///
/// ```toml
/// override_header = "x-verbosity-token"
/// static_threshold = "INFO"
/// include_remote_user = false
/// include_referer = false
/// include_ssl = false
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Name of the request header carrying the signed override token
    pub override_header: String,
    /// Statically configured severity threshold the filter defers to
    pub static_threshold: Severity,
    /// Include the authenticated remote user in records
    pub include_remote_user: bool,
    /// Include the referer header in records
    pub include_referer: bool,
    /// Include TLS connection details in records
    pub include_ssl: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            override_header: DEFAULT_OVERRIDE_HEADER.to_string(),
            static_threshold: Severity::Info,
            include_remote_user: false,
            include_referer: false,
            include_ssl: false,
        }
    }
}

impl Config {
    /// Parse a TOML document; absent keys take their defaults
    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Load from `KIRJURI_*` environment variables; absent take defaults
    ///
    /// Recognized: `KIRJURI_OVERRIDE_HEADER`, `KIRJURI_STATIC_THRESHOLD`,
    /// `KIRJURI_INCLUDE_REMOTE_USER`, `KIRJURI_INCLUDE_REFERER`,
    /// `KIRJURI_INCLUDE_SSL`.
    pub fn from_env() -> Result<Self, EngineError> {
        let mut config = Self::default();
        if let Ok(header) = std::env::var("KIRJURI_OVERRIDE_HEADER") {
            config.override_header = header;
        }
        if let Ok(threshold) = std::env::var("KIRJURI_STATIC_THRESHOLD") {
            config.static_threshold = threshold
                .parse()
                .map_err(|e: kirjuri_core::ParseSeverityError| EngineError::Config(e.to_string()))?;
        }
        config.include_remote_user = env_flag("KIRJURI_INCLUDE_REMOTE_USER")?;
        config.include_referer = env_flag("KIRJURI_INCLUDE_REFERER")?;
        config.include_ssl = env_flag("KIRJURI_INCLUDE_SSL")?;
        Ok(config)
    }
}

/// Parse a boolean environment flag; absent means false
fn env_flag(name: &str) -> Result<bool, EngineError> {
    match std::env::var(name) {
        Ok(v) => match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => Err(EngineError::Config(format!(
                "{}: expected a boolean, got '{}'",
                name, other
            ))),
        },
        Err(_) => Ok(false),
    }
}
