//! Error types for the KIRJURI engine

use thiserror::Error;

// Re-export the supplier error type from kirjuri-core
pub use kirjuri_core::SupplyError;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for the KIRJURI engine
///
/// Supplier and verification failures are recovered internally and never
/// surface here; this type covers the startup path (configuration and
/// registry construction).
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Plugin error with the offending plugin named
    #[error("plugin '{plugin}' error: {message}")]
    Plugin {
        /// Name of the plugin that failed
        plugin: String,
        /// What went wrong
        message: String,
    },
}

impl EngineError {
    /// Wrap a supplier error with the plugin's name attached
    pub fn plugin(plugin: impl Into<String>, err: SupplyError) -> Self {
        EngineError::Plugin {
            plugin: plugin.into(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = EngineError::Config("unknown severity: loud".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: unknown severity: loud"
        );
    }

    #[test]
    fn test_plugin_error_display() {
        let err = EngineError::plugin("geo", SupplyError::Init("no database".to_string()));
        assert_eq!(
            err.to_string(),
            "plugin 'geo' error: initialization failed: no database"
        );
    }
}
