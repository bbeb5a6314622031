//! Error types for KIRJURI field suppliers

use thiserror::Error;

/// Error type for field-supplier operations
///
/// This is the standard error type returned by [`FieldSupplier`]
/// implementations, both built-in and discovered. The assembler recovers
/// from every variant: a failing supplier is recorded in the output record
/// and the remaining suppliers still run.
///
/// [`FieldSupplier`]: crate::FieldSupplier
///
/// # Example
///
/// ```
/// use kirjuri_core::SupplyError;
///
/// fn load_host_name() -> Result<String, SupplyError> {
///     Err(SupplyError::Unavailable)
/// }
///
/// match load_host_name() {
///     Ok(host) => println!("host: {}", host),
///     Err(SupplyError::Unavailable) => println!("not ready yet"),
///     Err(e) => println!("other error: {}", e),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SupplyError {
    /// Construction failed
    ///
    /// Returned by a supplier constructor, typically for a discovered plugin
    /// with invalid configuration. The registry excludes the supplier and
    /// continues startup.
    #[error("initialization failed: {0}")]
    Init(String),

    /// Field supply failed
    ///
    /// Returned when a supplier cannot produce its fields for one event.
    /// Examples: missing context value it requires, a conversion error.
    #[error("supply failed: {0}")]
    Supply(String),

    /// Supplier not ready
    ///
    /// A transient state: the supplier exists but cannot serve yet.
    #[error("supplier not ready")]
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supply_error_init_display() {
        let err = SupplyError::Init("bad config".to_string());
        assert_eq!(err.to_string(), "initialization failed: bad config");
    }

    #[test]
    fn test_supply_error_supply_display() {
        let err = SupplyError::Supply("no tenant".to_string());
        assert_eq!(err.to_string(), "supply failed: no tenant");
    }

    #[test]
    fn test_supply_error_unavailable_display() {
        assert_eq!(SupplyError::Unavailable.to_string(), "supplier not ready");
    }

    #[test]
    fn test_supply_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SupplyError>();
    }
}
