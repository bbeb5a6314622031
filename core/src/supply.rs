//! FieldSupplier trait for KIRJURI plugins
//!
//! A [`FieldSupplier`] is the core extension point of the substrate: given
//! one event and the owning request's context, it contributes a mapping of
//! field names to values plus a position in the global ordering.
//!
//! ```text
//! LogEvent + RequestContext ──► supplier 1 ──► supplier 2 ──► ... ──► LogRecord
//!                               (ascending order(), last write wins)
//! ```
//!
//! Suppliers must be stateless or internally synchronized: the registry
//! holds each instance for the process lifetime and independent requests
//! call `supply` concurrently. A supplier must never perform blocking I/O -
//! it runs inline on every log event.

use crate::context::RequestContext;
use crate::error::SupplyError;
use crate::event::LogEvent;
use crate::record::Fields;

/// Fixed order bands for the global supplier ordering
///
/// Built-ins occupy the low bands so explicitly configured and discovered
/// suppliers sort after them by default and can override their fields.
pub mod order {
    /// Mandatory record fields (timestamp, level, logger, msg)
    pub const BASE: i32 = 0;
    /// Transport-level request fields
    pub const REQUEST: i32 = 100;
    /// Tenant and custom-tag fields
    pub const CONTEXT: i32 = 200;
    /// Default band for suppliers listed in configuration
    pub const CONFIGURED: i32 = 1_000;
    /// Default band for suppliers found through the plugin index
    pub const DISCOVERED: i32 = 2_000;
}

/// FieldSupplier trait - contributes named values to a log record
///
/// # Implementing a FieldSupplier
///
/// ```
/// use kirjuri_core::{FieldSupplier, Fields, LogEvent, RequestContext, SupplyError};
/// use serde_json::json;
///
/// struct HostSupplier {
///     host: String,
/// }
///
/// impl FieldSupplier for HostSupplier {
///     fn name(&self) -> &'static str {
///         "host"
///     }
///
///     fn order(&self) -> i32 {
///         kirjuri_core::order::CONFIGURED
///     }
///
///     fn supply(&self, _event: &LogEvent, _ctx: &RequestContext) -> Result<Fields, SupplyError> {
///         let mut fields = Fields::new();
///         fields.insert("host".to_string(), json!(self.host));
///         Ok(fields)
///     }
/// }
/// ```
pub trait FieldSupplier: Send + Sync {
    /// Unique name for this supplier (for ordering ties, diagnostics, and
    /// the `supplier_error` marker)
    fn name(&self) -> &'static str;

    /// Position in the global ordering; lower runs earlier
    ///
    /// Equal orders are broken by registration order, so a supplier that
    /// wants to override another's fields should either use a higher order
    /// or be registered after it.
    fn order(&self) -> i32;

    /// Produce this supplier's fields for one event
    ///
    /// # Errors
    ///
    /// Any [`SupplyError`] is recovered by the assembler: the failure is
    /// recorded in the output record and the remaining suppliers still run.
    fn supply(&self, event: &LogEvent, ctx: &RequestContext) -> Result<Fields, SupplyError>;
}
