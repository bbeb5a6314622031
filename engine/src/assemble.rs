//! Record assembly
//!
//! The assembler runs every supplier from the registry's ordered sequence
//! against one event and the owning request's context, merging each result
//! into a single [`LogRecord`]:
//!
//! ```text
//! LogEvent ──► supplier 1 ──► supplier 2 ──► ... ──► LogRecord ──► JSON line
//!              (sequential - merge order is semantically significant)
//! ```
//!
//! A later supplier's value replaces an earlier one under the same key;
//! that is the documented override mechanism. A supplier that fails is
//! recorded under [`record_keys::SUPPLIER_ERROR`] and assembly continues -
//! one failing supplier never blanks out the rest of the record.
//!
//! Independent events may be assembled concurrently by different execution
//! units; each brings its own context, so no coordination is needed.

use crate::registry::SupplierRegistry;
use kirjuri_core::{record_keys, LogEvent, LogRecord, RequestContext};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Assembles canonical records from events
#[derive(Clone)]
pub struct RecordAssembler {
    registry: Arc<SupplierRegistry>,
}

impl RecordAssembler {
    /// Create an assembler over a built registry
    pub fn new(registry: Arc<SupplierRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this assembler draws suppliers from
    pub fn registry(&self) -> &SupplierRegistry {
        &self.registry
    }

    /// Assemble one record from an event and its request context
    pub fn assemble(&self, event: &LogEvent, ctx: &RequestContext) -> LogRecord {
        let mut record = LogRecord::new();

        for supplier in self.registry.ordered() {
            match supplier.supply(event, ctx) {
                Ok(fields) => record.merge(fields),
                Err(e) => {
                    warn!(supplier = supplier.name(), error = %e, "supplier failed during assembly");
                    note_supplier_error(&mut record, supplier.name(), &e.to_string());
                }
            }
        }

        record
    }

    /// Assemble and serialize to a newline-terminated JSON line
    pub fn assemble_line(&self, event: &LogEvent, ctx: &RequestContext) -> String {
        self.assemble(event, ctx).to_json_line()
    }
}

/// Append a failure to the record's diagnostic marker field
///
/// Multiple failures in one record accumulate as `"a: ...; b: ..."`.
fn note_supplier_error(record: &mut LogRecord, supplier: &str, error: &str) {
    let entry = format!("{}: {}", supplier, error);
    let value = match record.get(record_keys::SUPPLIER_ERROR).and_then(Value::as_str) {
        Some(existing) => format!("{}; {}", existing, entry),
        None => entry,
    };
    record.insert(record_keys::SUPPLIER_ERROR, Value::String(value));
}
