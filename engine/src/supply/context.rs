//! Context supplier - tenant and custom tags

use kirjuri_core::{
    order, record_keys, FieldSupplier, Fields, LogEvent, RequestContext, SupplyError,
};
use serde_json::Value;

/// Supplies the tenant id and every custom tag as a top-level field
///
/// Tags land at the top level deliberately: a tag sharing a key with an
/// earlier supplier's field replaces it, which is the documented
/// last-write-wins override mechanism. Tags are emitted in sorted key
/// order so repeated assemblies of the same context produce identical
/// records.
pub struct ContextSupplier;

impl FieldSupplier for ContextSupplier {
    fn name(&self) -> &'static str {
        "context"
    }

    fn order(&self) -> i32 {
        order::CONTEXT
    }

    fn supply(&self, _event: &LogEvent, ctx: &RequestContext) -> Result<Fields, SupplyError> {
        let mut fields = Fields::new();

        if let Some(tenant) = ctx.tenant() {
            fields.insert(
                record_keys::TENANT.to_string(),
                Value::String(tenant.to_string()),
            );
        }

        let mut tags: Vec<(&String, &String)> = ctx.tags().iter().collect();
        tags.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in tags {
            fields.insert(key.clone(), Value::String(value.clone()));
        }

        Ok(fields)
    }
}
