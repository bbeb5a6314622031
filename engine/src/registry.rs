//! Supplier registry for KIRJURI
//!
//! Holds the ordered collection of field suppliers. Suppliers arrive from
//! three sources and are merged into a single stable total order:
//!
//! ```text
//! built-ins (fixed bands) ++ configured (config order) ++ discovered (sorted by name)
//!                     │
//!                     ▼
//!        stable sort by order() - ties keep concatenation order
//! ```
//!
//! Discovered entries are pre-sorted by entry name so the final order never
//! depends on the host index's iteration order. The registry is built once
//! at startup and immutable afterwards; registration after `build()` is
//! unsupported.

use crate::discovery::PluginIndex;
use kirjuri_core::FieldSupplier;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Immutable, ordered collection of field suppliers
///
/// Process-wide and read-mostly: built at startup, then shared by every
/// assembler without further coordination.
pub struct SupplierRegistry {
    /// Suppliers in final assembly order
    suppliers: Vec<Arc<dyn FieldSupplier>>,
}

impl SupplierRegistry {
    /// Start building a registry
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Suppliers in assembly order
    pub fn ordered(&self) -> &[Arc<dyn FieldSupplier>] {
        &self.suppliers
    }

    /// Number of registered suppliers
    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    /// True if no suppliers are registered
    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }
}

/// Builder collecting suppliers from the three sources
#[derive(Default)]
pub struct RegistryBuilder {
    built_in: Vec<Arc<dyn FieldSupplier>>,
    configured: Vec<Arc<dyn FieldSupplier>>,
    discovered: Vec<(String, Arc<dyn FieldSupplier>)>,
}

impl RegistryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a built-in supplier (fixed low-order band)
    pub fn built_in(mut self, supplier: Arc<dyn FieldSupplier>) -> Self {
        debug!(supplier = supplier.name(), order = supplier.order(), "Added built-in supplier");
        self.built_in.push(supplier);
        self
    }

    /// Register an explicitly configured supplier
    ///
    /// Configured suppliers keep their configuration order among equal
    /// `order()` values.
    pub fn register(mut self, supplier: Arc<dyn FieldSupplier>) -> Self {
        info!(supplier = supplier.name(), order = supplier.order(), "Registered supplier");
        self.configured.push(supplier);
        self
    }

    /// Fold in every supplier the plugin index provides
    ///
    /// An entry whose constructor fails is excluded with a warning; the
    /// remaining entries still register. One bad plugin never aborts
    /// startup.
    pub fn discover(mut self, index: &dyn PluginIndex) -> Self {
        for entry in index.supplier_entries() {
            match (entry.build)() {
                Ok(supplier) => {
                    info!(
                        supplier = supplier.name(),
                        entry = %entry.name,
                        order = supplier.order(),
                        "Discovered supplier"
                    );
                    self.discovered.push((entry.name, supplier));
                }
                Err(e) => {
                    warn!(entry = %entry.name, error = %e, "Excluding supplier plugin");
                }
            }
        }
        self
    }

    /// Produce the final ordered registry
    ///
    /// Discovered suppliers are sorted by entry name before concatenation;
    /// the final sort on `order()` is stable, so equal orders keep
    /// concatenation order.
    pub fn build(mut self) -> SupplierRegistry {
        self.discovered.sort_by(|a, b| a.0.cmp(&b.0));

        let mut suppliers: Vec<Arc<dyn FieldSupplier>> = Vec::with_capacity(
            self.built_in.len() + self.configured.len() + self.discovered.len(),
        );
        suppliers.extend(self.built_in);
        suppliers.extend(self.configured);
        suppliers.extend(self.discovered.into_iter().map(|(_, s)| s));

        suppliers.sort_by_key(|s| s.order());

        info!(suppliers = suppliers.len(), "Supplier registry built");
        SupplierRegistry { suppliers }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::discovery::{StaticPluginIndex, SupplierEntry};
    use kirjuri_core::{order, Fields, LogEvent, RequestContext, SupplyError};

    struct Fixed {
        name: &'static str,
        order: i32,
    }

    impl FieldSupplier for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }
        fn order(&self) -> i32 {
            self.order
        }
        fn supply(&self, _: &LogEvent, _: &RequestContext) -> Result<Fields, SupplyError> {
            Ok(Fields::new())
        }
    }

    fn fixed(name: &'static str, order: i32) -> Arc<dyn FieldSupplier> {
        Arc::new(Fixed { name, order })
    }

    fn names(registry: &SupplierRegistry) -> Vec<&'static str> {
        registry.ordered().iter().map(|s| s.name()).collect()
    }

    // ==========================================================================
    // Ordering contract
    // ==========================================================================

    #[test]
    fn test_sort_by_order_across_sources() {
        let registry = SupplierRegistry::builder()
            .built_in(fixed("base", order::BASE))
            .built_in(fixed("context", order::CONTEXT))
            .register(fixed("late", 5_000))
            .register(fixed("early", 50))
            .build();

        assert_eq!(names(&registry), vec!["base", "early", "context", "late"]);
    }

    #[test]
    fn test_equal_order_keeps_registration_order() {
        let registry = SupplierRegistry::builder()
            .register(fixed("first", order::CONFIGURED))
            .register(fixed("second", order::CONFIGURED))
            .build();

        assert_eq!(names(&registry), vec!["first", "second"]);
    }

    #[test]
    fn test_discovered_sorted_by_entry_name() {
        let index = StaticPluginIndex::new()
            .supplier(SupplierEntry::new("zulu", || {
                Ok(Arc::new(Fixed { name: "zulu", order: order::DISCOVERED }))
            }))
            .supplier(SupplierEntry::new("alpha", || {
                Ok(Arc::new(Fixed { name: "alpha", order: order::DISCOVERED }))
            }));

        let registry = SupplierRegistry::builder().discover(&index).build();
        assert_eq!(names(&registry), vec!["alpha", "zulu"]);
    }

    #[test]
    fn test_configured_precede_discovered_at_equal_order() {
        let index = StaticPluginIndex::new().supplier(SupplierEntry::new("found", || {
            Ok(Arc::new(Fixed { name: "found", order: order::CONFIGURED }))
        }));

        let registry = SupplierRegistry::builder()
            .register(fixed("listed", order::CONFIGURED))
            .discover(&index)
            .build();

        assert_eq!(names(&registry), vec!["listed", "found"]);
    }

    // ==========================================================================
    // Failure isolation
    // ==========================================================================

    #[test]
    fn test_failing_plugin_is_excluded_not_fatal() {
        let index = StaticPluginIndex::new()
            .supplier(SupplierEntry::new("broken", || {
                Err(SupplyError::Init("no database".to_string()))
            }))
            .supplier(SupplierEntry::new("good", || {
                Ok(Arc::new(Fixed { name: "good", order: order::DISCOVERED }))
            }));

        let registry = SupplierRegistry::builder().discover(&index).build();
        assert_eq!(names(&registry), vec!["good"]);
    }

    #[test]
    fn test_empty_registry() {
        let registry = SupplierRegistry::builder().build();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }
}
