//! Plugin discovery for KIRJURI
//!
//! The host process exposes one [`PluginIndex`]: a process-wide lookup,
//! keyed by capability, that the engine queries exactly once at
//! initialization. It replaces runtime self-registration - everything the
//! index returns is folded into the supplier registry and the algorithm
//! registry before steady-state operation begins.
//!
//! ```text
//! PluginIndex ──► supplier_entries()  ──► SupplierRegistry (sorted, merged)
//!             └─► algorithm_entries() ──► AlgorithmRegistry
//! ```
//!
//! Entries carry a name and a fallible constructor. A constructor that
//! fails is logged and excluded; one bad plugin never aborts startup.
//!
//! # Example
//!
//! ```
//! use kirjuri_engine::discovery::{PluginIndex, StaticPluginIndex, SupplierEntry};
//! use kirjuri_core::{FieldSupplier, Fields, LogEvent, RequestContext, SupplyError};
//! use std::sync::Arc;
//!
//! struct ZoneSupplier;
//!
//! impl FieldSupplier for ZoneSupplier {
//!     fn name(&self) -> &'static str { "zone" }
//!     fn order(&self) -> i32 { kirjuri_core::order::DISCOVERED }
//!     fn supply(&self, _: &LogEvent, _: &RequestContext) -> Result<Fields, SupplyError> {
//!         Ok(Fields::new())
//!     }
//! }
//!
//! let index = StaticPluginIndex::new()
//!     .supplier(SupplierEntry::new("zone", || Ok(Arc::new(ZoneSupplier))));
//! assert_eq!(index.supplier_entries().len(), 1);
//! ```

use crate::token::AlgorithmProvider;
use kirjuri_core::{FieldSupplier, SupplyError};
use std::sync::Arc;

/// Fallible constructor for a discovered field supplier
pub type SupplierCtor =
    Arc<dyn Fn() -> Result<Arc<dyn FieldSupplier>, SupplyError> + Send + Sync>;

/// Fallible constructor for a discovered algorithm provider
pub type AlgorithmCtor =
    Arc<dyn Fn() -> Result<Arc<dyn AlgorithmProvider>, SupplyError> + Send + Sync>;

/// One discoverable field supplier
#[derive(Clone)]
pub struct SupplierEntry {
    /// Entry name, used for deterministic ordering and diagnostics
    pub name: String,
    /// Constructor invoked once at registry build time
    pub build: SupplierCtor,
}

impl SupplierEntry {
    /// Create an entry from a name and a constructor
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn FieldSupplier>, SupplyError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            build: Arc::new(build),
        }
    }
}

/// One discoverable signature-algorithm provider
#[derive(Clone)]
pub struct AlgorithmEntry {
    /// Entry name, used for deterministic ordering and diagnostics
    pub name: String,
    /// Constructor invoked once at verifier build time
    pub build: AlgorithmCtor,
}

impl AlgorithmEntry {
    /// Create an entry from a name and a constructor
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn AlgorithmProvider>, SupplyError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            build: Arc::new(build),
        }
    }
}

/// Process-wide plugin lookup, queried once at initialization
pub trait PluginIndex: Send + Sync {
    /// Field suppliers this host provides
    fn supplier_entries(&self) -> Vec<SupplierEntry> {
        Vec::new()
    }

    /// Signature-algorithm providers this host provides
    fn algorithm_entries(&self) -> Vec<AlgorithmEntry> {
        Vec::new()
    }
}

/// A plugin index backed by plain lists
///
/// The common case: the host assembles its plugin set in code at startup.
#[derive(Clone, Default)]
pub struct StaticPluginIndex {
    suppliers: Vec<SupplierEntry>,
    algorithms: Vec<AlgorithmEntry>,
}

impl StaticPluginIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a supplier entry
    pub fn supplier(mut self, entry: SupplierEntry) -> Self {
        self.suppliers.push(entry);
        self
    }

    /// Add an algorithm-provider entry
    pub fn algorithm(mut self, entry: AlgorithmEntry) -> Self {
        self.algorithms.push(entry);
        self
    }
}

impl PluginIndex for StaticPluginIndex {
    fn supplier_entries(&self) -> Vec<SupplierEntry> {
        self.suppliers.clone()
    }

    fn algorithm_entries(&self) -> Vec<AlgorithmEntry> {
        self.algorithms.clone()
    }
}
