//! Convenience re-exports for substrate integrators.
//!
//! ```rust
//! use kirjuri_engine::prelude::*;
//! ```

// Core types
pub use kirjuri_core::{
    order, FieldSupplier, Fields, LevelOverride, LogEvent, LogRecord, OverrideState,
    RequestContext, RequestInfo, Severity, SupplyError,
};

// Engine surface
pub use crate::assemble::RecordAssembler;
pub use crate::config::{Config, DEFAULT_OVERRIDE_HEADER};
pub use crate::filter::{decide, should_emit, FilterDecision};
pub use crate::registry::SupplierRegistry;
pub use crate::scope::RequestScope;
pub use crate::substrate::{Substrate, SubstrateBuilder};

// Built-in suppliers
pub use crate::supply::{BaseSupplier, ContextSupplier, RequestSupplier};

// Discovery
pub use crate::discovery::{
    AlgorithmEntry, PluginIndex, StaticPluginIndex, SupplierEntry,
};

// Token verification
pub use crate::token::{
    AlgorithmProvider, AlgorithmRegistry, KeyRing, ResolvedKey, TokenVerifier, VerifiedToken,
    VerifyError,
};

// Error types
pub use crate::error::EngineError;
