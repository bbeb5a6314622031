//! Substrate - the assembled engine
//!
//! The [`Substrate`] wires the whole per-request data flow together. No
//! YAML, just code:
//!
//! ```text
//! request in ──► begin_request(token?) ──► RequestScope (override resolved)
//!                                              │
//!      [log events during handling] ──► should_emit / assemble ──► JSON line
//! ```
//!
//! # Example
//!
//! ```
//! use kirjuri_engine::{Config, Substrate};
//! use kirjuri_core::{LogEvent, Severity};
//!
//! let substrate = Substrate::builder().config(Config::default()).build();
//!
//! let mut scope = substrate.begin_request(None);
//! scope.set_tenant("acme");
//!
//! let event = LogEvent::new(Severity::Info, "app.main", "started");
//! if substrate.should_emit(&event, &scope) {
//!     let line = substrate.assembler().assemble_line(&event, &scope);
//!     assert!(line.ends_with('\n'));
//! }
//! ```

use crate::assemble::RecordAssembler;
use crate::config::Config;
use crate::discovery::PluginIndex;
use crate::filter;
use crate::registry::SupplierRegistry;
use crate::scope::RequestScope;
use crate::supply::{BaseSupplier, ContextSupplier, RequestSupplier};
use crate::token::{
    AlgorithmProvider, AlgorithmRegistry, KeyRing, ResolvedKey, TokenVerifier,
};
use kirjuri_core::{FieldSupplier, LogEvent, RequestContext};
use std::sync::Arc;
use tracing::{debug, info};

/// The assembled logging substrate
///
/// Built once at startup and shared by every request handler. All runtime
/// operations are synchronous, bounded computations.
pub struct Substrate {
    config: Config,
    assembler: RecordAssembler,
    verifier: TokenVerifier,
}

impl Substrate {
    /// Start building a substrate
    pub fn builder() -> SubstrateBuilder {
        SubstrateBuilder::new()
    }

    /// The configuration the substrate was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Name of the request header the host should read the token from
    pub fn override_header(&self) -> &str {
        &self.config.override_header
    }

    /// The record assembler
    pub fn assembler(&self) -> &RecordAssembler {
        &self.assembler
    }

    /// The token verifier
    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Begin handling one request
    ///
    /// When the host found an override token on the request, verification
    /// runs here: the scope's context ends up `Active` on success and
    /// `Rejected` on any failure. A rejected token is logged at debug
    /// level and the request proceeds at default verbosity - verification
    /// failure is never fatal to the request.
    pub fn begin_request(&self, override_token: Option<&str>) -> RequestScope {
        let mut ctx = RequestContext::new();

        if let Some(token) = override_token {
            ctx.begin_verification();
            match self.verifier.verify(token) {
                Ok(verified) => {
                    info!(
                        request_id = %ctx.request_id(),
                        key_id = %verified.key_id,
                        level = %verified.claims.level,
                        "verbosity override active"
                    );
                    ctx.activate(verified.claims.to_override());
                }
                Err(e) => {
                    debug!(request_id = %ctx.request_id(), error = %e, "override token rejected");
                    ctx.reject();
                }
            }
        }

        RequestScope::new(ctx)
    }

    /// Full per-event accept check against this substrate's static threshold
    pub fn should_emit(&self, event: &LogEvent, ctx: &RequestContext) -> bool {
        filter::should_emit(
            self.config.static_threshold,
            event.severity,
            &event.logger,
            ctx,
        )
    }
}

/// Builder collecting configuration, suppliers, keys, and plugins
pub struct SubstrateBuilder {
    config: Config,
    suppliers: Vec<Arc<dyn FieldSupplier>>,
    algorithms: AlgorithmRegistry,
    keys: Arc<KeyRing>,
    index: Option<Arc<dyn PluginIndex>>,
}

impl SubstrateBuilder {
    fn new() -> Self {
        Self {
            config: Config::default(),
            suppliers: Vec::new(),
            algorithms: AlgorithmRegistry::with_defaults(),
            keys: Arc::new(KeyRing::new()),
            index: None,
        }
    }

    /// Use this configuration (defaults otherwise)
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Register an explicitly configured supplier
    pub fn supplier<S: FieldSupplier + 'static>(self, supplier: S) -> Self {
        self.supplier_arc(Arc::new(supplier))
    }

    /// Register an already-shared supplier
    pub fn supplier_arc(mut self, supplier: Arc<dyn FieldSupplier>) -> Self {
        self.suppliers.push(supplier);
        self
    }

    /// Register an additional signature-algorithm provider
    pub fn algorithm(mut self, provider: Arc<dyn AlgorithmProvider>) -> Self {
        self.algorithms.register(provider);
        self
    }

    /// Provision a resolved public key for override verification
    pub fn key(self, key: ResolvedKey) -> Self {
        self.keys.insert(key);
        self
    }

    /// Query this plugin index once at build time
    pub fn plugin_index(mut self, index: Arc<dyn PluginIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Assemble the substrate
    pub fn build(mut self) -> Substrate {
        let mut registry = SupplierRegistry::builder()
            .built_in(Arc::new(BaseSupplier))
            .built_in(Arc::new(RequestSupplier::new(&self.config)))
            .built_in(Arc::new(ContextSupplier));

        for supplier in self.suppliers {
            registry = registry.register(supplier);
        }
        if let Some(index) = &self.index {
            registry = registry.discover(index.as_ref());
            self.algorithms.discover(index.as_ref());
        }

        let assembler = RecordAssembler::new(Arc::new(registry.build()));
        let verifier = TokenVerifier::new(self.algorithms, self.keys);

        Substrate {
            config: self.config,
            assembler,
            verifier,
        }
    }
}

impl Default for SubstrateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use kirjuri_core::{record_keys, OverrideState, Severity};
    use serde_json::json;

    #[test]
    fn test_build_registers_built_ins_in_band_order() {
        let substrate = Substrate::builder().build();
        let names: Vec<&str> = substrate
            .assembler()
            .registry()
            .ordered()
            .iter()
            .map(|s| s.name())
            .collect();
        assert_eq!(names, vec!["base", "request", "context"]);
    }

    #[test]
    fn test_begin_request_without_token_stays_none() {
        let substrate = Substrate::builder().build();
        let scope = substrate.begin_request(None);
        assert_eq!(*scope.override_state(), OverrideState::None);
    }

    #[test]
    fn test_begin_request_with_garbage_token_rejects() {
        let substrate = Substrate::builder().build();
        let scope = substrate.begin_request(Some("not-a-token"));
        assert_eq!(*scope.override_state(), OverrideState::Rejected);
        assert!(scope.active_override().is_none());
    }

    #[test]
    fn test_assembled_record_has_mandatory_keys() {
        let substrate = Substrate::builder().build();
        let scope = substrate.begin_request(None);
        let event = LogEvent::new(Severity::Info, "app.main", "started");

        let record = substrate.assembler().assemble(&event, &scope);
        assert!(record.get(record_keys::TIMESTAMP).is_some());
        assert_eq!(record.get(record_keys::LEVEL), Some(&json!("INFO")));
        assert_eq!(record.get(record_keys::LOGGER), Some(&json!("app.main")));
        assert_eq!(record.get(record_keys::MESSAGE), Some(&json!("started")));
        assert!(record.get(record_keys::REQUEST_ID).is_some());
    }

    #[test]
    fn test_should_emit_uses_static_threshold_without_override() {
        let substrate = Substrate::builder().build();
        let scope = substrate.begin_request(None);

        let debug_event = LogEvent::new(Severity::Debug, "app", "detail");
        let info_event = LogEvent::new(Severity::Info, "app", "normal");
        assert!(!substrate.should_emit(&debug_event, &scope));
        assert!(substrate.should_emit(&info_event, &scope));
    }
}
