//! Request-scoped metadata context
//!
//! A [`RequestContext`] is created when request handling begins, threaded as
//! an explicit argument to every supplier and filter call, and cleared when
//! the request ends. It is exclusively owned by the execution unit handling
//! its request - the substrate never stores contexts in shared mutable
//! globals, so nothing can leak between concurrently active requests.
//!
//! # Override State Machine
//!
//! Each context carries the verbosity-override state for its request:
//!
//! ```text
//! None ──► Pending ──► Active ──┐
//!             │                 ├──► Expired
//!             └────► Rejected ──┘
//! ```
//!
//! - `None` - no override header on the request
//! - `Pending` - header present, verification in flight
//! - `Active` - token verified, the [`LevelOverride`] applies
//! - `Rejected` - verification failed; behaves like `None` (fail closed)
//! - `Expired` - terminal, entered when the context is cleared
//!
//! Illegal transitions are logged and ignored, never panic.

use crate::severity::Severity;
use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::warn;
use ulid::Ulid;

/// Logger-name prefixes an override applies to; inline up to 2
pub type LoggerPrefixes = SmallVec<[String; 2]>;

/// A verified, request-scoped verbosity elevation
///
/// Owned by exactly one [`RequestContext`]; unreachable once that context
/// expires. An override can only raise verbosity - the filter engine treats
/// a non-matching event as neutral, never as a deny.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelOverride {
    min_severity: Severity,
    prefixes: LoggerPrefixes,
}

impl LevelOverride {
    /// Create an override for the given logger-name prefixes
    ///
    /// An empty prefix list means the override applies to all loggers.
    pub fn new(min_severity: Severity, prefixes: impl IntoIterator<Item = String>) -> Self {
        Self {
            min_severity,
            prefixes: prefixes.into_iter().collect(),
        }
    }

    /// Create an override applying to every logger
    pub fn all_loggers(min_severity: Severity) -> Self {
        Self {
            min_severity,
            prefixes: LoggerPrefixes::new(),
        }
    }

    /// The minimum severity this override accepts
    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    /// The logger-name prefixes this override is scoped to
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// True if this override covers the given logger name
    pub fn applies_to(&self, logger: &str) -> bool {
        self.prefixes.is_empty() || self.prefixes.iter().any(|p| logger.starts_with(p.as_str()))
    }
}

/// Verbosity-override state of one request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OverrideState {
    /// No override header was present
    #[default]
    None,
    /// Header present, token verification invoked
    Pending,
    /// Verification succeeded; the override applies for the rest of the request
    Active(LevelOverride),
    /// Verification failed; behaves like `None` for the rest of the request
    Rejected,
    /// Terminal; the owning context has been cleared
    Expired,
}

impl OverrideState {
    /// Short state name for diagnostics
    fn name(&self) -> &'static str {
        match self {
            OverrideState::None => "none",
            OverrideState::Pending => "pending",
            OverrideState::Active(_) => "active",
            OverrideState::Rejected => "rejected",
            OverrideState::Expired => "expired",
        }
    }
}

/// Transport-level facts about the owning request
///
/// Populated once at request entry by the host integration. The sensitive
/// members (`remote_user`, `referer`, `ssl_cipher`) are only copied into
/// records when the matching config toggle is on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    /// HTTP method
    pub method: String,
    /// Request path
    pub path: String,
    /// Remote peer address
    pub remote_addr: String,
    /// Authenticated remote user, if any
    pub remote_user: Option<String>,
    /// Referer header, if any
    pub referer: Option<String>,
    /// Negotiated TLS cipher, if the connection is TLS
    pub ssl_cipher: Option<String>,
}

/// Per-request scoped metadata store
///
/// Created once per request, read by many suppliers, cleared at request
/// end. Never shared between concurrently active requests.
#[derive(Debug)]
pub struct RequestContext {
    request_id: Ulid,
    tenant: Option<String>,
    request: Option<RequestInfo>,
    tags: HashMap<String, String>,
    override_state: OverrideState,
}

impl RequestContext {
    /// Create a fresh context with a new correlation id
    pub fn new() -> Self {
        Self {
            request_id: Ulid::new(),
            tenant: None,
            request: None,
            tags: HashMap::new(),
            override_state: OverrideState::None,
        }
    }

    /// Per-request correlation id
    pub fn request_id(&self) -> Ulid {
        self.request_id
    }

    /// Set the tenant identifier
    pub fn set_tenant(&mut self, tenant: impl Into<String>) {
        self.tenant = Some(tenant.into());
    }

    /// Tenant identifier, if set
    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    /// Attach transport-level request facts
    pub fn set_request_info(&mut self, info: RequestInfo) {
        self.request = Some(info);
    }

    /// Transport-level request facts, if attached
    pub fn request_info(&self) -> Option<&RequestInfo> {
        self.request.as_ref()
    }

    /// Set a custom tag
    pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    /// All custom tags
    pub fn tags(&self) -> &HashMap<String, String> {
        &self.tags
    }

    /// Current override state
    pub fn override_state(&self) -> &OverrideState {
        &self.override_state
    }

    /// The active override, if verification succeeded for this request
    pub fn active_override(&self) -> Option<&LevelOverride> {
        match &self.override_state {
            OverrideState::Active(ov) => Some(ov),
            _ => None,
        }
    }

    /// Mark that an override header was found and verification started
    ///
    /// Legal only from `None`.
    pub fn begin_verification(&mut self) {
        self.transition(OverrideState::Pending, |s| {
            matches!(s, OverrideState::None)
        });
    }

    /// Store a verified override
    ///
    /// Legal only from `Pending`.
    pub fn activate(&mut self, level_override: LevelOverride) {
        self.transition(OverrideState::Active(level_override), |s| {
            matches!(s, OverrideState::Pending)
        });
    }

    /// Record that verification failed; default verbosity applies
    ///
    /// Legal only from `Pending`.
    pub fn reject(&mut self) {
        self.transition(OverrideState::Rejected, |s| {
            matches!(s, OverrideState::Pending)
        });
    }

    /// Clear all values and enter the terminal `Expired` state
    ///
    /// Called when the request scope ends, on success and error paths
    /// alike. Idempotent.
    pub fn expire(&mut self) {
        self.tenant = None;
        self.request = None;
        self.tags.clear();
        self.override_state = OverrideState::Expired;
    }

    fn transition(&mut self, next: OverrideState, legal: fn(&OverrideState) -> bool) {
        if legal(&self.override_state) {
            self.override_state = next;
        } else {
            warn!(
                request_id = %self.request_id,
                from = self.override_state.name(),
                to = next.name(),
                "ignoring illegal override state transition"
            );
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    // ==========================================================================
    // LevelOverride
    // ==========================================================================

    #[test]
    fn test_override_empty_prefixes_applies_to_all() {
        let ov = LevelOverride::all_loggers(Severity::Debug);
        assert!(ov.applies_to("com.acme.billing"));
        assert!(ov.applies_to(""));
    }

    #[test]
    fn test_override_prefix_match() {
        let ov = LevelOverride::new(
            Severity::Warn,
            vec!["com.acme.billing".to_string()],
        );
        assert!(ov.applies_to("com.acme.billing.Invoice"));
        assert!(ov.applies_to("com.acme.billing"));
        assert!(!ov.applies_to("com.acme.other"));
    }

    #[test]
    fn test_override_any_prefix_suffices() {
        let ov = LevelOverride::new(
            Severity::Info,
            vec!["a.b".to_string(), "c.d".to_string()],
        );
        assert!(ov.applies_to("c.d.e"));
        assert!(!ov.applies_to("b.a"));
    }

    // ==========================================================================
    // State machine
    // ==========================================================================

    #[test]
    fn test_state_starts_none() {
        let ctx = RequestContext::new();
        assert_eq!(*ctx.override_state(), OverrideState::None);
        assert!(ctx.active_override().is_none());
    }

    #[test]
    fn test_state_none_to_pending_to_active() {
        let mut ctx = RequestContext::new();
        ctx.begin_verification();
        assert_eq!(*ctx.override_state(), OverrideState::Pending);

        ctx.activate(LevelOverride::all_loggers(Severity::Debug));
        let ov = ctx.active_override().unwrap();
        assert_eq!(ov.min_severity(), Severity::Debug);
    }

    #[test]
    fn test_state_pending_to_rejected() {
        let mut ctx = RequestContext::new();
        ctx.begin_verification();
        ctx.reject();
        assert_eq!(*ctx.override_state(), OverrideState::Rejected);
        assert!(ctx.active_override().is_none());
    }

    #[test]
    fn test_activate_without_pending_is_ignored() {
        let mut ctx = RequestContext::new();
        ctx.activate(LevelOverride::all_loggers(Severity::Trace));
        assert_eq!(*ctx.override_state(), OverrideState::None);
    }

    #[test]
    fn test_reject_after_active_is_ignored() {
        let mut ctx = RequestContext::new();
        ctx.begin_verification();
        ctx.activate(LevelOverride::all_loggers(Severity::Debug));
        ctx.reject();
        assert!(ctx.active_override().is_some());
    }

    #[test]
    fn test_expire_clears_values_and_is_terminal() {
        let mut ctx = RequestContext::new();
        ctx.set_tenant("acme");
        ctx.set_tag("zone", "eu-1");
        ctx.begin_verification();
        ctx.activate(LevelOverride::all_loggers(Severity::Debug));

        ctx.expire();
        assert_eq!(*ctx.override_state(), OverrideState::Expired);
        assert!(ctx.tenant().is_none());
        assert!(ctx.tags().is_empty());
        assert!(ctx.active_override().is_none());

        // Terminal: nothing moves it out of Expired
        ctx.begin_verification();
        assert_eq!(*ctx.override_state(), OverrideState::Expired);
    }

    #[test]
    fn test_contexts_have_distinct_request_ids() {
        let a = RequestContext::new();
        let b = RequestContext::new();
        assert_ne!(a.request_id(), b.request_id());
    }
}
