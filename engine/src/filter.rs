//! Per-event filter decisions
//!
//! Consulted once per log event while a request is in flight. The decision
//! is a pure function of the event's severity, its logger name, and the
//! owning context's override state - no side effects, no I/O.
//!
//! The decision is deliberately three-valued-in-two: [`ForceAccept`] makes
//! the event emit even when the static threshold would suppress it;
//! [`Defer`] hands the decision back to the static threshold. There is no
//! deny - an override can only raise verbosity, never suppress events that
//! would otherwise be logged.
//!
//! [`ForceAccept`]: FilterDecision::ForceAccept
//! [`Defer`]: FilterDecision::Defer

use kirjuri_core::{RequestContext, Severity};

/// Outcome of consulting the override for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Emit the event even if the static threshold would suppress it
    ForceAccept,
    /// Defer to the statically configured threshold
    Defer,
}

/// Decide whether the context's override forces this event out
///
/// Forces acceptance iff an override is `Active`, the event's severity
/// reaches the override's minimum, and the override's prefix set covers
/// the event's logger (an empty set covers every logger).
pub fn decide(severity: Severity, logger: &str, ctx: &RequestContext) -> FilterDecision {
    match ctx.active_override() {
        Some(ov) if severity >= ov.min_severity() && ov.applies_to(logger) => {
            FilterDecision::ForceAccept
        }
        _ => FilterDecision::Defer,
    }
}

/// Compose the override decision with the static threshold
///
/// The complete per-event accept check: an event emits when the override
/// forces it, or when it clears the static threshold on its own.
pub fn should_emit(
    static_threshold: Severity,
    severity: Severity,
    logger: &str,
    ctx: &RequestContext,
) -> bool {
    match decide(severity, logger, ctx) {
        FilterDecision::ForceAccept => true,
        FilterDecision::Defer => severity >= static_threshold,
    }
}
