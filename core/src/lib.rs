//! kirjuri-core - Core types for the KIRJURI structured-logging substrate
//!
//! This crate provides the foundational types shared between the KIRJURI
//! engine and external field-supplier plugins:
//!
//! - [`LogEvent`] - one log event as seen by the substrate
//! - [`LogRecord`] - the canonical ordered per-event record
//! - [`RequestContext`] - per-request scoped metadata and override state
//! - [`FieldSupplier`] trait - contributes named values to a record
//! - [`Severity`] - the five-level severity order
//! - [`SupplyError`] - error type for supplier operations
//! - [`record_keys`] - reserved record key constants
//!
//! # Why this crate exists
//!
//! External supplier plugins implement the [`FieldSupplier`] trait and use
//! [`RequestContext`]. Without `kirjuri-core` they would depend on
//! `kirjuri-engine`, but the engine also wants to optionally bundle such
//! suppliers, creating a cyclic dependency. Extracting the shared types
//! here breaks the cycle:
//!
//! ```text
//! kirjuri-core ◄── kirjuri-engine
//!     ▲
//!     └─────────── third-party suppliers
//! ```

#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]
#![warn(missing_docs)]

/// Request-scoped metadata context and the override state machine
pub mod context;
mod error;
/// The substrate's view of a single log event
pub mod event;
/// The canonical per-event structured record
pub mod record;
/// Reserved record key constants
pub mod record_keys;
/// Severity levels
pub mod severity;
mod supply;

pub use context::{LevelOverride, LoggerPrefixes, OverrideState, RequestContext, RequestInfo};
pub use error::SupplyError;
pub use event::LogEvent;
pub use record::{field_value, Fields, LogRecord};
pub use severity::{ParseSeverityError, Severity};
pub use supply::{order, FieldSupplier};
