//! The substrate's view of a single log event
//!
//! The surrounding logging framework owns event creation and dispatch; this
//! type is the narrow interface the assembler and filter consume. It carries
//! exactly the mandatory record inputs: when the event fired, how severe it
//! is, which logger produced it, and the message text.

use crate::severity::Severity;
use chrono::{DateTime, Utc};

/// One log event as seen by the substrate
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    /// When the event was observed
    pub timestamp: DateTime<Utc>,
    /// Event severity
    pub severity: Severity,
    /// Dotted logger name (e.g. "com.acme.billing.Invoice")
    pub logger: String,
    /// Message text
    pub message: String,
}

impl LogEvent {
    /// Create an event stamped with the current time
    pub fn new(
        severity: Severity,
        logger: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            logger: logger.into(),
            message: message.into(),
        }
    }

    /// Replace the timestamp (for replay and tests)
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
