//! Severity levels for log events
//!
//! Severity is a total order: `Trace < Debug < Info < Warn < Error`.
//! The derived `Ord` on the variant declaration order carries the
//! comparison used by the filter engine, so variant order is load-bearing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Log event severity
///
/// Wire names are uppercase (`"DEBUG"`), parsing is case-insensitive.
/// The same names appear in the JSON record's `level` key and in the
/// override token's `level` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Finest-grained diagnostic output
    Trace,
    /// Debugging detail
    Debug,
    /// Normal operational messages
    Info,
    /// Something surprising but recoverable
    Warn,
    /// A failure
    Error,
}

impl Severity {
    /// Uppercase wire name (`"INFO"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a severity name does not match any level
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity: {0}")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Severity::Trace),
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARN" | "WARNING" => Ok(Severity::Warn),
            "ERROR" => Ok(Severity::Error),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}
