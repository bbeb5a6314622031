//! Reserved record key constants for KIRJURI log records
//!
//! These keys are used by convention across suppliers. Suppliers are free to
//! contribute any key; later suppliers replace earlier values on collision
//! (last-write-wins), so a custom supplier can deliberately override any of
//! these.

/// Event timestamp, RFC 3339 with millisecond precision, UTC
pub const TIMESTAMP: &str = "timestamp";

/// Severity name (uppercase, e.g. "INFO")
pub const LEVEL: &str = "level";

/// Logger name that produced the event
pub const LOGGER: &str = "logger";

/// The log message itself
pub const MESSAGE: &str = "msg";

/// Diagnostic marker naming suppliers that failed during assembly
pub const SUPPLIER_ERROR: &str = "supplier_error";

/// Per-request correlation id (ULID string)
pub const REQUEST_ID: &str = "request_id";

/// Tenant identifier of the owning request
pub const TENANT: &str = "tenant";

/// HTTP method of the owning request
pub const METHOD: &str = "method";

/// Request path
pub const PATH: &str = "path";

/// Remote peer address
pub const REMOTE_ADDR: &str = "remote_addr";

/// Authenticated remote user (sensitive, off by default)
pub const REMOTE_USER: &str = "remote_user";

/// Referer header value (sensitive, off by default)
pub const REFERER: &str = "referer";

/// Negotiated TLS cipher (sensitive, off by default)
pub const SSL_CIPHER: &str = "ssl_cipher";
