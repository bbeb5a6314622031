//! Request supplier - transport-level request fields

use crate::config::Config;
use kirjuri_core::{
    order, record_keys, FieldSupplier, Fields, LogEvent, RequestContext, SupplyError,
};
use serde_json::Value;

/// Supplies the request correlation id and transport facts
///
/// The sensitive members (`remote_user`, `referer`, `ssl_cipher`) are
/// copied only when the matching toggle was on at startup. Toggles are
/// read once at construction; the supplier itself is stateless afterwards.
pub struct RequestSupplier {
    include_remote_user: bool,
    include_referer: bool,
    include_ssl: bool,
}

impl RequestSupplier {
    /// Create from the engine configuration
    pub fn new(config: &Config) -> Self {
        Self {
            include_remote_user: config.include_remote_user,
            include_referer: config.include_referer,
            include_ssl: config.include_ssl,
        }
    }
}

impl FieldSupplier for RequestSupplier {
    fn name(&self) -> &'static str {
        "request"
    }

    fn order(&self) -> i32 {
        order::REQUEST
    }

    fn supply(&self, _event: &LogEvent, ctx: &RequestContext) -> Result<Fields, SupplyError> {
        let mut fields = Fields::new();
        fields.insert(
            record_keys::REQUEST_ID.to_string(),
            Value::String(ctx.request_id().to_string()),
        );

        let Some(info) = ctx.request_info() else {
            // Not every context belongs to an HTTP request
            return Ok(fields);
        };

        fields.insert(
            record_keys::METHOD.to_string(),
            Value::String(info.method.clone()),
        );
        fields.insert(
            record_keys::PATH.to_string(),
            Value::String(info.path.clone()),
        );
        fields.insert(
            record_keys::REMOTE_ADDR.to_string(),
            Value::String(info.remote_addr.clone()),
        );

        if self.include_remote_user {
            if let Some(user) = &info.remote_user {
                fields.insert(
                    record_keys::REMOTE_USER.to_string(),
                    Value::String(user.clone()),
                );
            }
        }
        if self.include_referer {
            if let Some(referer) = &info.referer {
                fields.insert(
                    record_keys::REFERER.to_string(),
                    Value::String(referer.clone()),
                );
            }
        }
        if self.include_ssl {
            if let Some(cipher) = &info.ssl_cipher {
                fields.insert(
                    record_keys::SSL_CIPHER.to_string(),
                    Value::String(cipher.clone()),
                );
            }
        }

        Ok(fields)
    }
}
