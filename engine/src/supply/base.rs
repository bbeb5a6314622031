//! Base supplier - the mandatory record fields

use chrono::SecondsFormat;
use kirjuri_core::{
    order, record_keys, FieldSupplier, Fields, LogEvent, RequestContext, SupplyError,
};
use serde_json::Value;

/// Supplies `timestamp`, `level`, `logger`, and `msg`
///
/// Runs first (the `BASE` band), so every record carries the mandatory
/// keys in a fixed leading position.
pub struct BaseSupplier;

impl FieldSupplier for BaseSupplier {
    fn name(&self) -> &'static str {
        "base"
    }

    fn order(&self) -> i32 {
        order::BASE
    }

    fn supply(&self, event: &LogEvent, _ctx: &RequestContext) -> Result<Fields, SupplyError> {
        let mut fields = Fields::new();
        fields.insert(
            record_keys::TIMESTAMP.to_string(),
            Value::String(event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        fields.insert(
            record_keys::LEVEL.to_string(),
            Value::String(event.severity.as_str().to_string()),
        );
        fields.insert(
            record_keys::LOGGER.to_string(),
            Value::String(event.logger.clone()),
        );
        fields.insert(
            record_keys::MESSAGE.to_string(),
            Value::String(event.message.clone()),
        );
        Ok(fields)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use kirjuri_core::Severity;
    use serde_json::json;

    #[test]
    fn test_base_supplies_mandatory_keys() {
        let fixed = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap();
        let event =
            LogEvent::new(Severity::Warn, "com.acme.billing", "late invoice").with_timestamp(fixed);

        let fields = BaseSupplier.supply(&event, &RequestContext::new()).unwrap();
        assert_eq!(
            fields.get(record_keys::TIMESTAMP),
            Some(&json!("2024-06-01T12:30:00.000Z"))
        );
        assert_eq!(fields.get(record_keys::LEVEL), Some(&json!("WARN")));
        assert_eq!(
            fields.get(record_keys::LOGGER),
            Some(&json!("com.acme.billing"))
        );
        assert_eq!(fields.get(record_keys::MESSAGE), Some(&json!("late invoice")));
    }

    #[test]
    fn test_base_runs_in_base_band() {
        assert_eq!(BaseSupplier.order(), order::BASE);
    }
}
