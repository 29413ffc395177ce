use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type UserId = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// Body of `GET /health`. Only `status` carries meaning for clients, and any
/// JSON value is accepted there: whatever is not `"healthy"` is unhealthy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthReport {
    #[serde(default)]
    pub status: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    pub const HEALTHY: &'static str = "healthy";

    pub fn healthy(database: impl Into<String>) -> Self {
        Self {
            status: Value::from(Self::HEALTHY),
            database: Some(database.into()),
            error: None,
        }
    }

    /// Reads a report out of any JSON document. Missing or mistyped fields
    /// become absent instead of failing the whole body.
    pub fn from_json(value: &Value) -> Self {
        let text = |name: &str| value.get(name).and_then(Value::as_str).map(ToString::to_string);
        Self {
            status: value.get("status").cloned().unwrap_or(Value::Null),
            database: text("database"),
            error: text("error"),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status.as_str() == Some(Self::HEALTHY)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Calculation {
    pub result: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_report_ignores_unknown_fields() {
        let report: HealthReport =
            serde_json::from_str(r#"{"status":"healthy","database":"connected","uptime":3}"#)
                .unwrap();
        assert!(report.is_healthy());
        assert_eq!(report.database.as_deref(), Some("connected"));
    }

    #[test]
    fn non_healthy_status_is_not_healthy() {
        let report: HealthReport =
            serde_json::from_str(r#"{"status":"unhealthy","error":"db down"}"#).unwrap();
        assert!(!report.is_healthy());
    }

    #[test]
    fn any_json_document_yields_a_report() {
        for body in [r#"{}"#, r#"{"status":5}"#, r#"{"status":null}"#, "[]", r#""healthy""#] {
            let value: Value = serde_json::from_str(body).unwrap();
            let report = HealthReport::from_json(&value);
            assert!(!report.is_healthy(), "{body} must not count as healthy");
        }

        let value: Value =
            serde_json::from_str(r#"{"status":"healthy","database":7,"error":"none"}"#).unwrap();
        let report = HealthReport::from_json(&value);
        assert!(report.is_healthy());
        assert_eq!(report.database, None);
        assert_eq!(report.error.as_deref(), Some("none"));
    }

    #[test]
    fn calculation_accepts_integer_and_float_results() {
        let whole: Calculation = serde_json::from_str(r#"{"result":20}"#).unwrap();
        let float: Calculation = serde_json::from_str(r#"{"result":20.0,"message":"ok"}"#).unwrap();
        assert_eq!(whole.result, 20.0);
        assert_eq!(float.message.as_deref(), Some("ok"));
    }
}
