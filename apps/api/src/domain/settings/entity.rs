use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Key of the singleton settings row.
pub const APPROVALS_ENABLED_KEY: &str = "approvals_enabled";

/// Global moderation switches. Last write wins, no history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AppSettings {
    pub approvals_enabled: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            approvals_enabled: true,
        }
    }
}

impl AppSettings {
    /// Interprets the stored JSON value of the `approvals_enabled` key.
    ///
    /// Accepts `{"enabled": bool}` or a bare boolean. Absent or unparsable
    /// values fall back to enabled.
    pub fn from_stored(value: Option<&serde_json::Value>) -> Self {
        let approvals_enabled = match value {
            Some(serde_json::Value::Bool(enabled)) => *enabled,
            Some(serde_json::Value::Object(map)) => {
                map.get("enabled").and_then(serde_json::Value::as_bool).unwrap_or(true)
            }
            _ => true,
        };
        Self { approvals_enabled }
    }

    pub fn to_stored(&self) -> serde_json::Value {
        serde_json::json!({ "enabled": self.approvals_enabled })
    }
}
