use serde::{Deserialize, Serialize};

use super::{TableRow, null_as_default};

/// Action name recorded for executions reported by hand with `set work`.
pub const MANUAL_REPORT: &str = "Manual report";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    #[serde(default, deserialize_with = "null_as_default")]
    pub execution_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub work_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub action_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trigger: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub elapsed_time: f32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_updated: String,
    #[serde(default)]
    pub run_data: serde_json::Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ExecutionsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub executions: Vec<Execution>,
}

impl Execution {
    /// Execution recording a manual success/failure report for `work_id`.
    pub fn manual_report(work_id: i64, trigger: &str, status: &str) -> Self {
        Self {
            work_id,
            action_name: MANUAL_REPORT.to_string(),
            trigger: trigger.to_string(),
            status: status.to_string(),
            ..Self::default()
        }
    }
}

impl TableRow for Execution {
    fn headers() -> &'static [&'static str] {
        &["Work Id", "State Id", "Action", "Trigger", "Status", "Completed At", "Run Data"]
    }

    fn cells(&self) -> Vec<String> {
        let run_data = match &self.run_data {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        vec![
            self.work_id.to_string(),
            self.state_id.to_string(),
            self.action_name.clone(),
            self.trigger.clone(),
            self.status.clone(),
            self.last_updated.clone(),
            run_data,
        ]
    }
}
