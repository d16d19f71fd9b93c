use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use super::{Action, TableRow, null_as_default};

/// Status of a work item that has not been reported yet.
pub const PENDING: &str = "PENDING";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    #[serde(default, deserialize_with = "null_as_default")]
    pub work_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub device_uid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions: Vec<Action>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trigger: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assigned: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_updated: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct WorksResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub works: Vec<Work>,
}

/// Body of `POST work/`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WorkAssignment {
    pub device_uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
}

/// Body of `POST work/by-id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WorkCompleted {
    pub work_id: i64,
    pub status: String,
}

/// The device's most recent work, which must still be pending.
pub fn latest_pending<'a>(works: &'a [Work], device_uid: &str) -> Result<&'a Work> {
    match works.last() {
        Some(work) if work.status == PENDING => Ok(work),
        _ => bail!("No pending work found for device: {device_uid}"),
    }
}

impl TableRow for Work {
    fn headers() -> &'static [&'static str] {
        &["Id", "State Id", "Device", "Trigger", "Assigned At", "Status"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.work_id.to_string(),
            self.state_id.to_string(),
            self.device_uid.clone(),
            self.trigger.clone(),
            self.assigned.clone(),
            self.status.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(id: i64, status: &str) -> Work {
        Work {
            work_id: id,
            status: status.into(),
            ..Work::default()
        }
    }

    #[test]
    fn latest_pending_uses_last_entry() {
        let works = vec![work(1, PENDING), work(2, "SUCCESS")];
        let err = latest_pending(&works, "dev-1").unwrap_err();
        assert_eq!(err.to_string(), "No pending work found for device: dev-1");

        let works = vec![work(1, "FAILURE"), work(2, PENDING)];
        assert_eq!(latest_pending(&works, "dev-1").unwrap().work_id, 2);
    }

    #[test]
    fn latest_pending_with_no_work() {
        assert!(latest_pending(&[], "dev-1").is_err());
    }

    #[test]
    fn assignment_omits_unset_fields() {
        let body = WorkAssignment {
            device_uid: "dev-1".into(),
            rule: None,
            actions: vec!["reboot".into()],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"device_uid": "dev-1", "actions": ["reboot"]})
        );
    }
}
