use serde::{Deserialize, Serialize};

use super::{TableRow, null_as_default};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub uid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ipmi_ip: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub creds_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zombie: bool,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub agent_version: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub heartbeat_timestamp: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub last_updated: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct DevicesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub devices: Vec<Device>,
}

impl TableRow for Device {
    fn headers() -> &'static [&'static str] {
        &["UID", "IPMI IP", "Creds Name", "Model", "Zombie", "Agent Version", "Last Heartbeat"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.uid.clone(),
            self.ipmi_ip.clone(),
            self.creds_name.clone(),
            self.model.clone(),
            self.zombie.to_string(),
            self.agent_version.clone(),
            self.heartbeat_timestamp.clone(),
        ]
    }
}
