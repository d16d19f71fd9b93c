use serde::{Deserialize, Serialize};

use super::{OutputFormat, TableRow, null_as_default};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cred {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub password: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "std::ops::Not::not")]
    pub is_default: bool,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub last_updated: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CredsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub creds: Vec<Cred>,
}

/// One `*` per password character.
pub fn mask(password: &str) -> String {
    "*".repeat(password.chars().count())
}

/// Table output never shows passwords in clear.
pub fn for_output(creds: Vec<Cred>, format: OutputFormat) -> Vec<Cred> {
    if format != OutputFormat::Table {
        return creds;
    }
    creds
        .into_iter()
        .map(|cred| Cred {
            password: mask(&cred.password),
            ..cred
        })
        .collect()
}

impl TableRow for Cred {
    fn headers() -> &'static [&'static str] {
        &["Name", "Username", "Password", "Default"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.username.clone(),
            self.password.clone(),
            self.is_default.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_output_masks_passwords() {
        let cred = Cred {
            name: "bmc".into(),
            username: "admin".into(),
            password: "hunter2".into(),
            ..Cred::default()
        };
        let masked = for_output(vec![cred.clone()], OutputFormat::Table);
        assert_eq!(masked[0].password, "*******");
        let yaml = for_output(vec![cred], OutputFormat::Yaml);
        assert_eq!(yaml[0].password, "hunter2");
    }

    #[test]
    fn is_default_only_serialized_when_set() {
        let cred = Cred {
            name: "bmc".into(),
            ..Cred::default()
        };
        let json = serde_json::to_value(&cred).unwrap();
        assert!(json.get("is_default").is_none());
    }
}
