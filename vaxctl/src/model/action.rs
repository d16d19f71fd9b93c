use serde::{Deserialize, Serialize};

use super::{TableRow, null_as_default};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub action_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub action_data: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub last_updated: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ActionsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions: Vec<Action>,
}

#[derive(Debug, Deserialize)]
pub struct ActionTypesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub action_types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PowerOptionsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub power_options: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpecialKeysResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub special_keys: Vec<String>,
}

impl TableRow for Action {
    fn headers() -> &'static [&'static str] {
        &["Name", "Type", "Data"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.action_type.clone(),
            self.action_data.clone(),
        ]
    }
}

// ---------------------------------------------------------------------------
// `create action -I --details`
// ---------------------------------------------------------------------------

struct TypeInfo {
    action_type: &'static str,
    value: &'static str,
    additional: String,
    example: &'static str,
}

const KEYSTROKE_HELP: &str = "A list of key combos (either a string to send or multiple keys to be pressed at once):
 - string: the string as it should be entered (each key will be pressed in sequence)
 - multiple keys: separated by '+' (special keys can be used by prepending 'Keys.' to the key name)
List of special keys:";

/// Device attributes that can be interpolated into action data.
const ATTRIBUTES: &[[&str; 5]] = &[
    ["device", "uid", "System", "the device's UID", "{device::uid}"],
    ["device", "ipmi_ip", "System", "the device's ipmi IP", "{device::ipmi_ip}"],
    ["device", "model", "System", "the device's model", "{device::model}"],
    ["cred", "username", "System", "the device's cred username", "{cred::username}"],
    ["cred", "password", "System", "the device's cred password", "{cred::password}"],
    [
        "metadata",
        "*",
        "User",
        "the value of the nested key from the device's metadata",
        "{metadata::ANY_KEY}",
    ],
    [
        "cred_store",
        "CRED_NAME::username",
        "System",
        "a username from an existing cred",
        "{cred_store::CRED_NAME::username}",
    ],
    [
        "cred_store",
        "CRED_NAME::password",
        "System",
        "a password from an existing cred",
        "{cred_store::CRED_NAME::password}",
    ],
];

/// Describe every action type, what its data string means, and the device
/// attributes that can be used inside it.
pub fn detailed_types_report(power_options: &[String], special_keys: &[String]) -> String {
    let types = [
        TypeInfo {
            action_type: "sleep",
            value: "number of seconds to sleep",
            additional: "only digits are allowed".into(),
            example: "10",
        },
        TypeInfo {
            action_type: "power",
            value: "power action to send via ipmitool",
            additional: format!("one of: [{}]", power_options.join(", ")),
            example: "on",
        },
        TypeInfo {
            action_type: "ipmitool",
            value: "free text",
            additional: "will be appended to ipmitool command".into(),
            example: "lan print",
        },
        TypeInfo {
            action_type: "keystroke",
            value: "a ';' separated list of key combos",
            additional: wrap(
                &format!("{KEYSTROKE_HELP}\n[{}]", special_keys.join(", ")),
                100,
            ),
            example: "Keys.Control+c;exit;Keys.Enter",
        },
        TypeInfo {
            action_type: "request",
            value: "URI for GET request",
            additional: "must start with protocol".into(),
            example: "http://myservice:8080/resolve?uid={device::uid}",
        },
    ];

    let mut out = String::new();
    for info in &types {
        let rows = [
            ("Action Type:", info.action_type.to_string()),
            ("String Value:", info.value.to_string()),
            ("Additional Data:", info.additional.clone()),
            ("Example:", info.example.to_string()),
        ];
        for (label, value) in rows {
            let mut lines = value.lines();
            out.push_str(&format!(
                "{} {}\n",
                crate::style::bold(&format!("{label:<17}")),
                lines.next().unwrap_or_default()
            ));
            for rest in lines {
                out.push_str(&format!("{:<17} {rest}\n", ""));
            }
        }
        out.push('\n');
    }

    out.push_str("You can use a device's attributes in the action data string.\n");
    out.push_str("Available attributes:\n");
    let headers = ["BASE KEY", "NESTED KEY", "DEFINED BY", "DESCRIPTION", "USAGE"];
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in ATTRIBUTES {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }
    let fmt_row = |cells: &[&str]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    out.push_str(&crate::style::header(&fmt_row(&headers)));
    out.push('\n');
    for row in ATTRIBUTES {
        out.push_str(&fmt_row(row));
        out.push('\n');
    }
    out
}

/// Greedy word wrap that keeps existing line breaks.
fn wrap(text: &str, width: usize) -> String {
    let mut wrapped = Vec::new();
    for line in text.lines() {
        let mut current = String::new();
        for word in line.split(' ') {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
                wrapped.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        wrapped.push(current);
    }
    wrapped.join("\n")
}
