use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::{OutputFormat, TableRow, null_as_default};

/// OCR text longer than this is cut in table output.
const OCR_PREVIEW_CHARS: usize = 100;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    #[serde(default, deserialize_with = "null_as_default")]
    pub state_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub screenshot: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ocr_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub device_uid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resolved: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matched_rule: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_updated: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct StatesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub states: Vec<State>,
}

/// Body of `POST state/update-resolve`.
#[derive(Debug, Serialize)]
pub struct UpdateResolved {
    pub state_id: i64,
    pub resolved: bool,
}

/// Server-side filter for `state/all`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StateType {
    Open,
    Unknown,
    Resolved,
}

impl StateType {
    pub fn as_str(self) -> &'static str {
        match self {
            StateType::Open => "open",
            StateType::Unknown => "unknown",
            StateType::Resolved => "resolved",
        }
    }
}

/// Shorten OCR text for table output unless details were asked for.
pub fn for_output(states: Vec<State>, details: bool, format: OutputFormat) -> Vec<State> {
    if details || format != OutputFormat::Table {
        return states;
    }
    states
        .into_iter()
        .map(|state| State {
            ocr_text: preview(&state.ocr_text),
            ..state
        })
        .collect()
}

fn preview(text: &str) -> String {
    if text.chars().count() > OCR_PREVIEW_CHARS {
        let cut: String = text.chars().take(OCR_PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

impl TableRow for State {
    fn headers() -> &'static [&'static str] {
        &["ID", "OCR Text", "Device", "Resolved", "Matched Rule", "Last Modified", "Created At"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.state_id.to_string(),
            self.ocr_text.clone(),
            self.device_uid.clone(),
            self.resolved.to_string(),
            self.matched_rule.clone(),
            self.last_updated.clone(),
            self.created_at.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_ocr_is_truncated_in_tables_only() {
        let state = State {
            state_id: 1,
            ocr_text: "x".repeat(150),
            ..State::default()
        };
        let table = for_output(vec![state.clone()], false, OutputFormat::Table);
        assert_eq!(table[0].ocr_text.len(), OCR_PREVIEW_CHARS + 3);
        assert!(table[0].ocr_text.ends_with("..."));

        let json = for_output(vec![state.clone()], false, OutputFormat::Json);
        assert_eq!(json[0].ocr_text.len(), 150);

        let detailed = for_output(vec![state], true, OutputFormat::Table);
        assert_eq!(detailed[0].ocr_text.len(), 150);
    }

    #[test]
    fn null_matched_rule_reads_as_empty() {
        let state: State =
            serde_json::from_str(r#"{"state_id":42,"ocr_text":"ERROR","matched_rule":null}"#)
                .unwrap();
        assert_eq!(state.state_id, 42);
        assert_eq!(state.matched_rule, "");
    }
}
