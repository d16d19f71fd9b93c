use serde::{Deserialize, Serialize};

use super::{TableRow, default_true, is_zero, null_as_default};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    /// State the rule was derived from. Kept so editing can re-fetch its OCR text.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_zero")]
    pub state_id: i64,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub regex: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
    #[serde(default = "default_true")]
    pub ignore_case: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_zero")]
    pub position: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_rule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_rule: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub screenshot: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub ocr_text: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub last_updated: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            name: String::new(),
            state_id: 0,
            regex: String::new(),
            actions: Vec::new(),
            ignore_case: true,
            enabled: true,
            position: 0,
            after_rule: None,
            before_rule: None,
            screenshot: String::new(),
            ocr_text: String::new(),
            last_updated: String::new(),
            created_at: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RulesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Vec<Rule>,
}

/// Relative position directive for a rule. The server keeps rule order as a
/// linked relation, so moves are expressed against a neighbour.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    AfterRule(String),
    BeforeRule(String),
}

/// Body of a placement update: `{"name": .., "after_rule" | "before_rule": ..}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RulePlacement {
    pub name: String,
    #[serde(flatten)]
    pub placement: Placement,
}

/// Drop the bulky screenshot and OCR payloads unless details were asked for.
pub fn for_output(rules: Vec<Rule>, details: bool) -> Vec<Rule> {
    if details {
        return rules;
    }
    rules
        .into_iter()
        .map(|rule| Rule {
            screenshot: String::new(),
            ocr_text: String::new(),
            ..rule
        })
        .collect()
}

impl TableRow for Rule {
    fn headers() -> &'static [&'static str] {
        &["Name", "State Id", "Regex", "Actions", "Ignore Case", "Enabled", "Position"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.state_id.to_string(),
            self.regex.clone(),
            self.actions.join(", "),
            self.ignore_case.to_string(),
            self.enabled.to_string(),
            self.position.to_string(),
        ]
    }
}
