//! YAML skeletons for `vaxctl generate`.
//!
//! Each resource is described as a list of [`PropInfo`]s. A template is one
//! `key: ` line per prop, optionally preceded by a comment block describing
//! the prop. Optional props are commented out so the file can be applied
//! as soon as the mandatory values are filled in.

use std::fmt::Write;

/// Description of one top-level key of a resource definition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropInfo {
    pub name: &'static str,
    pub kind: &'static str,
    pub desc: &'static str,
    pub default: Option<String>,
    pub constraints: Vec<(&'static str, String)>,
    pub mandatory: bool,
    /// Shape of the elements of an array prop.
    pub items: Vec<(&'static str, String)>,
}

impl PropInfo {
    fn new(name: &'static str, kind: &'static str, desc: &'static str, mandatory: bool) -> Self {
        Self {
            name,
            kind,
            desc,
            mandatory,
            ..Self::default()
        }
    }

    fn with_default(mut self, default: impl ToString) -> Self {
        self.default = Some(default.to_string());
        self
    }

    fn with_constraint(mut self, key: &'static str, value: String) -> Self {
        self.constraints.push((key, value));
        self
    }

    fn with_item(mut self, key: &'static str, value: String) -> Self {
        self.items.push((key, value));
        self
    }
}

fn enumeration(values: &[String]) -> String {
    format!("[{}]", values.join(", "))
}

fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn prop_comment(prop: &PropInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "### {}", prop.name);
    let _ = writeln!(out, "# {}", prop.desc);
    let _ = writeln!(out, "# Type - {}", prop.kind);
    let _ = writeln!(out, "# Mandatory - {}", prop.mandatory);
    let _ = writeln!(
        out,
        "# Default - {}",
        prop.default.as_deref().unwrap_or("None")
    );
    if prop.constraints.is_empty() {
        let _ = writeln!(out, "# Constraints - None");
    } else {
        let constraints: Vec<String> = prop
            .constraints
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect();
        let _ = writeln!(out, "# Constraints - {}", constraints.join(", "));
    }
    if !prop.items.is_empty() {
        let _ = writeln!(out, "# Array Items:");
        for (key, value) in &prop.items {
            let _ = writeln!(out, "  # {} - {}", title_case(key), value);
        }
    }
    out
}

/// One prop, or `None` when `mandatory_only` filters it out.
pub fn generate_prop(prop: &PropInfo, mandatory_only: bool, comments: bool) -> Option<String> {
    if mandatory_only && !prop.mandatory {
        return None;
    }
    let mut out = if comments {
        prop_comment(prop)
    } else {
        String::new()
    };
    let prefix = if prop.mandatory { "" } else { "#" };
    let _ = write!(out, "{prefix}{}: ", prop.name);
    if !prop.items.is_empty() {
        let _ = write!(out, "\n{prefix}  -");
    }
    Some(out)
}

/// The whole template. Props are separated by a blank line when comments are
/// on, so each comment block stays attached to its key.
pub fn generate(props: &[PropInfo], mandatory_only: bool, comments: bool) -> String {
    let separator = if comments { "\n\n" } else { "\n" };
    props
        .iter()
        .filter_map(|prop| generate_prop(prop, mandatory_only, comments))
        .map(|prop| prop + separator)
        .collect()
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

const PLACEMENT_UNIQUE: &str = "only one of [before_rule, after_rule] can be set";
const SOURCE_UNIQUE: &str = "one of [state_id, screenshot] MUST be set (screenshot takes precedence)";

/// Rule template. `actions` and `rules` are the names currently on the server.
pub fn rule_props(actions: &[String], rules: &[String]) -> Vec<PropInfo> {
    let placement = |name, desc| {
        PropInfo::new(name, "string", desc, false)
            .with_constraint("enum", enumeration(rules))
            .with_constraint("unique", PLACEMENT_UNIQUE.to_string())
    };
    vec![
        PropInfo::new("name", "string", "logical name of the rule", true),
        PropInfo::new(
            "state_id",
            "integer",
            "ID of the state from which to take the screenshot from",
            false,
        )
        .with_constraint("unique", SOURCE_UNIQUE.to_string()),
        PropInfo::new(
            "screenshot",
            "string",
            "base64 string of the screenshot image",
            false,
        )
        .with_constraint("unique", SOURCE_UNIQUE.to_string()),
        PropInfo::new("regex", "string", "regex to use for matching states", true),
        PropInfo::new("actions", "array", "list of actions to use", true)
            .with_item("type", "string".to_string())
            .with_item("enum", enumeration(actions)),
        PropInfo::new(
            "ignore_case",
            "boolean",
            "whether the regex should ignore case (not case-sensitive)",
            false,
        )
        .with_default(true),
        PropInfo::new("enabled", "boolean", "should the rule be enabled", false).with_default(true),
        placement(
            "after_rule",
            "after which rule name should it be placed (if not set new rules will be added last)",
        ),
        placement(
            "before_rule",
            "before which rule name should it be placed (if not set new rules will be added last)",
        ),
    ]
}

pub fn action_props(action_types: &[String]) -> Vec<PropInfo> {
    vec![
        PropInfo::new("name", "string", "logical name of the action", true),
        PropInfo::new("action_type", "string", "action type", true)
            .with_constraint("enum", enumeration(action_types)),
        PropInfo::new(
            "action_data",
            "string",
            "string with the action data (based on type), for more info use 'create action -I --details'",
            true,
        ),
    ]
}

/// Device template. `creds` are the cred names on the server; `default` is
/// always offered first.
pub fn device_props(creds: &[String]) -> Vec<PropInfo> {
    let mut options = vec!["default".to_string()];
    options.extend(creds.iter().cloned());
    vec![
        PropInfo::new("uid", "string", "UID of the device", true),
        PropInfo::new("ipmi_ip", "string", "IPMI IP of the device", true),
        PropInfo::new("model", "string", "device HW model", true),
        PropInfo::new(
            "creds_name",
            "string",
            "Credential name to use (if not set on creation default will be used)",
            false,
        )
        .with_constraint("enum", enumeration(&options)),
        PropInfo::new(
            "zombie",
            "boolean",
            "Whether the device will be a zombie",
            false,
        )
        .with_default(false),
    ]
}

pub fn cred_props() -> Vec<PropInfo> {
    vec![
        PropInfo::new("name", "string", "logical name for the credentials", true),
        PropInfo::new("username", "string", "username for credentials", true),
        PropInfo::new("password", "string", "password for credentials", true),
    ]
}

pub fn state_props() -> Vec<PropInfo> {
    vec![
        PropInfo::new(
            "device_uid",
            "string",
            "UID of the device the screenshot is from",
            true,
        ),
        PropInfo::new(
            "screenshot",
            "string",
            "base64 string of the screenshot image",
            true,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn plain_template_comments_out_optional_keys() {
        let out = generate(&device_props(&names(&["bmc"])), false, false);
        assert_eq!(
            out,
            "uid: \nipmi_ip: \nmodel: \n#creds_name: \n#zombie: \n"
        );
    }

    #[test]
    fn mandatory_only_skips_optional_keys() {
        let out = generate(&device_props(&[]), true, false);
        assert_eq!(out, "uid: \nipmi_ip: \nmodel: \n");
    }

    #[test]
    fn comment_block_describes_the_prop() {
        let props = device_props(&names(&["bmc", "ilo"]));
        let creds = generate_prop(&props[3], false, true).unwrap();
        assert_eq!(
            creds,
            "### creds_name\n\
             # Credential name to use (if not set on creation default will be used)\n\
             # Type - string\n\
             # Mandatory - false\n\
             # Default - None\n\
             # Constraints - enum: [default, bmc, ilo]\n\
             #creds_name: "
        );
        let zombie = generate_prop(&props[4], false, true).unwrap();
        assert!(zombie.contains("# Default - false\n"), "{zombie}");
        assert!(zombie.contains("# Constraints - None\n"), "{zombie}");
    }

    #[test]
    fn array_props_list_their_items() {
        let props = rule_props(&names(&["reboot", "wait"]), &[]);
        let actions = generate_prop(&props[4], false, true).unwrap();
        assert!(actions.contains("# Array Items:\n"), "{actions}");
        assert!(actions.contains("  # Type - string\n"), "{actions}");
        assert!(actions.contains("  # Enum - [reboot, wait]\n"), "{actions}");
        assert!(actions.ends_with("actions: \n  -"), "{actions}");
    }

    #[test]
    fn commented_template_separates_props_with_blank_lines() {
        let out = generate(&cred_props(), false, true);
        assert_eq!(out.matches("\n\n###").count(), 2);
        assert!(out.ends_with("password: \n\n"));
    }

    #[test]
    fn rule_placement_lists_existing_rules() {
        let props = rule_props(&[], &names(&["a", "b"]));
        let after = props.iter().find(|p| p.name == "after_rule").unwrap();
        assert!(!after.mandatory);
        assert_eq!(after.constraints[0], ("enum", "[a, b]".to_string()));
        assert_eq!(after.constraints[1].0, "unique");
    }
}
