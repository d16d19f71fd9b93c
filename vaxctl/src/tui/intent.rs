//! Follow-up messages produced by widgets and sub-models.
//!
//! Key handlers never reach across components directly. They return intents,
//! which the app queues and delivers one at a time until the queue is empty.

/// The four panes every resource screen is split into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Main,
    Data,
    Dynamic,
    Viewer,
}

impl View {
    pub const ALL: [View; 4] = [View::Main, View::Data, View::Dynamic, View::Viewer];

    pub fn next(self) -> View {
        let i = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> View {
        let i = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Jump shortcut: `!` `@` `#` `$`.
    pub fn from_shortcut(c: char) -> Option<View> {
        match c {
            '!' => Some(View::Main),
            '@' => Some(View::Data),
            '#' => Some(View::Dynamic),
            '$' => Some(View::Viewer),
            _ => None,
        }
    }
}

/// What the dynamic pane is showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DynamicView {
    /// Editor for the data field with this title.
    Field(&'static str),
    /// Path prompt for "Save To File".
    YamlSave,
    /// Read-only YAML dump from "Show YAML".
    YamlPreview,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MainAction {
    ShowYaml,
    SaveToFile,
    SaveToServer,
    CreateRuleFromState,
    ClearFields,
    Back,
}

impl MainAction {
    pub fn label(self) -> &'static str {
        match self {
            MainAction::ShowYaml => "Show YAML",
            MainAction::SaveToFile => "Save To File",
            MainAction::SaveToServer => "Save To Server",
            MainAction::CreateRuleFromState => "Create Rule from State",
            MainAction::ClearFields => "Clear Fields",
            MainAction::Back => "Back",
        }
    }
}

pub const RESOURCE_ACTIONS: &[MainAction] = &[
    MainAction::ShowYaml,
    MainAction::SaveToFile,
    MainAction::SaveToServer,
    MainAction::ClearFields,
    MainAction::Back,
];

pub const STATE_ACTIONS: &[MainAction] = &[
    MainAction::SaveToServer,
    MainAction::CreateRuleFromState,
    MainAction::ClearFields,
    MainAction::Back,
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Leave the dynamic pane, committing the editor's value when `save`.
    ExitDynamicView { save: bool },
    ApplyMainAction(MainAction),
    SetDynamicView(DynamicView),
    /// A boolean field was flipped in the data panel.
    UpdateToggleValue { name: &'static str, value: bool },
    BackToNavigation,
    /// Load the highlighted table row into the editor.
    EditItem,
    /// Open the rule editor on this state's OCR text.
    CreateRule { state_id: i64 },
    /// Mark the highlighted credential as the pending default.
    SetAsDefault,
    UpdateCredNames,
    UpdateActionNames,
    RefreshData,
    /// Commit (`save`) or discard pending table edits.
    ApplyTableChange { save: bool },
    ChangeOrder { up: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_cycle_both_ways() {
        assert_eq!(View::Viewer.next(), View::Main);
        assert_eq!(View::Main.prev(), View::Viewer);
        assert_eq!(View::Data.next(), View::Dynamic);
    }

    #[test]
    fn shortcuts_map_in_pane_order() {
        let views: Vec<_> = "!@#$".chars().filter_map(View::from_shortcut).collect();
        assert_eq!(views, View::ALL);
        assert_eq!(View::from_shortcut('%'), None);
    }
}
