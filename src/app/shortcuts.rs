//! Maps key presses to application actions.
//!
//! The UI reports which element has focus with every key press, so the dispatcher is a
//! pure function of its inputs.

use serde::Deserialize;

/// What currently has keyboard focus in the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusContext {
    pub text_input_focused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    ToggleSelectAll,
    CopyBundle,
    FocusSearch,
    ClearSearch,
}

/// The `keyPressed` IPC payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPress {
    pub key: String,
    /// Cmd on macOS, Ctrl elsewhere.
    #[serde(default)]
    pub modifier: bool,
    #[serde(default)]
    pub input_focused: bool,
}

impl KeyPress {
    pub fn focus(&self) -> FocusContext {
        FocusContext {
            text_input_focused: self.input_focused,
        }
    }
}

/// Resolves a key press. Select-all and copy yield to native text editing while a text
/// input has focus.
pub fn dispatch(key: &str, modifier: bool, focus: FocusContext) -> Option<ShortcutAction> {
    if key == "Escape" {
        return Some(ShortcutAction::ClearSearch);
    }
    if !modifier {
        return None;
    }
    match key.to_ascii_lowercase().as_str() {
        "a" if !focus.text_input_focused => Some(ShortcutAction::ToggleSelectAll),
        "c" if !focus.text_input_focused => Some(ShortcutAction::CopyBundle),
        "f" => Some(ShortcutAction::FocusSearch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREE: FocusContext = FocusContext {
        text_input_focused: false,
    };
    const INPUT: FocusContext = FocusContext {
        text_input_focused: true,
    };

    #[test]
    fn test_select_all_and_copy_outside_inputs() {
        assert_eq!(dispatch("a", true, TREE), Some(ShortcutAction::ToggleSelectAll));
        assert_eq!(dispatch("C", true, TREE), Some(ShortcutAction::CopyBundle));
    }

    #[test]
    fn test_inputs_keep_native_select_and_copy() {
        assert_eq!(dispatch("a", true, INPUT), None);
        assert_eq!(dispatch("c", true, INPUT), None);
    }

    #[test]
    fn test_focus_search_and_escape_work_everywhere() {
        assert_eq!(dispatch("f", true, INPUT), Some(ShortcutAction::FocusSearch));
        assert_eq!(dispatch("f", true, TREE), Some(ShortcutAction::FocusSearch));
        assert_eq!(dispatch("Escape", false, INPUT), Some(ShortcutAction::ClearSearch));
    }

    #[test]
    fn test_plain_keys_are_ignored() {
        assert_eq!(dispatch("a", false, TREE), None);
        assert_eq!(dispatch("x", true, TREE), None);
    }

    #[test]
    fn test_key_press_payload() {
        let press: KeyPress =
            serde_json::from_value(serde_json::json!({ "key": "a", "modifier": true })).unwrap();
        assert!(press.modifier);
        assert_eq!(press.focus(), FocusContext::default());
    }
}
