use serde::{Deserialize, Serialize};

use crate::domain::Tool;
use crate::session::messages::EditorMsg;
use crate::session::state::AnnotationState;

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Character(char),
}

/// Modifier keys held during a key press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub control: bool,
    #[serde(default)]
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        control: false,
        shift: false,
    };

    pub fn control(&self) -> bool {
        self.control
    }

    pub fn shift(&self) -> bool {
        self.shift
    }
}

pub fn handle_key_event(
    state: &AnnotationState,
    key: Key,
    modifiers: Modifiers,
) -> Option<EditorMsg> {
    let has_selection = state.selected_shape_id().is_some();

    match key {
        // Delete/Backspace only act on a selected shape
        Key::Delete | Key::Backspace if has_selection => Some(EditorMsg::delete_selected()),
        Key::Delete | Key::Backspace => None,
        Key::Escape => Some(EditorMsg::close()),
        // Undo/redo shortcuts
        Key::Character(c)
            if c.eq_ignore_ascii_case(&'z') && modifiers.control() && !modifiers.shift() =>
        {
            Some(EditorMsg::undo())
        }
        Key::Character(c)
            if (c.eq_ignore_ascii_case(&'y') && modifiers.control())
                || (c.eq_ignore_ascii_case(&'z') && modifiers.control() && modifiers.shift()) =>
        {
            Some(EditorMsg::redo())
        }
        // Plain letters pick tools
        Key::Character(c) if !modifiers.control() => Tool::from_shortcut(c).map(EditorMsg::tool),
        Key::Character(_) => None,
    }
}
