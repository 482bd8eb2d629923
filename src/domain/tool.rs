//! Editing tools and their pointer cursors

use serde::{Deserialize, Serialize};

use super::annotation::ShapeKind;

/// Active editing tool
///
/// Only explicit user selection changes the tool; drawing never does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Select,
    #[default]
    Freehand,
    Circle,
    Rectangle,
    Erase,
}

/// Pointer cursor the host should show over the surface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Crosshair,
}

impl Tool {
    /// Shape kind created by a drawing tool
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Tool::Freehand => Some(ShapeKind::Freehand),
            Tool::Circle => Some(ShapeKind::Circle),
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Select | Tool::Erase => None,
        }
    }

    pub fn cursor(self) -> Cursor {
        match self {
            Tool::Select => Cursor::Default,
            _ => Cursor::Crosshair,
        }
    }

    /// Tool bound to a single-key shortcut
    pub fn from_shortcut(c: char) -> Option<Self> {
        match c {
            'v' => Some(Tool::Select),
            'p' => Some(Tool::Freehand),
            'c' => Some(Tool::Circle),
            'r' => Some(Tool::Rectangle),
            'e' => Some(Tool::Erase),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tool::Select => "Pointer",
            Tool::Freehand => "Pen",
            Tool::Circle => "Circle",
            Tool::Rectangle => "Square",
            Tool::Erase => "Eraser",
        }
    }
}
