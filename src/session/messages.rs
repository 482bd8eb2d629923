//! Message types for an annotation session
//!
//! This module contains:
//! - PointerAction for canvas-space pointer input
//! - EditorMsg covering every user action the editor reacts to

use serde::{Deserialize, Serialize};

use crate::config::ShapeColor;
use crate::domain::{Point, Tool};

// ============================================================================
// Pointer Types
// ============================================================================

/// Pointer input already mapped into canvas space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// Button pressed at position
    Down(Point),
    /// Pointer moved to position
    Move(Point),
    /// Button released at position
    Up(Point),
    /// Pointer left the surface; ends the gesture like a release
    Leave,
}

/// Kind of raw pointer event reported by the host, before coordinate mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Leave,
}

impl PointerKind {
    /// Attach a canvas-space position to this event kind
    pub fn at(self, p: Point) -> PointerAction {
        match self {
            PointerKind::Down => PointerAction::Down(p),
            PointerKind::Move => PointerAction::Move(p),
            PointerKind::Up => PointerAction::Up(p),
            PointerKind::Leave => PointerAction::Leave,
        }
    }
}

// ============================================================================
// Editor Messages
// ============================================================================

/// All editor messages
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMsg {
    /// Canvas-space pointer input
    Pointer(PointerAction),
    /// Select the active tool
    SetTool(Tool),
    /// Set the color for new shapes
    SetColor(ShapeColor),
    /// Set the stroke width for new shapes
    SetStrokeWidth(f32),
    /// Delete the selected shape
    DeleteSelected,
    /// Undo the last shape-list change
    Undo,
    /// Redo an undone change
    Redo,
    /// Export the current composite
    Export,
    /// Close the editor
    Close,
}

impl EditorMsg {
    pub fn tool(tool: Tool) -> Self {
        EditorMsg::SetTool(tool)
    }

    pub fn delete_selected() -> Self {
        EditorMsg::DeleteSelected
    }

    pub fn undo() -> Self {
        EditorMsg::Undo
    }

    pub fn redo() -> Self {
        EditorMsg::Redo
    }

    pub fn close() -> Self {
        EditorMsg::Close
    }
}
