//! Scripted editor sessions
//!
//! A script is a JSON array of steps replayed against an [`AnnotationCanvas`]
//! as if a user produced them, e.g.
//!
//! ```json
//! [
//!   { "action": "tool", "tool": "rectangle" },
//!   { "action": "pointer", "kind": "down", "x": 10, "y": 10 },
//!   { "action": "pointer", "kind": "move", "x": 50, "y": 40 },
//!   { "action": "pointer", "kind": "up", "x": 50, "y": 40 }
//! ]
//! ```
//!
//! Pointer positions are client coordinates relative to the surface bounds
//! passed to [`run_script`].

use std::io::Read;
use std::path::Path;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::config::ShapeColor;
use crate::core::canvas::AnnotationCanvas;
use crate::domain::{Bounds, Point, Tool};
use crate::session::messages::{EditorMsg, PointerKind};
use crate::session::shortcuts::{Key, Modifiers};

/// One replayed user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ScriptStep {
    Tool {
        tool: Tool,
    },
    Color {
        hex: String,
    },
    Width {
        width: f32,
    },
    Pointer {
        kind: PointerKind,
        x: f32,
        y: f32,
    },
    Key {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Delete,
    Undo,
    Redo,
    Export,
    Close,
}

/// Summary of a replayed script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptReport {
    pub steps: usize,
    pub redraws: usize,
    pub exports: usize,
}

/// Parse a script from a file, or stdin when `path` is `-`
pub fn load_script(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read script from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?
    };
    parse_script(&text)
}

pub fn parse_script(text: &str) -> anyhow::Result<Vec<ScriptStep>> {
    serde_json::from_str(text).context("Failed to parse script")
}

/// Replay `steps` against a ready canvas
pub fn run_script(
    canvas: &mut AnnotationCanvas,
    bounds: Bounds,
    steps: &[ScriptStep],
) -> anyhow::Result<ScriptReport> {
    let mut report = ScriptReport::default();

    for (index, step) in steps.iter().enumerate() {
        if canvas.is_closed() {
            log::warn!("Editor closed at step {}, skipping the rest", index);
            break;
        }
        let outcome = match step {
            ScriptStep::Tool { tool } => canvas.dispatch(EditorMsg::SetTool(*tool)),
            ScriptStep::Color { hex } => {
                let Some(color) = ShapeColor::from_hex(hex) else {
                    bail!("Step {}: invalid color {:?}", index, hex);
                };
                canvas.dispatch(EditorMsg::SetColor(color))
            }
            ScriptStep::Width { width } => canvas.dispatch(EditorMsg::SetStrokeWidth(*width)),
            ScriptStep::Pointer { kind, x, y } => {
                if canvas.pointer_event(Point::new(*x, *y), bounds, *kind) {
                    report.redraws += 1;
                }
                report.steps += 1;
                continue;
            }
            ScriptStep::Key { key, modifiers } => canvas.key_event(*key, *modifiers),
            ScriptStep::Delete => canvas.dispatch(EditorMsg::DeleteSelected),
            ScriptStep::Undo => canvas.dispatch(EditorMsg::Undo),
            ScriptStep::Redo => canvas.dispatch(EditorMsg::Redo),
            ScriptStep::Export => canvas.dispatch(EditorMsg::Export),
            ScriptStep::Close => canvas.dispatch(EditorMsg::Close),
        };
        report.steps += 1;
        if outcome.redraw {
            report.redraws += 1;
        }
        if outcome.export {
            report.exports += 1;
        }
    }

    log::debug!("Script finished: {:?}", report);
    Ok(report)
}
