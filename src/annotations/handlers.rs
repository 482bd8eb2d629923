//! Annotation message handlers
//!
//! Turns pointer input into shape mutations according to the active tool.

use crate::domain::Tool;
use crate::session::messages::{EditorMsg, PointerAction};
use crate::session::state::AnnotationState;

/// What the host must do after a message was handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Visible state changed; the surface must be repainted
    pub redraw: bool,
    /// The composite should be exported
    pub export: bool,
    /// The editor should close
    pub close: bool,
}

impl Outcome {
    fn redraw(redraw: bool) -> Self {
        Self {
            redraw,
            ..Self::default()
        }
    }
}

/// Handle an EditorMsg, modifying the session state
///
/// Export and close are reported back to the caller, which owns the surface
/// and the close callback.
pub fn handle_editor_msg(state: &mut AnnotationState, msg: EditorMsg) -> Outcome {
    match msg {
        EditorMsg::Pointer(action) => Outcome::redraw(handle_pointer(state, action)),
        EditorMsg::SetTool(tool) => {
            let had_selection = state.selected_shape_id().is_some();
            let had_current = state.current_shape().is_some();
            state.set_tool(tool);
            log::debug!("{} tool active", tool.label());
            Outcome::redraw(had_selection || had_current)
        }
        EditorMsg::SetColor(color) => {
            state.color = color;
            Outcome::default()
        }
        EditorMsg::SetStrokeWidth(width) => {
            if width.is_finite() && width > 0.0 {
                state.stroke_width = width;
            } else {
                log::warn!("Ignoring invalid stroke width {}", width);
            }
            Outcome::default()
        }
        EditorMsg::DeleteSelected => Outcome::redraw(state.delete_selected()),
        EditorMsg::Undo => Outcome::redraw(state.undo()),
        EditorMsg::Redo => Outcome::redraw(state.redo()),
        EditorMsg::Export => Outcome {
            export: true,
            ..Outcome::default()
        },
        EditorMsg::Close => Outcome {
            close: true,
            ..Outcome::default()
        },
    }
}

/// Dispatch a pointer action to the active tool
///
/// Returns true if anything visible changed.
pub fn handle_pointer(state: &mut AnnotationState, action: PointerAction) -> bool {
    match action {
        PointerAction::Down(p) => {
            state.set_pointer_down(true);
            state.begin_gesture();
            match state.active_tool() {
                Tool::Select => {
                    let before = state.selected_shape_id();
                    let hit = state.select_at(p);
                    before != hit
                }
                Tool::Erase => state.erase_at(p) > 0,
                tool => match tool.shape_kind() {
                    Some(kind) => {
                        state.start_shape(kind, p);
                        true
                    }
                    None => false,
                },
            }
        }
        PointerAction::Move(p) => {
            if !state.is_pointer_down() {
                return false;
            }
            match state.active_tool() {
                Tool::Select => state.drag_to(p),
                Tool::Erase => state.erase_at(p) > 0,
                Tool::Freehand | Tool::Circle | Tool::Rectangle => state.extend_shape(p),
            }
        }
        PointerAction::Up(_) | PointerAction::Leave => {
            if !state.is_pointer_down() {
                return false;
            }
            state.set_pointer_down(false);
            match state.active_tool() {
                Tool::Select => {
                    state.end_drag();
                    false
                }
                Tool::Erase => false,
                Tool::Freehand | Tool::Circle | Tool::Rectangle => {
                    // Redraw either way: a discarded preview must disappear too
                    let had_current = state.current_shape().is_some();
                    state.commit_shape();
                    had_current
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Point, ShapeKind};

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    fn draw(state: &mut AnnotationState, tool: Tool, points: &[(f32, f32)]) {
        handle_editor_msg(state, EditorMsg::SetTool(tool));
        let (first, rest) = points.split_first().unwrap();
        handle_pointer(state, PointerAction::Down(p(first.0, first.1)));
        for &(x, y) in rest {
            handle_pointer(state, PointerAction::Move(p(x, y)));
        }
        let last = points.last().unwrap();
        handle_pointer(state, PointerAction::Up(p(last.0, last.1)));
    }

    #[test]
    fn test_freehand_points_equal_one_plus_moves() {
        let mut state = AnnotationState::default();
        state.set_tool(Tool::Freehand);
        handle_pointer(&mut state, PointerAction::Down(p(0.0, 0.0)));
        for i in 1..=7 {
            handle_pointer(&mut state, PointerAction::Move(p(i as f32, 1.0)));
            assert!(state.shapes().is_empty());
        }
        handle_pointer(&mut state, PointerAction::Up(p(7.0, 1.0)));
        assert_eq!(state.shapes().len(), 1);
        assert_eq!(state.shapes()[0].points.len(), 8);
        assert_eq!(state.shapes()[0].kind(), ShapeKind::Freehand);
    }

    #[test]
    fn test_circle_and_rectangle_retain_two_points() {
        for tool in [Tool::Circle, Tool::Rectangle] {
            let mut state = AnnotationState::default();
            state.set_tool(tool);
            handle_pointer(&mut state, PointerAction::Down(p(1.0, 1.0)));
            for i in 0..20 {
                handle_pointer(&mut state, PointerAction::Move(p(i as f32, 2.0 * i as f32)));
                assert!(state.current_shape().unwrap().points.len() <= 2);
            }
            handle_pointer(&mut state, PointerAction::Up(p(19.0, 38.0)));
            assert_eq!(state.shapes()[0].points, vec![p(1.0, 1.0), p(19.0, 38.0)]);
        }
    }

    #[test]
    fn test_click_without_move_commits_nothing() {
        let mut state = AnnotationState::default();
        state.set_tool(Tool::Rectangle);
        handle_pointer(&mut state, PointerAction::Down(p(5.0, 5.0)));
        handle_pointer(&mut state, PointerAction::Up(p(5.0, 5.0)));
        assert!(state.shapes().is_empty());
        assert!(state.current_shape().is_none());
    }

    #[test]
    fn test_move_without_down_is_ignored() {
        let mut state = AnnotationState::default();
        assert!(!handle_pointer(&mut state, PointerAction::Move(p(1.0, 1.0))));
        assert!(state.current_shape().is_none());
    }

    #[test]
    fn test_leave_ends_stroke() {
        let mut state = AnnotationState::default();
        state.set_tool(Tool::Freehand);
        handle_pointer(&mut state, PointerAction::Down(p(0.0, 0.0)));
        handle_pointer(&mut state, PointerAction::Move(p(4.0, 4.0)));
        handle_pointer(&mut state, PointerAction::Leave);
        assert_eq!(state.shapes().len(), 1);
        assert!(!handle_pointer(&mut state, PointerAction::Move(p(8.0, 8.0))));
        assert_eq!(state.shapes()[0].points.len(), 2);
    }

    #[test]
    fn test_select_and_drag() {
        let mut state = AnnotationState::default();
        draw(&mut state, Tool::Rectangle, &[(0.0, 0.0), (10.0, 10.0)]);
        draw(&mut state, Tool::Rectangle, &[(30.0, 30.0), (40.0, 40.0)]);
        handle_editor_msg(&mut state, EditorMsg::SetTool(Tool::Select));

        handle_pointer(&mut state, PointerAction::Down(p(5.0, 5.0)));
        let selected = state.selected_shape_id().unwrap();
        handle_pointer(&mut state, PointerAction::Move(p(6.0, 7.0)));
        handle_pointer(&mut state, PointerAction::Move(p(9.0, 9.0)));
        handle_pointer(&mut state, PointerAction::Up(p(9.0, 9.0)));

        assert_eq!(state.drag_anchor(), None);
        assert_eq!(state.selected_shape_id(), Some(selected));
        assert_eq!(
            state.shape(selected).unwrap().points,
            vec![p(4.0, 4.0), p(14.0, 14.0)]
        );
        assert_eq!(state.shapes()[1].points, vec![p(30.0, 30.0), p(40.0, 40.0)]);

        // A whole drag is one undo step
        handle_editor_msg(&mut state, EditorMsg::Undo);
        assert_eq!(state.shapes()[0].points, vec![p(0.0, 0.0), p(10.0, 10.0)]);
    }

    #[test]
    fn test_select_miss_clears_selection() {
        let mut state = AnnotationState::default();
        draw(&mut state, Tool::Rectangle, &[(0.0, 0.0), (10.0, 10.0)]);
        state.set_tool(Tool::Select);
        handle_pointer(&mut state, PointerAction::Down(p(5.0, 5.0)));
        handle_pointer(&mut state, PointerAction::Up(p(5.0, 5.0)));
        assert!(state.selected_shape_id().is_some());

        handle_pointer(&mut state, PointerAction::Down(p(50.0, 50.0)));
        assert_eq!(state.selected_shape_id(), None);
        handle_pointer(&mut state, PointerAction::Move(p(60.0, 60.0)));
        assert_eq!(state.shapes()[0].points, vec![p(0.0, 0.0), p(10.0, 10.0)]);
    }

    #[test]
    fn test_erase_along_drag_path() {
        let mut state = AnnotationState::default();
        draw(&mut state, Tool::Rectangle, &[(0.0, 0.0), (10.0, 10.0)]);
        draw(&mut state, Tool::Circle, &[(50.0, 5.0), (53.0, 5.0)]);
        draw(&mut state, Tool::Freehand, &[(100.0, 0.0), (100.0, 20.0)]);
        assert_eq!(state.shapes().len(), 3);

        state.set_tool(Tool::Erase);
        handle_pointer(&mut state, PointerAction::Down(p(5.0, 5.0)));
        assert_eq!(state.shapes().len(), 2);
        handle_pointer(&mut state, PointerAction::Move(p(50.0, 5.0)));
        assert_eq!(state.shapes().len(), 1);
        handle_pointer(&mut state, PointerAction::Up(p(50.0, 5.0)));

        // Pointer is up: moving over the last stroke erases nothing
        handle_pointer(&mut state, PointerAction::Move(p(100.0, 10.0)));
        assert_eq!(state.shapes().len(), 1);

        // The whole sweep undoes in one step
        handle_editor_msg(&mut state, EditorMsg::Undo);
        assert_eq!(state.shapes().len(), 3);
    }

    #[test]
    fn test_tool_change_clears_selection() {
        let mut state = AnnotationState::default();
        draw(&mut state, Tool::Rectangle, &[(0.0, 0.0), (10.0, 10.0)]);
        state.set_tool(Tool::Select);
        handle_pointer(&mut state, PointerAction::Down(p(5.0, 5.0)));
        handle_pointer(&mut state, PointerAction::Up(p(5.0, 5.0)));

        let outcome = handle_editor_msg(&mut state, EditorMsg::SetTool(Tool::Select));
        assert!(outcome.redraw);
        assert_eq!(state.selected_shape_id(), None);
    }

    #[test]
    fn test_delete_selected_message() {
        let mut state = AnnotationState::default();
        draw(&mut state, Tool::Rectangle, &[(0.0, 0.0), (10.0, 10.0)]);
        assert!(!handle_editor_msg(&mut state, EditorMsg::DeleteSelected).redraw);
        assert_eq!(state.shapes().len(), 1);

        state.set_tool(Tool::Select);
        handle_pointer(&mut state, PointerAction::Down(p(0.0, 0.0)));
        handle_pointer(&mut state, PointerAction::Up(p(0.0, 0.0)));
        assert!(handle_editor_msg(&mut state, EditorMsg::DeleteSelected).redraw);
        assert!(state.shapes().is_empty());
        assert_eq!(state.selected_shape_id(), None);
    }

    #[test]
    fn test_style_messages_apply_to_new_shapes() {
        let mut state = AnnotationState::default();
        let teal = crate::config::ShapeColor::rgb(0.0, 0.5, 0.5);
        handle_editor_msg(&mut state, EditorMsg::SetColor(teal));
        handle_editor_msg(&mut state, EditorMsg::SetStrokeWidth(6.0));
        handle_editor_msg(&mut state, EditorMsg::SetStrokeWidth(-1.0));
        draw(&mut state, Tool::Freehand, &[(0.0, 0.0), (5.0, 5.0)]);
        assert_eq!(state.shapes()[0].color, teal);
        assert_eq!(state.shapes()[0].stroke_width, 6.0);
    }
}
