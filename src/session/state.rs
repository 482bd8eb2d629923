use crate::config::{EditorConfig, ShapeColor};
use crate::domain::{Point, Shape, ShapeId, ShapeKind, Tool};

/// Bounded in-memory undo/redo stacks of shape-list snapshots
#[derive(Clone, Debug)]
pub struct History {
    undo: Vec<Vec<Shape>>,
    redo: Vec<Vec<Shape>>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// Remember `shapes` as the state to return to on undo
    pub fn record(&mut self, shapes: &[Shape]) {
        if self.limit == 0 {
            return;
        }
        self.redo.clear();
        self.undo.push(shapes.to_vec());
        if self.undo.len() > self.limit {
            self.undo.remove(0);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    fn undo(&mut self, current: &[Shape]) -> Option<Vec<Shape>> {
        let previous = self.undo.pop()?;
        self.redo.push(current.to_vec());
        Some(previous)
    }

    fn redo(&mut self, current: &[Shape]) -> Option<Vec<Shape>> {
        let next = self.redo.pop()?;
        self.undo.push(current.to_vec());
        Some(next)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(EditorConfig::default().history_limit)
    }
}

/// Editing state for one annotation session
///
/// Shapes are kept in insertion order, which doubles as z-order: later shapes
/// draw on top and win hit-test ties. Every mutation goes through a named
/// operation so the completion and point-count invariants hold everywhere.
#[derive(Clone, Debug)]
pub struct AnnotationState {
    shapes: Vec<Shape>,
    active_tool: Tool,
    current_shape: Option<Shape>,
    selected_shape_id: Option<ShapeId>,
    drag_anchor: Option<Point>,
    /// Color for new shapes
    pub color: ShapeColor,
    /// Stroke width for new shapes
    pub stroke_width: f32,
    pointer_down: bool,
    gesture_recorded: bool,
    next_id: u64,
    history: History,
}

impl Default for AnnotationState {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl AnnotationState {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            shapes: Vec::new(),
            active_tool: config.default_tool,
            current_shape: None,
            selected_shape_id: None,
            drag_anchor: None,
            color: config.shape_color,
            stroke_width: config.stroke_width,
            pointer_down: false,
            gesture_recorded: false,
            next_id: 1,
            history: History::new(config.history_limit),
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    pub fn current_shape(&self) -> Option<&Shape> {
        self.current_shape.as_ref()
    }

    pub fn selected_shape_id(&self) -> Option<ShapeId> {
        self.selected_shape_id
    }

    pub fn drag_anchor(&self) -> Option<Point> {
        self.drag_anchor
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }

    pub(crate) fn set_pointer_down(&mut self, down: bool) {
        self.pointer_down = down;
    }

    fn allocate_id(&mut self) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Mark the start of a pointer gesture
    ///
    /// A whole erase sweep or drag becomes a single undo step.
    pub fn begin_gesture(&mut self) {
        self.gesture_recorded = false;
    }

    fn record_once_per_gesture(&mut self) {
        if !self.gesture_recorded {
            self.history.record(&self.shapes);
            self.gesture_recorded = true;
        }
    }

    /// Switch tools, dropping selection and any unfinished shape
    pub fn set_tool(&mut self, tool: Tool) {
        if tool != self.active_tool {
            log::debug!("Tool {:?} -> {:?}", self.active_tool, tool);
        }
        self.active_tool = tool;
        self.selected_shape_id = None;
        self.drag_anchor = None;
        self.current_shape = None;
        self.pointer_down = false;
    }

    /// Begin drawing a new shape anchored at `p`
    pub fn start_shape(&mut self, kind: ShapeKind, p: Point) -> ShapeId {
        let id = self.allocate_id();
        self.current_shape = Some(Shape::new(id, kind, p, self.color, self.stroke_width));
        id
    }

    /// Feed a pointer position into the in-progress shape
    pub fn extend_shape(&mut self, p: Point) -> bool {
        match self.current_shape.as_mut() {
            Some(shape) => {
                shape.extend(p);
                true
            }
            None => false,
        }
    }

    /// Move the in-progress shape into the shape list if it is complete
    ///
    /// Incomplete shapes (a click without movement) are discarded.
    pub fn commit_shape(&mut self) -> Option<ShapeId> {
        let shape = self.current_shape.take()?;
        if !shape.is_complete() {
            log::debug!(
                "Discarding incomplete {:?} with {} point(s)",
                shape.kind(),
                shape.points.len()
            );
            return None;
        }
        self.history.record(&self.shapes);
        let id = shape.id;
        log::debug!("Committed {:?} {:?} ({} points)", shape.kind(), id, shape.points.len());
        self.shapes.push(shape);
        Some(id)
    }

    /// Top-most complete shape under `p`
    pub fn hit_test(&self, p: Point) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .find(|s| s.contains_point(p))
            .map(|s| s.id)
    }

    /// Select the top-most shape under `p`, or clear the selection
    pub fn select_at(&mut self, p: Point) -> Option<ShapeId> {
        self.selected_shape_id = self.hit_test(p);
        self.drag_anchor = self.selected_shape_id.map(|_| p);
        self.selected_shape_id
    }

    /// Move every point of a shape by `delta`
    pub fn translate_shape(&mut self, id: ShapeId, delta: Point) -> bool {
        if !self.shapes.iter().any(|s| s.id == id) {
            return false;
        }
        self.record_once_per_gesture();
        match self.shapes.iter_mut().find(|s| s.id == id) {
            Some(shape) => {
                shape.translate(delta);
                true
            }
            None => false,
        }
    }

    /// Drag the selected shape so it follows the pointer
    pub fn drag_to(&mut self, p: Point) -> bool {
        let (Some(id), Some(anchor)) = (self.selected_shape_id, self.drag_anchor) else {
            return false;
        };
        let delta = p.delta_from(anchor);
        self.drag_anchor = Some(p);
        if delta == Point::default() {
            return false;
        }
        self.translate_shape(id, delta)
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    /// Remove a shape; clears the selection if it pointed at it
    pub fn delete_shape(&mut self, id: ShapeId) -> bool {
        let Some(index) = self.shapes.iter().position(|s| s.id == id) else {
            return false;
        };
        self.history.record(&self.shapes);
        self.shapes.remove(index);
        if self.selected_shape_id == Some(id) {
            self.selected_shape_id = None;
            self.drag_anchor = None;
        }
        log::debug!("Deleted {:?}", id);
        true
    }

    /// Remove the selected shape; no-op without a selection
    pub fn delete_selected(&mut self) -> bool {
        match self.selected_shape_id {
            Some(id) => self.delete_shape(id),
            None => false,
        }
    }

    /// Remove every shape whose geometry contains `p`
    pub fn erase_at(&mut self, p: Point) -> usize {
        let hits = self.shapes.iter().filter(|s| s.contains_point(p)).count();
        if hits == 0 {
            return 0;
        }
        self.record_once_per_gesture();
        self.shapes.retain(|s| !s.contains_point(p));
        if let Some(id) = self.selected_shape_id
            && !self.shapes.iter().any(|s| s.id == id)
        {
            self.selected_shape_id = None;
            self.drag_anchor = None;
        }
        log::debug!("Erased {} shape(s) at ({:.1}, {:.1})", hits, p.x, p.y);
        hits
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.shapes) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.shapes) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
        self.current_shape = None;
        self.drag_anchor = None;
        if let Some(id) = self.selected_shape_id
            && !self.shapes.iter().any(|s| s.id == id)
        {
            self.selected_shape_id = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(state: &mut AnnotationState, a: (f32, f32), b: (f32, f32)) -> ShapeId {
        state.start_shape(ShapeKind::Rectangle, Point::new(a.0, a.1));
        state.extend_shape(Point::new(b.0, b.1));
        state.commit_shape().unwrap()
    }

    #[test]
    fn test_freehand_commit_counts_points() {
        let mut state = AnnotationState::default();
        state.start_shape(ShapeKind::Freehand, Point::new(0.0, 0.0));
        for i in 1..=5 {
            state.extend_shape(Point::new(i as f32, 0.0));
            assert!(state.shapes().is_empty());
        }
        let id = state.commit_shape().unwrap();
        assert_eq!(state.shape(id).unwrap().points.len(), 6);
        assert!(state.current_shape().is_none());
    }

    #[test]
    fn test_click_without_move_is_discarded() {
        let mut state = AnnotationState::default();
        state.start_shape(ShapeKind::Circle, Point::new(3.0, 3.0));
        assert_eq!(state.commit_shape(), None);
        assert!(state.shapes().is_empty());
        assert!(!state.history().can_undo());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut state = AnnotationState::default();
        let a = rect(&mut state, (0.0, 0.0), (5.0, 5.0));
        let b = rect(&mut state, (0.0, 0.0), (5.0, 5.0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_select_prefers_topmost() {
        let mut state = AnnotationState::default();
        let _bottom = rect(&mut state, (0.0, 0.0), (20.0, 20.0));
        let top = rect(&mut state, (5.0, 5.0), (15.0, 15.0));
        assert_eq!(state.select_at(Point::new(10.0, 10.0)), Some(top));
        assert_eq!(state.drag_anchor(), Some(Point::new(10.0, 10.0)));

        assert_eq!(state.select_at(Point::new(100.0, 100.0)), None);
        assert_eq!(state.selected_shape_id(), None);
        assert_eq!(state.drag_anchor(), None);
    }

    #[test]
    fn test_drag_accumulates_deltas_on_selected_only() {
        let mut state = AnnotationState::default();
        let other = rect(&mut state, (50.0, 50.0), (60.0, 60.0));
        let moved = rect(&mut state, (0.0, 0.0), (10.0, 10.0));
        let other_before = state.shape(other).unwrap().points.clone();

        state.select_at(Point::new(5.0, 5.0));
        state.drag_to(Point::new(7.0, 4.0));
        state.drag_to(Point::new(10.0, 10.0));
        state.drag_to(Point::new(8.0, 12.0));
        state.end_drag();

        assert_eq!(
            state.shape(moved).unwrap().points,
            vec![Point::new(3.0, 7.0), Point::new(13.0, 17.0)]
        );
        assert_eq!(state.shape(other).unwrap().points, other_before);
        assert_eq!(state.drag_anchor(), None);
    }

    #[test]
    fn test_delete_selected() {
        let mut state = AnnotationState::default();
        rect(&mut state, (0.0, 0.0), (10.0, 10.0));
        rect(&mut state, (20.0, 20.0), (30.0, 30.0));

        assert!(!state.delete_selected());
        assert_eq!(state.shapes().len(), 2);

        state.select_at(Point::new(25.0, 25.0));
        assert!(state.delete_selected());
        assert_eq!(state.shapes().len(), 1);
        assert_eq!(state.selected_shape_id(), None);
    }

    #[test]
    fn test_erase_removes_exactly_the_hits() {
        let mut state = AnnotationState::default();
        rect(&mut state, (0.0, 0.0), (10.0, 10.0));
        rect(&mut state, (5.0, 5.0), (15.0, 15.0));
        let keep = rect(&mut state, (40.0, 40.0), (50.0, 50.0));

        assert_eq!(state.erase_at(Point::new(7.0, 7.0)), 2);
        assert_eq!(state.shapes().len(), 1);
        assert_eq!(state.shapes()[0].id, keep);
        assert_eq!(state.erase_at(Point::new(100.0, 100.0)), 0);
        assert_eq!(state.shapes().len(), 1);
    }

    #[test]
    fn test_tool_switch_clears_selection() {
        let mut state = AnnotationState::default();
        state.set_tool(Tool::Select);
        rect(&mut state, (0.0, 0.0), (10.0, 10.0));
        state.select_at(Point::new(5.0, 5.0));
        assert!(state.selected_shape_id().is_some());

        state.set_tool(Tool::Circle);
        assert_eq!(state.selected_shape_id(), None);
        assert_eq!(state.drag_anchor(), None);
    }

    #[test]
    fn test_undo_redo_restores_shape_lists() {
        let mut state = AnnotationState::default();
        let first = rect(&mut state, (0.0, 0.0), (10.0, 10.0));
        rect(&mut state, (20.0, 20.0), (30.0, 30.0));

        assert!(state.undo());
        assert_eq!(state.shapes().len(), 1);
        assert!(state.redo());
        assert_eq!(state.shapes().len(), 2);

        state.select_at(Point::new(5.0, 5.0));
        state.delete_selected();
        assert!(state.shape(first).is_none());
        assert!(state.undo());
        assert!(state.shape(first).is_some());
        assert!(state.history().can_redo());
    }

    #[test]
    fn test_new_mutation_clears_redo() {
        let mut state = AnnotationState::default();
        rect(&mut state, (0.0, 0.0), (10.0, 10.0));
        state.undo();
        assert!(state.history().can_redo());
        rect(&mut state, (0.0, 0.0), (5.0, 5.0));
        assert!(!state.history().can_redo());
    }

    #[test]
    fn test_undo_drops_dangling_selection() {
        let mut state = AnnotationState::default();
        rect(&mut state, (0.0, 0.0), (10.0, 10.0));
        state.select_at(Point::new(5.0, 5.0));
        state.undo();
        assert!(state.shapes().is_empty());
        assert_eq!(state.selected_shape_id(), None);
    }

    #[test]
    fn test_history_limit_is_bounded() {
        let config = EditorConfig {
            history_limit: 2,
            ..EditorConfig::default()
        };
        let mut state = AnnotationState::new(&config);
        for i in 0..5 {
            let o = i as f32 * 20.0;
            rect(&mut state, (o, o), (o + 5.0, o + 5.0));
        }
        assert!(state.undo());
        assert!(state.undo());
        assert!(!state.undo());
        assert_eq!(state.shapes().len(), 3);
    }
}
