//! Shared constants for annotation rendering

/// Selection highlight drawn over the selected shape
pub mod highlight {
    use crate::config::ShapeColor;

    /// Fixed highlight color (#00A3FF)
    pub const COLOR: ShapeColor = ShapeColor::rgb(0.0, 0.639_215_7, 1.0);
    /// Dash pattern: on length, off length
    pub const DASH: [f32; 2] = [6.0, 4.0];
    /// Lower bound on highlight stroke width so thin strokes stay visible
    pub const MIN_WIDTH: f32 = 2.0;
}

/// Stroke styling shared by every shape kind
pub mod stroke {
    /// Strokes narrower than this are not drawn
    pub const MIN_WIDTH: f32 = 0.1;
}
