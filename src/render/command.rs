use eframe::egui::{Align2, Color32, Pos2, Rect, Stroke, Vec2};

/// Backend-agnostic drawing primitive.
///
/// Commands between [`DrawCommand::SetTransform`] and
/// [`DrawCommand::ResetTransform`] are in graph space and must be mapped
/// through `point * zoom + pan` (lengths scaled by `zoom`); everything else is
/// in canvas-relative screen space.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    SetTransform {
        zoom: f32,
        pan: Vec2,
    },
    ResetTransform,
    Line {
        from: Pos2,
        to: Pos2,
        stroke: Stroke,
    },
    Circle {
        center: Pos2,
        radius: f32,
        fill: Color32,
        stroke: Stroke,
    },
    /// Arc starting at `start_angle` and sweeping clockwise by `sweep`
    /// (radians, y axis down).
    Arc {
        center: Pos2,
        radius: f32,
        start_angle: f32,
        sweep: f32,
        stroke: Stroke,
    },
    Text {
        position: Pos2,
        anchor: Align2,
        text: String,
        size: f32,
        color: Color32,
    },
    RoundedRect {
        rect: Rect,
        corner_radius: f32,
        fill: Color32,
        stroke: Stroke,
    },
}

impl DrawCommand {
    pub fn is_text(&self, needle: &str) -> bool {
        matches!(self, Self::Text { text, .. } if text == needle)
    }
}
