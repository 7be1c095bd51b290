//! Draw commands a camera issues when rendering a frame
//!
//! Geometry is expressed in normalized viewport coordinates (`0.0..=1.0`,
//! origin top-left) so the same scene renders at any output resolution.
//! `depth` is `0.0` at the near plane and `1.0` at the far plane.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    SolidRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        depth: f32,
        rgba: [u8; 4],
    },
    /// Opaque rect shaded linearly from `top` to `bottom`.
    GradientRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        depth: f32,
        top: [u8; 3],
        bottom: [u8; 3],
    },
}

impl DrawCommand {
    /// `(x, y, width, height, depth)` of the command.
    pub fn bounds(&self) -> (f32, f32, f32, f32, f32) {
        match *self {
            DrawCommand::SolidRect { x, y, width, height, depth, .. }
            | DrawCommand::GradientRect { x, y, width, height, depth, .. } => (x, y, width, height, depth),
        }
    }
}
