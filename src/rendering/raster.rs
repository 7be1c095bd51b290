/// Deterministic software rasterizer for `DrawCommand`s

use crate::rendering::paint::DrawCommand;
use crate::rendering::target::{RenderTexture, DEPTH_FAR};
use crate::{Error, Result};

/// Execute `commands` in order into `target` with depth testing.
///
/// A pixel is covered when its center lies inside the command's rect.
/// Commands with non-finite geometry are rejected before anything is drawn.
pub fn rasterize(commands: &[DrawCommand], target: &mut RenderTexture) -> Result<()> {
    for (i, cmd) in commands.iter().enumerate() {
        let (x, y, w, h, depth) = cmd.bounds();
        if ![x, y, w, h, depth].iter().all(|v| v.is_finite()) {
            return Err(Error::RenderError(format!("draw command {} has non-finite geometry", i)));
        }
    }

    for cmd in commands {
        let (x, y, w, h, depth) = cmd.bounds();
        let (x0, x1) = pixel_span(x, w, target.width());
        let (y0, y1) = pixel_span(y, h, target.height());
        let z = quantize_depth(depth);
        let rows = (y1 - y0).max(1) as f32;

        for py in y0..y1 {
            let color = match cmd {
                DrawCommand::SolidRect { rgba, .. } => *rgba,
                DrawCommand::GradientRect { top, bottom, .. } => {
                    let t = (py - y0) as f32 / rows;
                    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
                    [mix(top[0], bottom[0]), mix(top[1], bottom[1]), mix(top[2], bottom[2]), 255]
                }
            };
            for px in x0..x1 {
                target.plot(px, py, z, color);
            }
        }
    }
    Ok(())
}

/// Half-open pixel range whose centers fall in `[start, start + len)`.
fn pixel_span(start: f32, len: f32, extent: u32) -> (u32, u32) {
    let (lo, hi) = if len < 0.0 { (start + len, start) } else { (start, start + len) };
    let to_px = |v: f32| (v * extent as f32 - 0.5).ceil().clamp(0.0, extent as f32) as u32;
    (to_px(lo), to_px(hi))
}

fn quantize_depth(depth: f32) -> u32 {
    (depth.clamp(0.0, 1.0) * DEPTH_FAR as f32).round() as u32
}
