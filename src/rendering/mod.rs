//! Off-screen rendering: cameras, render targets and the software rasterizer

pub mod camera;
pub mod paint;
pub mod raster;
pub mod target;

pub use camera::{Camera, SceneView};
pub use paint::DrawCommand;
pub use target::{PixelBuffer, PixelRect, RenderContext, RenderTexture, TargetId};
