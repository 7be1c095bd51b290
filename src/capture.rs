//! Off-screen capture of a camera to a PNG file.
//!
//! A capture installs a freshly allocated texture as both the camera's
//! target and the context's active target, renders one frame, reads the
//! pixels back and encodes them. Both targets are put back by
//! `OffscreenScope`'s `Drop`, so they are restored on every exit path.
//!
//! Captures are synchronous and not reentrant; the `&mut RenderContext`
//! borrow keeps a second capture from starting while one is in flight.

use crate::encode::encode_png_rgb8;
use crate::rendering::{Camera, PixelBuffer, PixelRect, RenderContext, RenderTexture, TargetId};
use crate::{Error, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of a successful capture. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureResult {
    file_path: PathBuf,
    width: u32,
    height: u32,
    timestamp: DateTime<Local>,
}

impl CaptureResult {
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}

/// `screenshot<YYMMDDHHmmssff>.png`, `ff` being centiseconds.
pub fn screenshot_file_name(timestamp: &DateTime<Local>) -> String {
    let centis = (timestamp.timestamp_subsec_millis() / 10).min(99);
    format!("screenshot{}{:02}.png", timestamp.format("%y%m%d%H%M%S"), centis)
}

/// Render `camera` at `width`x`height` and write it under `output_dir`.
pub fn capture(
    ctx: &mut RenderContext,
    camera: &mut Camera,
    width: u32,
    height: u32,
    output_dir: &Path,
) -> Result<CaptureResult> {
    capture_at(ctx, camera, width, height, output_dir, Local::now())
}

/// Like `capture`, with the timestamp used for naming supplied by the caller.
pub fn capture_at(
    ctx: &mut RenderContext,
    camera: &mut Camera,
    width: u32,
    height: u32,
    output_dir: &Path,
    timestamp: DateTime<Local>,
) -> Result<CaptureResult> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidResolution { width: width as i64, height: height as i64 });
    }

    fs::create_dir_all(output_dir)?;
    let file_path = output_dir.join(screenshot_file_name(&timestamp));

    let texture = ctx.allocate_texture(width, height)?;
    let mut pixels = PixelBuffer::new(width, height)?;

    let png = {
        let mut scope = OffscreenScope::install(ctx, camera, texture);
        scope.render_into(&mut pixels)?;
        encode_png_rgb8(&pixels)?
    };

    fs::write(&file_path, &png)?;
    log::info!("Screenshot captured and saved to: {}", file_path.display());

    Ok(CaptureResult { file_path, width, height, timestamp })
}

/// Off-screen texture installed as camera target and active target.
///
/// Dropping the scope restores both previous targets and releases the texture.
struct OffscreenScope<'a> {
    ctx: &'a mut RenderContext,
    camera: &'a mut Camera,
    texture: RenderTexture,
    prev_active: Option<TargetId>,
    prev_camera_target: Option<TargetId>,
}

impl<'a> OffscreenScope<'a> {
    fn install(ctx: &'a mut RenderContext, camera: &'a mut Camera, texture: RenderTexture) -> Self {
        let id = texture.id();
        let prev_active = ctx.set_active(Some(id));
        let prev_camera_target = camera.target_texture();
        camera.set_target_texture(Some(id));
        log::debug!("installed off-screen target {:?} (previous active {:?})", id, prev_active);
        Self { ctx, camera, texture, prev_active, prev_camera_target }
    }

    /// One synchronous frame, then readback of the whole texture.
    fn render_into(&mut self, pixels: &mut PixelBuffer) -> Result<()> {
        self.camera.render(&mut self.texture)?;
        let rect = PixelRect::full(self.texture.width(), self.texture.height());
        self.ctx.read_pixels(&self.texture, rect, pixels, 0, 0)
    }
}

impl Drop for OffscreenScope<'_> {
    fn drop(&mut self) {
        self.ctx.set_active(self.prev_active);
        self.camera.set_target_texture(self.prev_camera_target);
        log::debug!("restored render target {:?}", self.prev_active);
    }
}
