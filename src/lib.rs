//! Scenecap
//!
//! Renders a viewport camera into an off-screen buffer at a user-chosen
//! resolution and writes the result to a PNG file.
//!
//! The crate has two halves:
//!
//! - **Resolution** ([`resolution`]): turns a preset or custom size, plus an
//!   optional lock to the live viewport aspect ratio, into a pixel size.
//! - **Capture** ([`capture`]): renders a [`Camera`] off-screen at that size,
//!   reads the pixels back and saves them as `screenshot<YYMMDDHHmmssff>.png`.
//!
//! [`CaptureTool`] ties the two together for a host editor.
//!
//! # Example
//!
//! ```no_run
//! use scenecap::{Camera, CaptureTool, PresetSelection, RenderContext, SceneView, ToolSettings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tool = CaptureTool::new(ToolSettings::default());
//! tool.set_selection(PresetSelection::Qhd, None, None, true);
//! tool.on_capture(|res| println!("saved {}", res.file_path().display()));
//!
//! let mut ctx = RenderContext::new();
//! let mut view = SceneView::new(Camera::new("scene", 1600, 900));
//! let result = tool.capture_now(&mut ctx, &mut view)?;
//! assert_eq!(result.width(), 2560);
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;

pub mod error;
pub use error::{Error, Result};

pub mod capture;
pub mod encode;
pub mod rendering;
pub mod resolution;
pub mod settings;

pub use capture::{capture, capture_at, screenshot_file_name, CaptureResult};
pub use rendering::{Camera, DrawCommand, PixelBuffer, RenderContext, SceneView};
pub use resolution::{resolve, CaptureConfig, PresetSelection, ResolutionPreset};
pub use settings::ToolSettings;

type OnCaptureHandler = Arc<dyn Fn(&CaptureResult) + Send + Sync>;

/// Host-facing capture tool: current selection, output directory and the
/// post-capture notification.
pub struct CaptureTool {
    settings: ToolSettings,
    on_capture: Option<OnCaptureHandler>,
}

impl CaptureTool {
    pub fn new(settings: ToolSettings) -> Self {
        Self { settings, on_capture: None }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.settings.capture
    }

    pub fn set_config(&mut self, config: CaptureConfig) {
        self.settings.capture = config;
    }

    /// Apply the host's selection widgets. Custom text is only meaningful for
    /// `PresetSelection::Custom`, and the custom height is ignored while
    /// `lock_to_viewport_aspect` is set.
    pub fn set_selection(
        &mut self,
        selection: PresetSelection,
        custom_width: Option<&str>,
        custom_height: Option<&str>,
        lock_to_viewport_aspect: bool,
    ) {
        self.settings.capture =
            CaptureConfig::from_selection(selection, custom_width, custom_height, lock_to_viewport_aspect);
    }

    pub fn output_dir(&self) -> &Path {
        &self.settings.output_dir
    }

    /// The size a capture would have right now, for display next to the widgets.
    pub fn preview(&self, view: &SceneView) -> Result<(u32, u32)> {
        let aspect = view.viewport_aspect()?;
        resolve(&self.settings.capture, aspect)
    }

    /// Resolve against the active camera's current aspect, then capture it.
    ///
    /// On success the registered `on_capture` callback is told about the new file.
    pub fn capture_now(&self, ctx: &mut RenderContext, view: &mut SceneView) -> Result<CaptureResult> {
        let outcome = view.active_camera_mut().and_then(|camera| {
            let (width, height) = resolve(&self.settings.capture, camera.aspect())?;
            capture(ctx, camera, width, height, &self.settings.output_dir)
        });

        match outcome {
            Ok(result) => {
                if let Some(cb) = &self.on_capture {
                    cb(&result);
                }
                Ok(result)
            }
            Err(e) => {
                log::warn!("Screenshot capture failed: {}", e);
                Err(e)
            }
        }
    }

    /// Register a callback invoked with every successfully written capture.
    pub fn on_capture<F>(&mut self, cb: F)
    where
        F: Fn(&CaptureResult) + Send + Sync + 'static,
    {
        self.on_capture = Some(Arc::new(cb));
    }

    /// Remove a previously registered `on_capture` callback
    pub fn clear_on_capture(&mut self) {
        self.on_capture = None;
    }
}
