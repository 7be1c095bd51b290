//! Viewport cameras and the host's scene view.

use crate::rendering::paint::DrawCommand;
use crate::rendering::raster::rasterize;
use crate::rendering::target::{RenderTexture, TargetId};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A camera that renders a list of draw commands.
///
/// `pixel_width`/`pixel_height` are the size of the viewport the camera is
/// currently displayed in; they change when the host resizes the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub name: String,
    pub pixel_width: u32,
    pub pixel_height: u32,
    #[serde(default)]
    pub clear_color: [u8; 3],
    #[serde(default)]
    pub commands: Vec<DrawCommand>,
    #[serde(skip)]
    target_texture: Option<TargetId>,
}

impl Camera {
    pub fn new(name: impl Into<String>, pixel_width: u32, pixel_height: u32) -> Self {
        Self {
            name: name.into(),
            pixel_width,
            pixel_height,
            clear_color: [0, 0, 0],
            commands: Vec::new(),
            target_texture: None,
        }
    }

    pub fn with_clear_color(mut self, rgb: [u8; 3]) -> Self {
        self.clear_color = rgb;
        self
    }

    pub fn with_command(mut self, cmd: DrawCommand) -> Self {
        self.commands.push(cmd);
        self
    }

    /// Load a camera description from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let camera: Camera = serde_json::from_str(&text)?;
        Ok(camera)
    }

    /// Width over height of the viewport, sampled at call time.
    ///
    /// A zero-height viewport yields a non-finite ratio, which resolution
    /// rejects when it is needed.
    pub fn aspect(&self) -> f32 {
        self.pixel_width as f32 / self.pixel_height as f32
    }

    /// Texture this camera renders into, `None` for the viewport itself.
    pub fn target_texture(&self) -> Option<TargetId> {
        self.target_texture
    }

    pub fn set_target_texture(&mut self, target: Option<TargetId>) {
        self.target_texture = target;
    }

    /// Render exactly one frame into `texture`, which must be this camera's target.
    pub fn render(&self, texture: &mut RenderTexture) -> Result<()> {
        if self.target_texture != Some(texture.id()) {
            return Err(Error::RenderError(format!(
                "camera '{}' is not targeting the texture being rendered",
                self.name
            )));
        }
        texture.clear(self.clear_color);
        rasterize(&self.commands, texture)?;
        log::debug!(
            "camera '{}' rendered {} commands at {}x{}",
            self.name,
            self.commands.len(),
            texture.width(),
            texture.height()
        );
        Ok(())
    }
}

/// The host's most recently active editing viewport.
#[derive(Debug, Default)]
pub struct SceneView {
    pub camera: Option<Camera>,
}

impl SceneView {
    pub fn new(camera: Camera) -> Self {
        Self { camera: Some(camera) }
    }

    pub fn empty() -> Self {
        Self { camera: None }
    }

    /// Live aspect ratio of the active camera.
    pub fn viewport_aspect(&self) -> Result<f32> {
        self.camera.as_ref().map(Camera::aspect).ok_or(Error::NoActiveCamera)
    }

    pub fn active_camera_mut(&mut self) -> Result<&mut Camera> {
        self.camera.as_mut().ok_or(Error::NoActiveCamera)
    }

    /// Resize the viewport, as the host does when its window changes.
    pub fn resize(&mut self, pixel_width: u32, pixel_height: u32) {
        if let Some(cam) = self.camera.as_mut() {
            cam.pixel_width = pixel_width;
            cam.pixel_height = pixel_height;
        }
    }
}
