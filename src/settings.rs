//! Tool settings loaded from JSON.

use crate::resolution::CaptureConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Screenshots land here, relative to the project root.
pub const DEFAULT_OUTPUT_DIR: &str = "Assets/Screenshots";

/// Settings for the capture tool
///
/// Every field is optional in the JSON file; missing fields take the
/// defaults (`Assets/Screenshots`, FHD, not locked to the viewport).
///
/// # Examples
///
/// ```
/// let s = scenecap::ToolSettings::default();
/// assert_eq!(s.output_dir, std::path::PathBuf::from("Assets/Screenshots"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Directory screenshots are written to
    pub output_dir: PathBuf,
    /// Initial resolution selection
    pub capture: CaptureConfig,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            capture: CaptureConfig::default(),
        }
    }
}

impl ToolSettings {
    /// Read and validate settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("unable to read settings {}: {}", path.display(), e))
        })?;
        let settings: ToolSettings = serde_json::from_str(&text)?;
        settings.validate()?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::ConfigError("output_dir must not be empty".into()));
        }
        Ok(())
    }
}
