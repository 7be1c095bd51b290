//! Output resolution selection.
//!
//! Turns the user's preset/custom selection plus the live viewport aspect
//! ratio into a concrete pixel size. `resolve` is a pure function: the
//! viewport aspect is passed in by the caller and sampled fresh on every
//! call, so the same config may resolve differently after the viewport is
//! resized.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Width/height used when custom dimension text cannot be parsed.
pub const FALLBACK_WIDTH: u32 = 1920;
pub const FALLBACK_HEIGHT: u32 = 1080;

/// Height factor applied to preset widths when not locking to the viewport (16:9).
const DEFAULT_HEIGHT_FACTOR: f32 = 0.5625;

/// Output resolution preset.
///
/// Fixed presets carry their reference width; the height is derived. The
/// `Custom` variant carries the raw text of the width/height input fields so
/// that half-typed values can be kept around while editing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionPreset {
    Hd,
    #[default]
    Fhd,
    Qhd,
    #[serde(rename = "4k")]
    Uhd4k,
    #[serde(rename = "8k")]
    Uhd8k,
    Custom { width: String, height: String },
}

impl ResolutionPreset {
    /// Reference width in pixels, `None` for `Custom`.
    pub fn reference_width(&self) -> Option<u32> {
        match self {
            ResolutionPreset::Hd => Some(1280),
            ResolutionPreset::Fhd => Some(1920),
            ResolutionPreset::Qhd => Some(2560),
            ResolutionPreset::Uhd4k => Some(3840),
            ResolutionPreset::Uhd8k => Some(7680),
            ResolutionPreset::Custom { .. } => None,
        }
    }

    pub fn selection(&self) -> PresetSelection {
        match self {
            ResolutionPreset::Hd => PresetSelection::Hd,
            ResolutionPreset::Fhd => PresetSelection::Fhd,
            ResolutionPreset::Qhd => PresetSelection::Qhd,
            ResolutionPreset::Uhd4k => PresetSelection::Uhd4k,
            ResolutionPreset::Uhd8k => PresetSelection::Uhd8k,
            ResolutionPreset::Custom { .. } => PresetSelection::Custom,
        }
    }
}

/// Data-less preset tag, as picked from a dropdown or command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PresetSelection {
    Hd,
    Fhd,
    Qhd,
    #[serde(rename = "4k")]
    #[value(name = "4k")]
    Uhd4k,
    #[serde(rename = "8k")]
    #[value(name = "8k")]
    Uhd8k,
    Custom,
}

/// User-facing capture settings, updated on every interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub preset: ResolutionPreset,
    /// Derive the height from the viewport aspect ratio. Under `Custom` this
    /// makes the custom height text advisory only: it is ignored.
    #[serde(default)]
    pub lock_to_viewport_aspect: bool,
}

impl CaptureConfig {
    /// Build a config from the invocation surface parameters.
    ///
    /// Custom width/height text is only kept for `PresetSelection::Custom`;
    /// missing text is stored empty and resolves to the fallback size.
    pub fn from_selection(
        selection: PresetSelection,
        custom_width: Option<&str>,
        custom_height: Option<&str>,
        lock_to_viewport_aspect: bool,
    ) -> Self {
        let preset = match selection {
            PresetSelection::Hd => ResolutionPreset::Hd,
            PresetSelection::Fhd => ResolutionPreset::Fhd,
            PresetSelection::Qhd => ResolutionPreset::Qhd,
            PresetSelection::Uhd4k => ResolutionPreset::Uhd4k,
            PresetSelection::Uhd8k => ResolutionPreset::Uhd8k,
            PresetSelection::Custom => ResolutionPreset::Custom {
                width: custom_width.unwrap_or_default().to_string(),
                height: custom_height.unwrap_or_default().to_string(),
            },
        };
        Self { preset, lock_to_viewport_aspect }
    }

    /// True when the custom height field is shown but does not affect output.
    pub fn custom_height_is_advisory(&self) -> bool {
        self.lock_to_viewport_aspect && matches!(self.preset, ResolutionPreset::Custom { .. })
    }
}

/// Resolve a config into a concrete `(width, height)` in pixels.
///
/// Derived heights are computed in `f32` and truncated toward zero.
pub fn resolve(config: &CaptureConfig, viewport_aspect: f32) -> Result<(u32, u32)> {
    let (width, height) = match &config.preset {
        ResolutionPreset::Custom { width, .. } if config.lock_to_viewport_aspect => {
            // height text is advisory here: only the width is read
            let w = width.trim().parse::<i32>().map_or(FALLBACK_WIDTH as i64, i64::from);
            if w <= 0 {
                return Err(Error::InvalidResolution { width: w, height: 0 });
            }
            let w = w as u32;
            (w, height_from_aspect(w, viewport_aspect)?)
        }
        ResolutionPreset::Custom { width, height } => {
            let (w, h) = parse_custom(width, height);
            if w <= 0 || h <= 0 {
                return Err(Error::InvalidResolution { width: w, height: h });
            }
            (w as u32, h as u32)
        }
        preset => {
            let w = preset.reference_width().unwrap_or(FALLBACK_WIDTH);
            if config.lock_to_viewport_aspect {
                (w, height_from_aspect(w, viewport_aspect)?)
            } else {
                (w, truncate_dimension(w, w as f32 * DEFAULT_HEIGHT_FACTOR)?)
            }
        }
    };
    log::trace!("resolved {:?} (aspect {}) to {}x{}", config.preset, viewport_aspect, width, height);
    Ok((width, height))
}

/// Both fields must parse, otherwise both fall back to 1920x1080.
fn parse_custom(width: &str, height: &str) -> (i64, i64) {
    match (width.trim().parse::<i32>(), height.trim().parse::<i32>()) {
        (Ok(w), Ok(h)) => (w as i64, h as i64),
        _ => (FALLBACK_WIDTH as i64, FALLBACK_HEIGHT as i64),
    }
}

fn height_from_aspect(width: u32, viewport_aspect: f32) -> Result<u32> {
    if !viewport_aspect.is_finite() || viewport_aspect <= 0.0 {
        return Err(Error::InvalidResolution { width: width as i64, height: 0 });
    }
    truncate_dimension(width, width as f32 / viewport_aspect)
}

fn truncate_dimension(width: u32, height: f32) -> Result<u32> {
    let truncated = height.trunc();
    if !(truncated >= 1.0 && truncated < u32::MAX as f32) {
        return Err(Error::InvalidResolution {
            width: width as i64,
            height: if truncated.is_finite() { truncated as i64 } else { 0 },
        });
    }
    Ok(truncated as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset(p: ResolutionPreset, lock: bool) -> CaptureConfig {
        CaptureConfig { preset: p, lock_to_viewport_aspect: lock }
    }

    fn custom(w: &str, h: &str, lock: bool) -> CaptureConfig {
        CaptureConfig::from_selection(PresetSelection::Custom, Some(w), Some(h), lock)
    }

    #[test]
    fn presets_default_to_sixteen_by_nine() {
        assert_eq!(resolve(&preset(ResolutionPreset::Hd, false), 1.0).unwrap(), (1280, 720));
        assert_eq!(resolve(&preset(ResolutionPreset::Fhd, false), 1.0).unwrap(), (1920, 1080));
        assert_eq!(resolve(&preset(ResolutionPreset::Qhd, false), 1.0).unwrap(), (2560, 1440));
        assert_eq!(resolve(&preset(ResolutionPreset::Uhd4k, false), 1.0).unwrap(), (3840, 2160));
        assert_eq!(resolve(&preset(ResolutionPreset::Uhd8k, false), 1.0).unwrap(), (7680, 4320));
    }

    #[test]
    fn unlocked_presets_ignore_viewport_aspect() {
        let cfg = preset(ResolutionPreset::Fhd, false);
        assert_eq!(resolve(&cfg, 3.0).unwrap(), resolve(&cfg, 0.5).unwrap());
        // aspect is not consulted, so a broken one is fine
        assert_eq!(resolve(&cfg, 0.0).unwrap(), (1920, 1080));
    }

    #[test]
    fn locked_presets_follow_viewport_aspect() {
        let cfg = preset(ResolutionPreset::Fhd, true);
        assert_eq!(resolve(&cfg, 2.0).unwrap(), (1920, 960));
        assert_eq!(resolve(&cfg, 1.5).unwrap(), (1920, 1280));
        assert_eq!(resolve(&cfg, 1.0).unwrap(), (1920, 1920));
        // 1280 / 1.7 = 752.94..
        assert_eq!(resolve(&preset(ResolutionPreset::Hd, true), 1.7).unwrap(), (1280, 752));
    }

    #[test]
    fn locked_height_decreases_as_aspect_grows() {
        let cfg = preset(ResolutionPreset::Qhd, true);
        let mut last = u32::MAX;
        for a in [0.5f32, 0.75, 1.0, 1.25, 1.5, 2.0, 2.5, 3.0] {
            let (_, h) = resolve(&cfg, a).unwrap();
            assert!(h < last, "height {} at aspect {} did not decrease", h, a);
            last = h;
        }
    }

    #[test]
    fn custom_parses_text_fields() {
        assert_eq!(resolve(&custom("800", "600", false), 1.0).unwrap(), (800, 600));
        assert_eq!(resolve(&custom(" 640 ", "480", false), 1.0).unwrap(), (640, 480));
    }

    #[test]
    fn custom_unparsable_falls_back_to_full_hd() {
        assert_eq!(resolve(&custom("abc", "600", false), 1.0).unwrap(), (1920, 1080));
        assert_eq!(resolve(&custom("800", "", false), 1.0).unwrap(), (1920, 1080));
        assert_eq!(resolve(&custom("12.5", "7", false), 1.0).unwrap(), (1920, 1080));
        let missing = CaptureConfig::from_selection(PresetSelection::Custom, None, None, false);
        assert_eq!(resolve(&missing, 1.0).unwrap(), (1920, 1080));
    }

    #[test]
    fn custom_locked_overrides_height() {
        let cfg = custom("800", "12345", true);
        assert!(cfg.custom_height_is_advisory());
        assert_eq!(resolve(&cfg, 2.0).unwrap(), (800, 400));
        assert_eq!(resolve(&custom("800", "1", true), 2.0).unwrap(), (800, 400));
        // fallback width still drives the derived height
        assert_eq!(resolve(&custom("x", "y", true), 1.5).unwrap(), (1920, 1280));
    }

    #[test]
    fn custom_locked_never_reads_height_text() {
        for h in ["0", "-5", "", "abc"] {
            assert_eq!(resolve(&custom("800", h, true), 2.0).unwrap(), (800, 400), "height {:?}", h);
        }
        let no_height = CaptureConfig::from_selection(PresetSelection::Custom, Some("800"), None, true);
        assert_eq!(resolve(&no_height, 2.0).unwrap(), (800, 400));
        // a non-positive width is still an error
        assert!(matches!(
            resolve(&custom("-800", "600", true), 2.0),
            Err(Error::InvalidResolution { width: -800, .. })
        ));
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        assert!(matches!(
            resolve(&custom("0", "600", false), 1.0),
            Err(Error::InvalidResolution { width: 0, height: 600 })
        ));
        assert!(matches!(
            resolve(&custom("800", "-5", false), 1.0),
            Err(Error::InvalidResolution { .. })
        ));
        // 1 / 4.0 truncates to zero
        assert!(matches!(resolve(&custom("1", "1", true), 4.0), Err(Error::InvalidResolution { .. })));
    }

    #[test]
    fn broken_viewport_aspect_is_rejected_when_locking() {
        let cfg = preset(ResolutionPreset::Fhd, true);
        for a in [0.0f32, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(resolve(&cfg, a), Err(Error::InvalidResolution { .. })));
        }
    }

    #[test]
    fn selection_round_trips_through_preset() {
        for sel in [
            PresetSelection::Hd,
            PresetSelection::Fhd,
            PresetSelection::Qhd,
            PresetSelection::Uhd4k,
            PresetSelection::Uhd8k,
            PresetSelection::Custom,
        ] {
            let cfg = CaptureConfig::from_selection(sel, Some("1"), Some("1"), false);
            assert_eq!(cfg.preset.selection(), sel);
        }
        assert!(!CaptureConfig::default().custom_height_is_advisory());
    }

    #[test]
    fn config_deserializes_from_json() {
        let cfg: CaptureConfig = serde_json::from_str(r#"{"preset":"4k","lock_to_viewport_aspect":true}"#).unwrap();
        assert_eq!(cfg.preset, ResolutionPreset::Uhd4k);
        assert!(cfg.lock_to_viewport_aspect);

        let cfg: CaptureConfig =
            serde_json::from_str(r#"{"preset":{"custom":{"width":"800","height":"600"}}}"#).unwrap();
        assert_eq!(resolve(&cfg, 1.0).unwrap(), (800, 600));
    }
}
