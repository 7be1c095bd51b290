use anyhow::{bail, Context};
use clap::Parser;
use scenecap::{Camera, CaptureTool, DrawCommand, PresetSelection, RenderContext, SceneView, ToolSettings};
use std::path::PathBuf;

/// Render a scene camera off-screen and save it as a PNG screenshot
#[derive(Parser, Debug)]
#[command(name = "scenecap", version, about)]
struct Cli {
    /// Resolution preset
    #[arg(long, value_enum)]
    preset: Option<PresetSelection>,

    /// Width for `--preset custom`
    #[arg(long)]
    custom_width: Option<String>,

    /// Height for `--preset custom` (ignored with --lock-aspect)
    #[arg(long)]
    custom_height: Option<String>,

    /// Derive the height from the viewport aspect ratio
    #[arg(long)]
    lock_aspect: bool,

    /// Directory to write screenshots to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON camera description; a built-in demo scene is used when omitted
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Viewport size the camera is displayed at, e.g. 1600x900
    #[arg(long, value_parser = parse_viewport)]
    viewport: Option<ViewportSize>,
}

#[derive(Debug, Clone, Copy)]
struct ViewportSize {
    width: u32,
    height: u32,
}

fn parse_viewport(s: &str) -> Result<ViewportSize, String> {
    let (w, h) = s.split_once(['x', 'X']).ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let width = w.trim().parse::<u32>().map_err(|e| format!("bad width '{}': {}", w, e))?;
    let height = h.trim().parse::<u32>().map_err(|e| format!("bad height '{}': {}", h, e))?;
    Ok(ViewportSize { width, height })
}

fn demo_camera() -> Camera {
    Camera::new("demo", 1600, 900)
        .with_clear_color([30, 30, 36])
        .with_command(DrawCommand::GradientRect {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 0.6,
            depth: 1.0,
            top: [70, 120, 200],
            bottom: [190, 215, 240],
        })
        .with_command(DrawCommand::GradientRect {
            x: 0.0,
            y: 0.6,
            width: 1.0,
            height: 0.4,
            depth: 0.9,
            top: [80, 140, 70],
            bottom: [40, 80, 35],
        })
        .with_command(DrawCommand::SolidRect {
            x: 0.35,
            y: 0.35,
            width: 0.3,
            height: 0.4,
            depth: 0.5,
            rgba: [200, 70, 50, 255],
        })
        .with_command(DrawCommand::SolidRect {
            x: 0.5,
            y: 0.45,
            width: 0.25,
            height: 0.25,
            depth: 0.3,
            rgba: [250, 230, 90, 160],
        })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => ToolSettings::load(path)?,
        None => ToolSettings::default(),
    };
    if let Some(dir) = cli.output_dir {
        settings.output_dir = dir;
    }

    let mut tool = CaptureTool::new(settings);
    match cli.preset {
        Some(preset) => tool.set_selection(
            preset,
            cli.custom_width.as_deref(),
            cli.custom_height.as_deref(),
            cli.lock_aspect,
        ),
        None => {
            if cli.custom_width.is_some() || cli.custom_height.is_some() {
                bail!("--custom-width/--custom-height require --preset custom");
            }
            if cli.lock_aspect {
                let mut config = tool.config().clone();
                config.lock_to_viewport_aspect = true;
                tool.set_config(config);
            }
        }
    }
    if tool.config().custom_height_is_advisory() && cli.custom_height.is_some() {
        log::warn!("--custom-height is ignored while the height is locked to the viewport aspect");
    }
    tool.on_capture(|res| {
        println!("{} ({}x{})", res.file_path().display(), res.width(), res.height());
    });

    let mut camera = match &cli.scene {
        Some(path) => Camera::from_json_file(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => demo_camera(),
    };
    if let Some(vp) = cli.viewport {
        camera.pixel_width = vp.width;
        camera.pixel_height = vp.height;
    }

    let mut view = SceneView::new(camera);
    let mut ctx = RenderContext::new();
    tool.capture_now(&mut ctx, &mut view).context("capture failed")?;
    Ok(())
}
