//! Lux - render the built-in 2D light transport scenes to PNG.

mod overlay;
mod scenes;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use lux_tracer::{
    render, render_base, ChannelMode, ImageBuffer, Point, Scene, TraceConfig,
};
use overlay::{draw_segments, SegmentRecorder};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenes::DemoScene;

/// Render a 2D scene lit by emissive, reflective and refractive shapes
#[derive(Parser, Debug)]
#[command(name = "lux", version, about)]
struct Args {
    /// Scene to render
    #[arg(short, long, value_enum, default_value_t = DemoScene::Gourd)]
    scene: DemoScene,

    /// Image width in pixels
    #[arg(short = 'W', long, default_value_t = 512)]
    width: u32,

    /// Image height in pixels
    #[arg(short = 'H', long, default_value_t = 512)]
    height: u32,

    /// Rays per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Deepest reflection or refraction bounce
    #[arg(long)]
    max_depth: Option<u32>,

    /// Trace this many wavelengths instead of red, green and blue
    #[arg(long)]
    spectral: Option<usize>,

    /// Test every entity per ray instead of using the quadtree
    #[arg(long)]
    brute_force: bool,

    /// Seed for sampling jitter and random scene layouts
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// JSON trace configuration; flags override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render the flat scene layout and overlay the rays of one sample at "x,y"
    #[arg(long, value_parser = parse_point)]
    debug: Option<Point>,

    /// Output PNG path
    #[arg(short, long, default_value = "lux.png")]
    output: PathBuf,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got \"{s}\""))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x coordinate: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y coordinate: {e}"))?;
    Ok(Point::new(x, y))
}

fn load_config(args: &Args) -> Result<TraceConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => TraceConfig::default(),
    };

    if let Some(samples) = args.samples {
        config.samples = samples;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    if let Some(n) = args.spectral {
        config.channels = ChannelMode::Spectral(n);
    }
    if args.brute_force {
        config.use_quadtree = false;
    }
    Ok(config)
}

/// Flat scene layout with the segments traced by one sample drawn on top.
fn debug_frame(scene: &Scene, at: Point, width: u32, height: u32, seed: u64) -> ImageBuffer {
    let mut image = render_base(scene, width, height);

    let recorder = SegmentRecorder::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let color = scene.sample_traced(at, &mut rng, &recorder);
    let segments = recorder.into_segments();
    log::info!(
        "Sample at ({}, {}) traced {} segments, color {}",
        at.x,
        at.y,
        segments.len(),
        color
    );

    draw_segments(&mut image, &segments);
    image
}

fn save_png(image: &ImageBuffer, path: &Path) -> Result<()> {
    let rgb = image::RgbImage::from_raw(image.width, image.height, image.to_rgb_bytes())
        .context("frame size does not match its pixel data")?;
    rgb.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    log::info!("Starting Lux: {:?} at {}x{}", args.scene, args.width, args.height);

    let start = Instant::now();
    let entities = args
        .scene
        .build(config.channels, args.seed)
        .context("failed to build scene")?;
    let scene = Scene::new(entities, config).context("invalid scene")?;
    match scene.index() {
        Some(tree) => log::info!(
            "Scene ready in {:.2?}: {} entities, quadtree with {} nodes",
            start.elapsed(),
            scene.entities().len(),
            tree.node_count()
        ),
        None => log::info!(
            "Scene ready in {:.2?}: {} entities, brute force",
            start.elapsed(),
            scene.entities().len()
        ),
    }

    let start = Instant::now();
    let image = match args.debug {
        Some(at) => debug_frame(&scene, at, args.width, args.height, args.seed),
        None => render(&scene, args.width, args.height, args.seed),
    };
    log::info!(
        "Rendered {} samples per pixel in {:.2?}",
        scene.config().samples,
        start.elapsed()
    );

    save_png(&image, &args.output)?;
    log::info!("Wrote {}", args.output.display());
    Ok(())
}
