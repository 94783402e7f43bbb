//! PathDraw CLI
//!
//! Inspect SVG drawings and render their path-drawing animation to PNG frames.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::PathDrawConfig;
use pathdraw_animation::{AnimationScheduler, Ordering, PathAnimator, Repeat};
use pathdraw_core::Size;
use pathdraw_svg::{extract_paths, DrawKind, PreviewFrame, SvgDocument};

#[derive(Parser)]
#[command(name = "pathdraw")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Animate the drawing of SVG paths", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every frame of one run to PNG files
    Render {
        /// SVG file to animate
        svg: PathBuf,

        /// Output directory for frame_NNNNN.png files
        #[arg(short, long)]
        out: PathBuf,

        /// Configuration file (defaults to ./pathdraw.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Frame width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Frame height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Frames per second
        #[arg(long)]
        fps: Option<u32>,

        /// Stagger between paths in milliseconds
        #[arg(long)]
        delay: Option<u32>,

        /// Reveal time of each path in milliseconds
        #[arg(long)]
        duration: Option<u32>,

        /// Path ordering
        #[arg(long, value_enum)]
        ordering: Option<OrderingArg>,
    },

    /// Print the extracted paths with their lengths, filled regions and stroke bounds
    Inspect {
        /// SVG file to inspect
        svg: PathBuf,

        /// Viewport width (defaults to the drawing's own width)
        #[arg(long)]
        width: Option<f32>,

        /// Viewport height (defaults to the drawing's own height)
        #[arg(long)]
        height: Option<f32>,

        /// Stroke width hint used for stroke bounds
        #[arg(long, default_value = "1.0")]
        stroke_width: f32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderingArg {
    Sequential,
    Parallel,
}

impl From<OrderingArg> for Ordering {
    fn from(arg: OrderingArg) -> Self {
        match arg {
            OrderingArg::Sequential => Ordering::Sequential,
            OrderingArg::Parallel => Ordering::Parallel,
        }
    }
}

/// Command-line overrides for `render`
struct RenderOverrides {
    width: Option<u32>,
    height: Option<u32>,
    fps: Option<u32>,
    delay: Option<u32>,
    duration: Option<u32>,
    ordering: Option<OrderingArg>,
}

impl RenderOverrides {
    fn apply(self, config: &mut PathDrawConfig) {
        if let Some(width) = self.width {
            config.render.width = width;
        }
        if let Some(height) = self.height {
            config.render.height = height;
        }
        if let Some(fps) = self.fps {
            config.render.fps = fps;
        }
        if let Some(delay) = self.delay {
            config.animation.delay_ms = delay;
        }
        if let Some(duration) = self.duration {
            config.animation.duration_ms = duration;
        }
        if let Some(ordering) = self.ordering {
            config.animation.ordering = ordering.into();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Render {
            svg,
            out,
            config,
            width,
            height,
            fps,
            delay,
            duration,
            ordering,
        } => {
            let overrides = RenderOverrides {
                width,
                height,
                fps,
                delay,
                duration,
                ordering,
            };
            cmd_render(&svg, &out, config.as_deref(), overrides)
        }

        Commands::Inspect {
            svg,
            width,
            height,
            stroke_width,
        } => cmd_inspect(&svg, width, height, stroke_width),
    }
}

fn cmd_render(
    svg: &Path,
    out: &Path,
    config_path: Option<&Path>,
    overrides: RenderOverrides,
) -> Result<()> {
    let mut config = PathDrawConfig::load_or_default(config_path)?;
    overrides.apply(&mut config);

    config
        .animation
        .validate()
        .context("Invalid animation settings")?;
    if config.render.fps == 0 {
        anyhow::bail!("Frame rate must be greater than 0");
    }
    if config.animation.repeat == Repeat::Forever {
        anyhow::bail!("repeat = \"forever\" cannot be rendered to frames; use a count");
    }
    let style = config.render.preview_style()?;
    let (width, height) = (config.render.width, config.render.height);

    let document = SvgDocument::from_file(svg)
        .with_context(|| format!("Failed to load {}", svg.display()))?;
    let paths = extract_paths(
        &document,
        Size::new(width as f32, height as f32),
        config.render.stroke_width,
    );
    if paths.is_empty() {
        warn!("No paths found in {}", svg.display());
    }

    fs::create_dir_all(out)
        .with_context(|| format!("Failed to create {}", out.display()))?;

    let scheduler = AnimationScheduler::new();
    let mut animator = PathAnimator::from_geometries(scheduler.handle(), paths)
        .with_config(config.animation)
        .context("Invalid animation settings")?;

    info!(
        "Rendering {} paths from {} at {}x{}, {}fps ({}ms per iteration)",
        animator.path_count(),
        svg.display(),
        width,
        height,
        config.render.fps,
        animator.run_length_ms()
    );

    let frame_ms = 1000.0 / config.render.fps as f32;
    let write_frame = |animator: &PathAnimator, index: usize| -> Result<()> {
        let frame = animator.with_states(|states| {
            PreviewFrame::render(states.iter().map(|s| s.visible_path()), width, height, &style)
        })?;
        let file = out.join(format!("frame_{:05}.png", index));
        frame
            .save_png(&file)
            .with_context(|| format!("Failed to write {}", file.display()))
    };

    animator.start();
    write_frame(&animator, 0)?;

    let mut frames = 1;
    loop {
        let playing = scheduler.advance(frame_ms);
        write_frame(&animator, frames)?;
        frames += 1;
        if !playing {
            break;
        }
    }

    info!("Wrote {} frames to {}", frames, out.display());
    Ok(())
}

fn cmd_inspect(svg: &Path, width: Option<f32>, height: Option<f32>, stroke_width: f32) -> Result<()> {
    let document = SvgDocument::from_file(svg)
        .with_context(|| format!("Failed to load {}", svg.display()))?;

    let viewport = Size::new(
        width.unwrap_or(document.width),
        height.unwrap_or(document.height),
    );
    let kinds: Vec<DrawKind> = document.draw_ops().iter().map(|op| op.kind).collect();
    let paths = extract_paths(&document, viewport, stroke_width);

    println!(
        "{}: {}x{} drawn into {}x{}",
        svg.display(),
        document.width,
        document.height,
        viewport.width,
        viewport.height
    );
    println!();

    for (i, geometry) in paths.iter().enumerate() {
        let kind = match kinds.get(i) {
            Some(DrawKind::Fill) => "fill",
            Some(DrawKind::Stroke) => "stroke",
            None => "?",
        };
        let b = geometry.bounds();
        let s = geometry.stroke_bounds();
        println!(
            "  #{:<3} {:<6} length {:>10.2}  region [{}, {}, {}, {}]  stroke [{}, {}, {}, {}]  contours {}",
            i,
            kind,
            geometry.total_length(),
            b.left,
            b.top,
            b.right,
            b.bottom,
            s.left,
            s.top,
            s.right,
            s.bottom,
            geometry.path().contour_count()
        );
    }

    let total: f32 = paths.iter().map(|g| g.total_length()).sum();
    println!();
    println!("{} paths, total length {:.2}", paths.len(), total);

    Ok(())
}
