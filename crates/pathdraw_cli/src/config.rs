//! PathDraw configuration file handling
//!
//! `pathdraw.toml` holds two tables:
//! - `[animation]` - run timing (delay, duration, ordering, easing, repeat)
//! - `[render]` - frame output (size, frame rate, stroke and colors)
//!
//! Every field is optional; command-line flags override file values.

use anyhow::{Context, Result};
use pathdraw_animation::AnimatorConfig;
use pathdraw_svg::PreviewStyle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "pathdraw.toml";

/// Contents of `pathdraw.toml`
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PathDrawConfig {
    #[serde(default)]
    pub animation: AnimatorConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Frame output settings
#[derive(Debug, Deserialize, Serialize)]
pub struct RenderConfig {
    #[serde(default = "default_size")]
    pub width: u32,
    #[serde(default = "default_size")]
    pub height: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    /// Stroke color as `#rgb`, `#rrggbb` or `#rrggbbaa`
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_background")]
    pub background: String,
}

fn default_size() -> u32 {
    512
}

fn default_fps() -> u32 {
    30
}

fn default_stroke_width() -> f32 {
    2.0
}

fn default_color() -> String {
    "#222222".to_string()
}

fn default_background() -> String {
    "#ffffff".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_size(),
            height: default_size(),
            fps: default_fps(),
            stroke_width: default_stroke_width(),
            color: default_color(),
            background: default_background(),
        }
    }
}

impl RenderConfig {
    /// Resolve colors into a preview style
    pub fn preview_style(&self) -> Result<PreviewStyle> {
        Ok(PreviewStyle {
            stroke_width: self.stroke_width,
            color: parse_hex_color(&self.color)
                .with_context(|| format!("Invalid render.color '{}'", self.color))?,
            background: parse_hex_color(&self.background)
                .with_context(|| format!("Invalid render.background '{}'", self.background))?,
        })
    }
}

impl PathDrawConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Load an explicit config file, else `pathdraw.toml` in the working
    /// directory if present, else defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let local = Path::new(CONFIG_FILE);
        if local.exists() {
            tracing::debug!("Using {}", local.display());
            return Self::load(local);
        }

        Ok(Self::default())
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PathDrawConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` into straight-alpha RGBA
pub fn parse_hex_color(value: &str) -> Result<[u8; 4]> {
    let hex = value
        .trim()
        .strip_prefix('#')
        .context("Color must start with '#'")?;

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        anyhow::bail!("Color contains non-hex characters");
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).context("Invalid color channel");

    match hex.len() {
        3 => {
            let mut rgba = [0xff; 4];
            for (i, c) in hex.chars().enumerate() {
                let digit = channel(&c.to_string())?;
                rgba[i] = digit * 17;
            }
            Ok(rgba)
        }
        6 | 8 => {
            let mut rgba = [0xff; 4];
            for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
                let pair = std::str::from_utf8(chunk).context("Invalid color channel")?;
                rgba[i] = channel(pair)?;
            }
            Ok(rgba)
        }
        n => anyhow::bail!("Expected 3, 6 or 8 hex digits, got {}", n),
    }
}
