//! Preview rasterization using tiny-skia
//!
//! Strokes partially revealed paths onto a CPU pixmap. This is the reference
//! renderer used by the command-line tool and tests; hosts with their own
//! canvas draw the same truncated paths themselves.

use std::path::Path as FilePath;

use pathdraw_core::Path;
use tiny_skia::{Color, LineCap, LineJoin, Paint, Pixmap, Stroke, Transform};

use crate::error::SvgError;

/// Stroke and background colors for preview frames
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewStyle {
    pub stroke_width: f32,
    /// Straight-alpha RGBA
    pub color: [u8; 4],
    /// Straight-alpha RGBA
    pub background: [u8; 4],
}

impl Default for PreviewStyle {
    fn default() -> Self {
        Self {
            stroke_width: 2.0,
            color: [0x22, 0x22, 0x22, 0xff],
            background: [0xff, 0xff, 0xff, 0xff],
        }
    }
}

/// A rendered preview frame
pub struct PreviewFrame {
    pixmap: Pixmap,
}

impl PreviewFrame {
    /// Create a frame filled with the style's background
    pub fn new(width: u32, height: u32, style: &PreviewStyle) -> Result<Self, SvgError> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(SvgError::InvalidSize { width, height })?;

        let [r, g, b, a] = style.background;
        pixmap.fill(Color::from_rgba8(r, g, b, a));

        Ok(Self { pixmap })
    }

    /// Render a set of paths in order onto a fresh frame
    pub fn render<'a>(
        paths: impl IntoIterator<Item = &'a Path>,
        width: u32,
        height: u32,
        style: &PreviewStyle,
    ) -> Result<Self, SvgError> {
        let mut frame = Self::new(width, height, style)?;
        for path in paths {
            frame.stroke(path, style);
        }
        Ok(frame)
    }

    /// Stroke one path; empty or point-only paths draw nothing
    pub fn stroke(&mut self, path: &Path, style: &PreviewStyle) {
        let Some(skia_path) = path.to_tiny_skia() else {
            return;
        };

        let mut paint = Paint::default();
        let [r, g, b, a] = style.color;
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: style.stroke_width.max(0.0),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        self.pixmap
            .stroke_path(&skia_path, &paint, &stroke, Transform::identity(), None);
    }

    /// Premultiplied RGBA pixel data
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Get the dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// Alpha of the pixel at `(x, y)`, if inside the frame
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        self.pixmap.pixel(x, y).map(|p| p.alpha())
    }

    /// Encode the frame as PNG bytes
    pub fn encode_png(&self) -> Result<Vec<u8>, SvgError> {
        self.pixmap
            .encode_png()
            .map_err(|e| SvgError::Encode(e.to_string()))
    }

    /// Write the frame to a PNG file
    pub fn save_png(&self, path: impl AsRef<FilePath>) -> Result<(), SvgError> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
