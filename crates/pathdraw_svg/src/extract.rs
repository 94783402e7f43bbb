//! Geometry extraction
//!
//! Turns a parsed SVG into the list of measured paths an animation reveals.
//! Every fill or stroke draw becomes its own `PathGeometry`, transformed into
//! viewport space and ordered the way the drawing paints them.

use std::path::Path as FilePath;

use pathdraw_core::{PathGeometry, Size};

use crate::document::SvgDocument;
use crate::error::SvgError;

/// Extract viewport-space path geometry from a parsed document
///
/// The drawing is scaled uniformly to fit `viewport` and centered in it.
/// `stroke_width` is recorded on each geometry as a bounds hint; it never
/// changes the extracted shape. A viewport with a zero or negative dimension
/// yields no paths.
pub fn extract_paths(
    document: &SvgDocument,
    viewport: Size,
    stroke_width: f32,
) -> Vec<PathGeometry> {
    if viewport.is_empty() {
        tracing::warn!(
            "Cannot extract paths for empty viewport {}x{}",
            viewport.width,
            viewport.height
        );
        return Vec::new();
    }

    let transform = document.viewport_transform(viewport);
    let mut paths = Vec::new();

    document.visit_paths(&mut |op| {
        let path = op.path.transformed(&transform);
        paths.push(PathGeometry::with_stroke_width(path, stroke_width));
    });

    tracing::debug!(
        "Extracted {} paths for {}x{} viewport (total length {:.1})",
        paths.len(),
        viewport.width,
        viewport.height,
        paths.iter().map(PathGeometry::total_length).sum::<f32>()
    );

    paths
}

/// Loads a drawing once and extracts its paths on demand
///
/// Loading never fails outright: a source that cannot be read or parsed is
/// logged and the extractor then reports no paths, which callers treat as
/// "nothing to animate".
#[derive(Clone, Default)]
pub struct PathExtractor {
    document: Option<SvgDocument>,
}

impl PathExtractor {
    /// Wrap an already parsed document
    pub fn new(document: SvgDocument) -> Self {
        Self {
            document: Some(document),
        }
    }

    /// Parse SVG bytes, logging failures
    pub fn load(data: &[u8]) -> Self {
        Self::from_result(SvgDocument::from_data(data))
    }

    /// Parse an SVG string, logging failures
    pub fn load_str(svg: &str) -> Self {
        Self::load(svg.as_bytes())
    }

    /// Read and parse an SVG file, logging failures
    pub fn load_file(path: impl AsRef<FilePath>) -> Self {
        let path = path.as_ref();
        match SvgDocument::from_file(path) {
            Ok(document) => Self::new(document),
            Err(e) => {
                tracing::error!("Could not load SVG file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn from_result(result: Result<SvgDocument, SvgError>) -> Self {
        match result {
            Ok(document) => Self::new(document),
            Err(e) => {
                tracing::error!("Could not load specified SVG resource: {}", e);
                Self::default()
            }
        }
    }

    /// Whether a document was parsed successfully
    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    /// The parsed document, if loading succeeded
    pub fn document(&self) -> Option<&SvgDocument> {
        self.document.as_ref()
    }

    /// Extract all paths scaled into a `width` x `height` viewport
    ///
    /// Each call extracts afresh from the cached document, so a new viewport
    /// size simply means calling this again.
    pub fn paths_for_viewport(
        &self,
        width: f32,
        height: f32,
        stroke_width: f32,
    ) -> Vec<PathGeometry> {
        match &self.document {
            Some(document) => extract_paths(document, Size::new(width, height), stroke_width),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathdraw_core::{IntRect, Point};

    const LINES: &str = r#"
        <svg xmlns="http://www.w3.org/2000/svg" width="100" height="50">
            <path d="M0,0 L100,0" fill="none" stroke="black"/>
            <path d="M0,50 L100,50" fill="none" stroke="black"/>
        </svg>
    "#;

    #[test]
    fn test_extract_scales_and_centers() {
        // 100x50 into 200x200: scale 2, 50px vertical margin on each side
        let paths = PathExtractor::load_str(LINES).paths_for_viewport(200.0, 200.0, 2.0);
        assert_eq!(paths.len(), 2);

        assert!((paths[0].total_length() - 200.0).abs() < 1e-3);
        assert_eq!(
            paths[0].tight_bounds().round_out(),
            IntRect::from_ltrb(0, 50, 200, 50)
        );
        // An open line encloses no area
        assert!(paths[0].bounds().is_empty());
        let end = paths[1].path().end_point().unwrap();
        assert!(end.approx_eq(Point::new(200.0, 150.0), 1e-3));
        assert_eq!(paths[1].stroke_width(), 2.0);
    }

    #[test]
    fn test_extract_different_viewports_from_one_document() {
        let extractor = PathExtractor::load_str(LINES);
        let small = extractor.paths_for_viewport(50.0, 50.0, 1.0);
        let large = extractor.paths_for_viewport(400.0, 400.0, 1.0);
        assert!((small[0].total_length() - 50.0).abs() < 1e-3);
        assert!((large[0].total_length() - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_one_geometry_per_draw() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
                <g>
                    <rect x="1" y="1" width="8" height="8" fill="red" stroke="blue"/>
                </g>
            </svg>
        "#;
        let paths = PathExtractor::load_str(svg).paths_for_viewport(10.0, 10.0, 1.0);
        assert_eq!(paths.len(), 2);
        assert!((paths[0].total_length() - 32.0).abs() < 1e-3);
        assert_eq!(paths[0].bounds(), IntRect::from_ltrb(1, 1, 9, 9));
        assert_eq!(paths[1].bounds(), paths[0].bounds());
    }

    #[test]
    fn test_empty_drawing_yields_no_paths() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"></svg>"#;
        let extractor = PathExtractor::load_str(svg);
        assert!(extractor.is_loaded());
        assert!(extractor.paths_for_viewport(100.0, 100.0, 1.0).is_empty());
    }

    #[test]
    fn test_parse_failure_yields_no_paths() {
        let extractor = PathExtractor::load(b"<not-svg");
        assert!(!extractor.is_loaded());
        assert!(extractor.paths_for_viewport(100.0, 100.0, 1.0).is_empty());
    }

    #[test]
    fn test_missing_file_yields_no_paths() {
        let extractor = PathExtractor::load_file("/nonexistent/drawing.svg");
        assert!(!extractor.is_loaded());
        assert!(extractor.paths_for_viewport(100.0, 100.0, 1.0).is_empty());
    }

    #[test]
    fn test_empty_viewport_yields_no_paths() {
        let extractor = PathExtractor::load_str(LINES);
        assert!(extractor.paths_for_viewport(0.0, 100.0, 1.0).is_empty());
    }
}
