//! SVG document type and loading

use std::fs;
use std::path::Path as FilePath;

use pathdraw_core::{Affine2D, Path, Rect, Size};
use usvg::{Options, Tree};

use crate::error::SvgError;
use crate::path::{usvg_path_to_pathdraw, usvg_transform_to_affine};

/// A loaded and parsed SVG document
///
/// This is the parse cache: load once, then extract geometry for as many
/// viewports as needed without touching the source again.
#[derive(Clone)]
pub struct SvgDocument {
    /// The underlying usvg tree
    tree: Tree,
    /// Original size of the SVG in user units
    pub width: f32,
    pub height: f32,
}

/// Which paint operation a draw uses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawKind {
    Fill,
    Stroke,
}

/// A single path draw found while walking the SVG
///
/// One path node produces up to two draws (fill and stroke), in the order the
/// node's `paint-order` paints them.
#[derive(Clone, Debug)]
pub struct SvgDrawOp {
    /// Path in document coordinates, with the node's absolute transform applied
    pub path: Path,
    pub kind: DrawKind,
    /// Stroke width in document units, for stroke draws
    pub stroke_width: Option<f32>,
}

impl SvgDocument {
    /// Load an SVG document from a file
    pub fn from_file(path: impl AsRef<FilePath>) -> Result<Self, SvgError> {
        let data = fs::read(path)?;
        Self::from_data(&data)
    }

    /// Load an SVG document from raw bytes
    pub fn from_data(data: &[u8]) -> Result<Self, SvgError> {
        let options = Options::default();
        let tree = Tree::from_data(data, &options).map_err(|e| SvgError::Parse(e.to_string()))?;

        let size = tree.size();

        Ok(Self {
            tree,
            width: size.width(),
            height: size.height(),
        })
    }

    /// Load an SVG document from a string
    pub fn from_str(svg_str: &str) -> Result<Self, SvgError> {
        Self::from_data(svg_str.as_bytes())
    }

    /// Get the original size of the SVG
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Get the bounding box of the SVG content
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Transform that fits the drawing into a viewport, centered, aspect preserved
    pub fn viewport_transform(&self, viewport: Size) -> Affine2D {
        Affine2D::fit_centered(self.size(), viewport)
    }

    /// Walk the document and collect every path draw in paint order
    pub fn draw_ops(&self) -> Vec<SvgDrawOp> {
        let mut ops = Vec::new();
        self.visit_paths(&mut |op| ops.push(op));
        ops
    }

    /// Walk the document, handing each path draw to `visitor` in paint order
    pub fn visit_paths(&self, visitor: &mut dyn FnMut(SvgDrawOp)) {
        visit_group(self.tree.root(), visitor);
    }
}

/// Recursively visit path draws in the node tree
fn visit_group(group: &usvg::Group, visitor: &mut dyn FnMut(SvgDrawOp)) {
    for child in group.children() {
        match child {
            usvg::Node::Group(g) => {
                // Transforms are handled per-path via abs_transform
                visit_group(g, visitor);
            }
            usvg::Node::Path(p) => {
                let transform = usvg_transform_to_affine(&p.abs_transform());
                let path = usvg_path_to_pathdraw(p.data()).transformed(&transform);

                let fill = p.fill().map(|_| SvgDrawOp {
                    path: path.clone(),
                    kind: DrawKind::Fill,
                    stroke_width: None,
                });
                let stroke = p.stroke().map(|s| SvgDrawOp {
                    path: path.clone(),
                    kind: DrawKind::Stroke,
                    stroke_width: Some(s.width().get()),
                });

                let ordered = match p.paint_order() {
                    usvg::PaintOrder::FillAndStroke => [fill, stroke],
                    usvg::PaintOrder::StrokeAndFill => [stroke, fill],
                };
                for op in ordered.into_iter().flatten() {
                    visitor(op);
                }
            }
            usvg::Node::Image(_) => {
                // Raster images have no outline to draw
            }
            usvg::Node::Text(_) => {
                // Text needs font outlines, which are not loaded
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_svg() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="100" height="50">
                <rect x="10" y="10" width="80" height="30" fill="red"/>
            </svg>
        "#;

        let doc = SvgDocument::from_str(svg).unwrap();
        assert_eq!(doc.width, 100.0);
        assert_eq!(doc.height, 50.0);

        let ops = doc.draw_ops();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].kind, DrawKind::Fill);
    }

    #[test]
    fn test_fill_and_stroke_are_separate_draws() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
                <path d="M10,10 L90,10 L90,90 L10,90 Z" fill="blue" stroke="black" stroke-width="2"/>
            </svg>
        "#;

        let doc = SvgDocument::from_str(svg).unwrap();
        let ops = doc.draw_ops();

        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].kind, DrawKind::Fill);
        assert_eq!(ops[1].kind, DrawKind::Stroke);
        assert_eq!(ops[1].stroke_width, Some(2.0));
    }

    #[test]
    fn test_paint_order_stroke_first() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
                <path d="M10,10 L90,10 L50,80 Z" fill="blue" stroke="black" paint-order="stroke"/>
            </svg>
        "#;

        let ops = SvgDocument::from_str(svg).unwrap().draw_ops();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].kind, DrawKind::Stroke);
        assert_eq!(ops[1].kind, DrawKind::Fill);
    }

    #[test]
    fn test_group_transform_applied() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
                <g transform="translate(20 30)">
                    <path d="M0,0 L10,0" fill="none" stroke="black"/>
                </g>
            </svg>
        "#;

        let ops = SvgDocument::from_str(svg).unwrap().draw_ops();
        assert_eq!(ops.len(), 1);
        let start = ops[0].path.commands()[0].end_point().unwrap();
        assert!(start.approx_eq(pathdraw_core::Point::new(20.0, 30.0), 1e-4));
    }

    #[test]
    fn test_document_order_is_preserved() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
                <path d="M0,0 L10,0" fill="none" stroke="black"/>
                <path d="M0,50 L20,50" fill="none" stroke="black"/>
                <path d="M0,90 L30,90" fill="none" stroke="black"/>
            </svg>
        "#;

        let ops = SvgDocument::from_str(svg).unwrap().draw_ops();
        let ends: Vec<f32> = ops
            .iter()
            .map(|op| op.path.end_point().unwrap().x)
            .collect();
        assert_eq!(ends, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_invalid_svg() {
        assert!(matches!(
            SvgDocument::from_str("this is not svg"),
            Err(SvgError::Parse(_))
        ));
    }
}
