//! SVG loading and path extraction for PathDraw
//!
//! This crate turns an SVG drawing into the ordered list of measured paths
//! that a path-drawing animation reveals. It uses `usvg` for parsing and
//! simplification, so shapes, arcs and transforms arrive already normalized.
//!
//! # Example
//!
//! ```ignore
//! use pathdraw_svg::PathExtractor;
//!
//! let extractor = PathExtractor::load_file("signature.svg");
//! let paths = extractor.paths_for_viewport(400.0, 300.0, 2.0);
//! for geometry in &paths {
//!     println!("{:.1} {:?}", geometry.total_length(), geometry.bounds());
//! }
//! ```

mod document;
mod error;
mod extract;
mod path;
mod rasterize;

pub use document::{DrawKind, SvgDocument, SvgDrawOp};
pub use error::SvgError;
pub use extract::{extract_paths, PathExtractor};
pub use rasterize::{PreviewFrame, PreviewStyle};
