//! PathDraw Core Geometry
//!
//! This crate provides the geometric foundation for path-drawing animations:
//!
//! - **Geometry**: points, sizes, float and integer rects, affine transforms
//! - **Paths**: a plain command list (`MoveTo`, `LineTo`, `QuadTo`, `CubicTo`, `Close`)
//! - **Path Metrics**: `PathGeometry`, an immutable path with precomputed
//!   arc length (measured with `kurbo`) and filled-region bounds (scanned with
//!   `tiny-skia`) that can cut itself at any arc length
//!
//! # Example
//!
//! ```rust
//! use pathdraw_core::{Path, PathGeometry, Point};
//!
//! let geometry = PathGeometry::new(Path::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0)));
//! assert_eq!(geometry.total_length(), 100.0);
//!
//! // The first quarter of the line
//! let visible = geometry.truncate(25.0);
//! assert_eq!(visible.end_point(), Some(Point::new(25.0, 0.0)));
//! ```

pub mod geometry;
pub mod measure;
pub mod path;
mod region;

pub use geometry::{Affine2D, IntRect, Point, Rect, Size};
pub use measure::{PathGeometry, DEFAULT_ACCURACY};
pub use path::{Path, PathCommand};
