//! SVG error types

use std::io;
use thiserror::Error;

/// Errors that can occur when loading SVG files or rasterizing previews
#[derive(Error, Debug)]
pub enum SvgError {
    /// IO error when reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// SVG parsing error
    #[error("SVG parsing error: {0}")]
    Parse(String),

    /// Preview surface with a zero dimension
    #[error("Invalid dimensions {width}x{height}: width and height must be > 0")]
    InvalidSize { width: u32, height: u32 },

    /// PNG encoding failure
    #[error("PNG encoding error: {0}")]
    Encode(String),
}
