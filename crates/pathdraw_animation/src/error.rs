//! Animation error types

use thiserror::Error;

/// Errors raised while configuring an animation
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum AnimationError {
    /// A run cannot last zero milliseconds
    #[error("Animation duration must be greater than 0ms")]
    InvalidDuration,

    /// Scrub position that is not a finite number
    #[error("Animation progress must be a finite number, got {0}")]
    InvalidProgress(f32),
}
