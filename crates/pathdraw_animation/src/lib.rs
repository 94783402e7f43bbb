//! PathDraw Animation System
//!
//! Reveal timelines that "draw" extracted paths over time.
//!
//! # Features
//!
//! - **Reveal State**: per-path visible length with a truncated path ready to draw
//! - **Timelines**: sequential (staggered) or parallel time windows per path
//! - **Repeat**: fixed or endless iterations, optionally alternating direction
//! - **Scheduler**: single-threaded, ticked from the host's frame callback
//! - **Controller**: `PathAnimator` with delay, duration, start, stop, pause and scrubbing

pub mod animator;
pub mod easing;
pub mod error;
pub mod reveal;
pub mod scheduler;
pub mod timeline;

pub use animator::{AnimatorConfig, PathAnimator};
pub use easing::Easing;
pub use error::AnimationError;
pub use reveal::{RevealListener, RevealState, SharedRevealState};
pub use scheduler::{AnimationScheduler, SchedulerHandle, TimelineId};
pub use timeline::{
    compute_windows, run_length_ms, Ordering, PathPhase, Repeat, RevealTimeline, RunControl,
    RunListener, TimeWindow,
};
