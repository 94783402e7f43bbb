//! Per-path reveal state
//!
//! A `RevealState` tracks how much of one path is visible and keeps the
//! truncated path ready for drawing. Every progress update notifies the
//! state's listener, even when the value did not change, so a host can treat
//! each notification as "draw a frame".

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use pathdraw_core::{Path, PathGeometry};

/// Receives a notification after every reveal step
pub trait RevealListener {
    fn on_step(&self);
}

impl<F: Fn()> RevealListener for F {
    fn on_step(&self) {
        self()
    }
}

/// A reveal state shared between a controller and its running timeline
pub type SharedRevealState = Rc<RefCell<RevealState>>;

/// How much of a single path is currently drawn
pub struct RevealState {
    geometry: Arc<PathGeometry>,
    revealed_length: f32,
    visible: Path,
    listener: Option<Rc<dyn RevealListener>>,
}

impl RevealState {
    /// Start fully hidden
    pub fn new(geometry: Arc<PathGeometry>) -> Self {
        Self {
            geometry,
            revealed_length: 0.0,
            visible: Path::new(),
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: impl RevealListener + 'static) -> Self {
        self.listener = Some(Rc::new(listener));
        self
    }

    /// Replace or clear the listener
    pub fn set_listener(&mut self, listener: Option<Rc<dyn RevealListener>>) {
        self.listener = listener;
    }

    pub fn geometry(&self) -> &Arc<PathGeometry> {
        &self.geometry
    }

    pub fn total_length(&self) -> f32 {
        self.geometry.total_length()
    }

    /// Visible arc length, always within `0..=total_length`
    pub fn revealed_length(&self) -> f32 {
        self.revealed_length
    }

    /// Fraction of the path that is visible
    ///
    /// A zero-length path counts as fully revealed.
    pub fn progress(&self) -> f32 {
        let total = self.total_length();
        if total <= 0.0 {
            1.0
        } else {
            self.revealed_length / total
        }
    }

    /// The currently visible part of the path
    pub fn visible_path(&self) -> &Path {
        &self.visible
    }

    /// Reveal `progress` of the path and notify the listener
    ///
    /// `progress` is clamped to `[0, 1]`; NaN counts as 0.
    pub fn set_progress(&mut self, progress: f32) {
        self.update(progress);
        if let Some(listener) = &self.listener {
            listener.on_step();
        }
    }

    fn update(&mut self, progress: f32) {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let total = self.geometry.total_length();
        self.revealed_length = (p * total).min(total);
        self.visible = self.geometry.truncate(self.revealed_length);
    }
}

/// Update a shared state and notify its listener once the borrow is released
///
/// Listeners may read any state, this one included, while they run.
pub(crate) fn step_shared(state: &RefCell<RevealState>, progress: f32) {
    let listener = {
        let mut state = state.borrow_mut();
        state.update(progress);
        state.listener.clone()
    };
    if let Some(listener) = listener {
        listener.on_step();
    }
}
