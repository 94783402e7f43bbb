//! Reveal timelines
//!
//! A `RevealTimeline` owns one run of a path-drawing animation: a time window
//! per path, the phase each path is in, and the repeat bookkeeping. It is
//! advanced by the scheduler (or directly, in tests) with elapsed milliseconds
//! and pushes eased progress into each path's reveal state.
//!
//! Window layout:
//!
//! ```text
//! Sequential, delay 200, duration 1000
//! path 0  [0 ............ 1000)
//! path 1      [200 ............ 1200)
//! path 2          [400 ............ 1400)
//!
//! Parallel, duration 1000
//! path 0  [0 ............ 1000)
//! path 1  [0 ............ 1000)
//! ```

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::reveal::{step_shared, SharedRevealState};

/// How path windows are laid out in time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ordering {
    /// Path `i` starts `i * delay` after the run starts
    #[default]
    Sequential,
    /// Every path starts immediately
    Parallel,
}

/// When a single path animates within a run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_offset_ms: u64,
    pub duration_ms: u32,
}

impl TimeWindow {
    pub fn end_ms(&self) -> u64 {
        self.start_offset_ms + u64::from(self.duration_ms)
    }

    /// Local progress at `position_ms`, clamped to `[0, 1]`
    pub fn progress_at(&self, position_ms: f64) -> f32 {
        if self.duration_ms == 0 {
            return if position_ms >= self.start_offset_ms as f64 {
                1.0
            } else {
                0.0
            };
        }
        let local = (position_ms - self.start_offset_ms as f64) / f64::from(self.duration_ms);
        local.clamp(0.0, 1.0) as f32
    }

    /// Phase at `position_ms`
    ///
    /// Playing forward the window is `[start, end)`; playing in reverse it is
    /// `(start, end]`, so each direction ends with the path in its final phase.
    pub fn phase_at(&self, position_ms: f64, reversed: bool) -> PathPhase {
        let start = self.start_offset_ms as f64;
        let end = self.end_ms() as f64;
        let before_start = if reversed {
            position_ms <= start
        } else {
            position_ms < start
        };

        if before_start {
            PathPhase::Pending
        } else if position_ms >= end {
            PathPhase::Complete
        } else {
            PathPhase::Revealing
        }
    }
}

/// Lay out windows for `count` paths
pub fn compute_windows(
    count: usize,
    ordering: Ordering,
    delay_ms: u32,
    duration_ms: u32,
) -> Vec<TimeWindow> {
    (0..count)
        .map(|i| TimeWindow {
            start_offset_ms: match ordering {
                Ordering::Sequential => i as u64 * u64::from(delay_ms),
                Ordering::Parallel => 0,
            },
            duration_ms,
        })
        .collect()
}

/// Length of one iteration over `windows`; zero for no paths
pub fn run_length_ms(windows: &[TimeWindow]) -> u64 {
    windows.iter().map(TimeWindow::end_ms).max().unwrap_or(0)
}

/// Where a path is within the current iteration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathPhase {
    Pending,
    Revealing,
    Complete,
}

/// How many iterations a run plays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RepeatRepr", into = "RepeatRepr")]
pub enum Repeat {
    /// Play this many iterations; 0 is treated as 1
    Times(u32),
    Forever,
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Times(1)
    }
}

/// Config form of `Repeat`: a count or the word `"forever"`
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RepeatRepr {
    Count(u32),
    Word(String),
}

impl TryFrom<RepeatRepr> for Repeat {
    type Error = String;

    fn try_from(repr: RepeatRepr) -> Result<Self, Self::Error> {
        match repr {
            RepeatRepr::Count(n) => Ok(Repeat::Times(n)),
            RepeatRepr::Word(word) if word.eq_ignore_ascii_case("forever") => Ok(Repeat::Forever),
            RepeatRepr::Word(word) => Err(format!(
                "invalid repeat value '{}': expected a count or \"forever\"",
                word
            )),
        }
    }
}

impl From<Repeat> for RepeatRepr {
    fn from(repeat: Repeat) -> Self {
        match repeat {
            Repeat::Times(n) => RepeatRepr::Count(n),
            Repeat::Forever => RepeatRepr::Word("forever".to_string()),
        }
    }
}

/// Run-level notifications
pub trait RunListener {
    fn on_start(&self) {}
    /// A new iteration began; the first one is iteration 0, so this sees 1 and up
    fn on_repeat(&self, _iteration: u32) {}
    fn on_end(&self) {}
}

/// Run state shared between a controller and the timeline it registered
///
/// Bumping the epoch invalidates every timeline created before the bump:
/// such a timeline stops applying steps at the next path it would update.
#[derive(Debug, Default)]
pub struct RunControl {
    epoch: Cell<u64>,
    paused: Cell<bool>,
    running: Cell<bool>,
    /// Seek requested while the timeline was busy
    pending_seek: Cell<Option<f32>>,
}

impl RunControl {
    pub fn epoch(&self) -> u64 {
        self.epoch.get()
    }

    /// Invalidate the current run, returning the new epoch
    pub fn invalidate(&self) -> u64 {
        let next = self.epoch.get().wrapping_add(1);
        self.epoch.set(next);
        self.running.set(false);
        self.pending_seek.set(None);
        next
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.set(paused);
    }

    /// Whether the current run has started and not yet ended or been cancelled
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    fn set_running(&self, running: bool) {
        self.running.set(running);
    }

    /// Ask the current run to seek once it finishes its current step
    ///
    /// A later request replaces an earlier one that has not been applied yet.
    pub fn request_seek(&self, position_ms: f32) {
        self.pending_seek.set(Some(position_ms));
    }

    fn take_pending_seek(&self) -> Option<f32> {
        self.pending_seek.take()
    }
}

struct Track {
    state: SharedRevealState,
    window: TimeWindow,
    phase: PathPhase,
}

/// One run of a path-drawing animation
pub struct RevealTimeline {
    tracks: Vec<Track>,
    easing: Easing,
    repeat: Repeat,
    alternate: bool,
    run_ms: u64,
    /// Position within the current iteration
    elapsed_ms: f64,
    iteration: u32,
    playing: bool,
    control: Rc<RunControl>,
    run_epoch: u64,
    run_listener: Option<Rc<dyn RunListener>>,
}

impl RevealTimeline {
    /// Create a timeline over `states`, laid out by `ordering`
    pub fn new(
        states: Vec<SharedRevealState>,
        ordering: Ordering,
        delay_ms: u32,
        duration_ms: u32,
    ) -> Self {
        let windows = compute_windows(states.len(), ordering, delay_ms, duration_ms);
        let run_ms = run_length_ms(&windows);
        let tracks = states
            .into_iter()
            .zip(windows)
            .map(|(state, window)| Track {
                state,
                window,
                phase: PathPhase::Pending,
            })
            .collect();
        let control = Rc::new(RunControl::default());
        let run_epoch = control.epoch();

        Self {
            tracks,
            easing: Easing::Linear,
            repeat: Repeat::default(),
            alternate: false,
            run_ms,
            elapsed_ms: 0.0,
            iteration: 0,
            playing: false,
            control,
            run_epoch,
            run_listener: None,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Play every other iteration in reverse
    pub fn with_alternate(mut self, alternate: bool) -> Self {
        self.alternate = alternate;
        self
    }

    /// Tie this timeline to a controller's run state
    pub fn with_control(mut self, control: Rc<RunControl>) -> Self {
        self.run_epoch = control.epoch();
        self.control = control;
        self
    }

    pub fn with_run_listener(mut self, listener: Option<Rc<dyn RunListener>>) -> Self {
        self.run_listener = listener;
        self
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn window(&self, index: usize) -> Option<TimeWindow> {
        self.tracks.get(index).map(|t| t.window)
    }

    pub fn phase(&self, index: usize) -> Option<PathPhase> {
        self.tracks.get(index).map(|t| t.phase)
    }

    /// Length of one iteration
    pub fn run_length_ms(&self) -> u64 {
        self.run_ms
    }

    /// Position within the current iteration
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Whether the current iteration plays backwards
    pub fn is_reversed(&self) -> bool {
        self.alternate && self.iteration % 2 == 1
    }

    /// Still needs ticks
    pub fn is_playing(&self) -> bool {
        self.playing && self.is_current() && !self.control.is_paused()
    }

    fn is_current(&self) -> bool {
        self.control.epoch() == self.run_epoch
    }

    /// Start from the beginning, hiding every path
    pub fn start(&mut self) {
        self.run_epoch = self.control.epoch();
        self.iteration = 0;
        self.elapsed_ms = 0.0;
        self.playing = true;
        self.control.set_running(true);

        for track in &mut self.tracks {
            if self.control.epoch() != self.run_epoch {
                return;
            }
            track.phase = PathPhase::Pending;
            step_shared(&track.state, 0.0);
        }

        tracing::debug!(
            "Reveal run started: {} paths, {}ms per iteration, {:?}",
            self.tracks.len(),
            self.run_ms,
            self.repeat
        );

        if let Some(listener) = self.run_listener.clone() {
            if self.is_current() {
                listener.on_start();
            }
        }
        self.apply_pending_seek();
    }

    /// Halt ticking, leaving every path as it is
    pub fn stop(&mut self) {
        self.playing = false;
        if self.is_current() {
            self.control.set_running(false);
        }
    }

    /// Advance by `dt_ms` and apply the new position to every path
    ///
    /// Returns true while the run needs more ticks. A seek requested by a
    /// listener during the tick is applied before returning.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if !self.is_current() {
            self.playing = false;
            return false;
        }
        if self.is_playing() {
            self.advance_by(dt_ms);
            self.apply_pending_seek();
        }

        self.is_playing()
    }

    /// Jump to `position_ms` within the current iteration
    ///
    /// Paths whose phase changes are finalized exactly as during playback.
    pub fn seek(&mut self, position_ms: f32) {
        self.seek_to(position_ms);
        self.apply_pending_seek();
    }

    fn seek_to(&mut self, position_ms: f32) {
        if !self.is_current() {
            return;
        }
        let position = if position_ms.is_nan() {
            0.0
        } else {
            f64::from(position_ms).clamp(0.0, self.run_ms as f64)
        };
        self.elapsed_ms = position;
        self.apply(position);
    }

    /// Apply at most one seek requested while this timeline was busy
    fn apply_pending_seek(&mut self) {
        if let Some(position) = self.control.take_pending_seek() {
            if self.is_current() {
                tracing::trace!("Applying deferred seek to {}ms", position);
                self.seek_to(position);
            }
        }
    }

    fn advance_by(&mut self, dt_ms: f32) {
        self.elapsed_ms += f64::from(dt_ms.max(0.0));

        loop {
            let run = self.run_ms as f64;
            if self.elapsed_ms < run {
                self.apply(self.elapsed_ms);
                break;
            }

            // Finalize the iteration that just ended before starting the next
            self.apply(run);
            if !self.is_current() {
                break;
            }

            if self.run_ms > 0 && self.has_next_iteration() {
                self.elapsed_ms -= run;
                self.skip_whole_iterations();
                self.iteration = self.iteration.saturating_add(1);
                self.begin_iteration();
                if !self.is_current() {
                    break;
                }
                tracing::trace!("Reveal run iteration {}", self.iteration);
                if let Some(listener) = self.run_listener.clone() {
                    listener.on_repeat(self.iteration);
                }
            } else {
                self.elapsed_ms = run;
                self.finish();
                break;
            }
        }
    }

    /// Drop iterations that would begin and end entirely inside the time left
    ///
    /// The iteration begun next shows the same thing it would after playing
    /// them all: alternating runs only skip in pairs, and a counted run keeps
    /// its final iteration so it still ends on it.
    fn skip_whole_iterations(&mut self) {
        let run = self.run_ms as f64;
        let mut whole = (self.elapsed_ms / run).floor();
        if let Repeat::Times(n) = self.repeat {
            let left_after_next = f64::from(n.max(1)) - f64::from(self.iteration) - 2.0;
            whole = whole.min(left_after_next.max(0.0));
        }
        if self.alternate {
            whole -= whole % 2.0;
        }
        if whole < 1.0 {
            return;
        }

        self.elapsed_ms = (self.elapsed_ms - whole * run).max(0.0);
        self.iteration = self
            .iteration
            .saturating_add(whole.min(f64::from(u32::MAX)) as u32);
        tracing::trace!("Skipped {} whole reveal iterations", whole);
    }

    fn has_next_iteration(&self) -> bool {
        match self.repeat {
            Repeat::Forever => true,
            Repeat::Times(n) => self.iteration + 1 < n.max(1),
        }
    }

    fn begin_iteration(&mut self) {
        let reversed = self.is_reversed();
        let replay = !reversed && !self.alternate;

        for track in &mut self.tracks {
            if self.control.epoch() != self.run_epoch {
                return;
            }
            track.phase = if reversed {
                PathPhase::Complete
            } else {
                PathPhase::Pending
            };
            if replay {
                step_shared(&track.state, 0.0);
            }
        }
    }

    fn finish(&mut self) {
        self.playing = false;
        self.control.set_running(false);
        tracing::debug!("Reveal run finished after {} iterations", self.iteration + 1);
        if let Some(listener) = self.run_listener.clone() {
            listener.on_end();
        }
    }

    /// Bring every path to its state at `elapsed` into the current iteration
    fn apply(&mut self, elapsed: f64) {
        let reversed = self.is_reversed();
        let position = if reversed {
            self.run_ms as f64 - elapsed
        } else {
            elapsed
        };
        let easing = self.easing;

        for track in &mut self.tracks {
            // A listener may have cancelled the run during the previous step
            if self.control.epoch() != self.run_epoch {
                return;
            }

            let phase = track.window.phase_at(position, reversed);
            match phase {
                PathPhase::Revealing => {
                    let p = track.window.progress_at(position);
                    step_shared(&track.state, easing.apply(p));
                }
                PathPhase::Complete if track.phase != PathPhase::Complete => {
                    step_shared(&track.state, 1.0);
                }
                PathPhase::Pending if track.phase != PathPhase::Pending => {
                    step_shared(&track.state, 0.0);
                }
                _ => {}
            }
            track.phase = phase;
        }
    }
}
