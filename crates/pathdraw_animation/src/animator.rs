//! Path animation controller
//!
//! `PathAnimator` is the public handle for a drawing animation. It owns one
//! reveal state per extracted path, keeps the run configuration, and registers
//! a fresh `RevealTimeline` with the scheduler on every `start()`.
//!
//! ```ignore
//! let scheduler = AnimationScheduler::new();
//! let paths = PathExtractor::load_file("logo.svg").paths_for_viewport(400.0, 400.0, 2.0);
//!
//! let mut animator = PathAnimator::from_geometries(scheduler.handle(), paths);
//! animator.set_listener(move || window.request_redraw());
//! animator.delay(200).duration(1000)?.start();
//! ```

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use pathdraw_core::PathGeometry;
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::AnimationError;
use crate::reveal::{RevealListener, RevealState, SharedRevealState};
use crate::scheduler::{SchedulerHandle, TimelineId};
use crate::timeline::{
    compute_windows, run_length_ms, Ordering, PathPhase, Repeat, RevealTimeline, RunControl,
    RunListener,
};

/// Run configuration for a `PathAnimator`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Stagger between consecutive paths in sequential runs
    pub delay_ms: u32,
    /// Reveal time of each path; must be greater than zero
    pub duration_ms: u32,
    pub ordering: Ordering,
    pub easing: Easing,
    pub repeat: Repeat,
    /// Play every other iteration in reverse
    pub alternate: bool,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            delay_ms: 200,
            duration_ms: 1000,
            ordering: Ordering::Sequential,
            easing: Easing::Linear,
            repeat: Repeat::Times(1),
            alternate: false,
        }
    }
}

impl AnimatorConfig {
    pub fn validate(&self) -> Result<(), AnimationError> {
        if self.duration_ms == 0 {
            return Err(AnimationError::InvalidDuration);
        }
        Ok(())
    }
}

/// Controller for a path-drawing animation
///
/// Configuration setters only take effect on the next `start()`. Dropping the
/// animator cancels its run and unregisters the timeline.
pub struct PathAnimator {
    handle: SchedulerHandle,
    states: Vec<SharedRevealState>,
    config: AnimatorConfig,
    control: Rc<RunControl>,
    timeline_id: Option<TimelineId>,
    run_listener: Option<Rc<dyn RunListener>>,
}

impl PathAnimator {
    /// Create an animator over shared geometry, every path hidden
    pub fn new(
        handle: SchedulerHandle,
        geometries: impl IntoIterator<Item = Arc<PathGeometry>>,
    ) -> Self {
        let states = geometries
            .into_iter()
            .map(|g| Rc::new(RefCell::new(RevealState::new(g))))
            .collect();

        Self {
            handle,
            states,
            config: AnimatorConfig::default(),
            control: Rc::new(RunControl::default()),
            timeline_id: None,
            run_listener: None,
        }
    }

    /// Create an animator that takes ownership of freshly extracted geometry
    pub fn from_geometries(handle: SchedulerHandle, geometries: Vec<PathGeometry>) -> Self {
        Self::new(handle, geometries.into_iter().map(Arc::new))
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: AnimatorConfig) -> Result<Self, AnimationError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    /// Stagger between consecutive paths
    pub fn delay(&mut self, delay_ms: u32) -> &mut Self {
        self.config.delay_ms = delay_ms;
        self
    }

    /// Reveal time of each path
    pub fn duration(&mut self, duration_ms: u32) -> Result<&mut Self, AnimationError> {
        if duration_ms == 0 {
            return Err(AnimationError::InvalidDuration);
        }
        self.config.duration_ms = duration_ms;
        Ok(self)
    }

    pub fn ordering(&mut self, ordering: Ordering) -> &mut Self {
        self.config.ordering = ordering;
        self
    }

    pub fn easing(&mut self, easing: Easing) -> &mut Self {
        self.config.easing = easing;
        self
    }

    pub fn repeat(&mut self, repeat: Repeat) -> &mut Self {
        self.config.repeat = repeat;
        self
    }

    pub fn alternate(&mut self, alternate: bool) -> &mut Self {
        self.config.alternate = alternate;
        self
    }

    /// Notify `listener` after every step of every path
    pub fn set_listener(&mut self, listener: impl RevealListener + 'static) {
        let listener: Rc<dyn RevealListener> = Rc::new(listener);
        for state in &self.states {
            state.borrow_mut().set_listener(Some(listener.clone()));
        }
    }

    /// Set the listener of a single path
    ///
    /// Returns false if `index` is out of range.
    pub fn set_path_listener(
        &mut self,
        index: usize,
        listener: Option<Rc<dyn RevealListener>>,
    ) -> bool {
        match self.states.get(index) {
            Some(state) => {
                state.borrow_mut().set_listener(listener);
                true
            }
            None => false,
        }
    }

    /// Receive run start, repeat and end notifications; applies from the next `start()`
    pub fn set_run_listener(&mut self, listener: Option<Rc<dyn RunListener>>) {
        self.run_listener = listener;
    }

    /// Number of animated paths
    pub fn path_count(&self) -> usize {
        self.states.len()
    }

    /// Length of one iteration with the current configuration
    pub fn run_length_ms(&self) -> u64 {
        run_length_ms(&compute_windows(
            self.states.len(),
            self.config.ordering,
            self.config.delay_ms,
            self.config.duration_ms,
        ))
    }

    /// Start a new run from the beginning
    ///
    /// Any earlier run is cancelled first. Every path is reset to hidden,
    /// notifying each listener once.
    pub fn start(&mut self) {
        self.prepare_run(false);
    }

    /// Cancel the current run, leaving every path as it is
    pub fn stop(&mut self) {
        self.control.invalidate();
        self.control.set_paused(false);
        if let Some(id) = self.timeline_id.take() {
            self.handle.remove_timeline(id);
            tracing::debug!("Path animation stopped");
        }
    }

    /// Same as `stop()`
    pub fn cancel(&mut self) {
        self.stop();
    }

    /// Freeze the current run in place
    ///
    /// Does nothing once the run has ended or been stopped.
    pub fn pause(&mut self) {
        if self.timeline_id.is_some() && self.control.is_running() {
            self.control.set_paused(true);
        }
    }

    /// Continue a paused run
    ///
    /// Wall-clock time spent paused is not played back.
    pub fn resume(&mut self) {
        if self.control.is_paused() {
            self.control.set_paused(false);
            self.handle.reset_clock();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.control.is_paused()
    }

    /// Whether a run is in progress (started, not ended, not stopped)
    ///
    /// A paused run still counts as running.
    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    /// Scrub to `position_ms` within the current iteration
    ///
    /// Without an active run this prepares a paused one first, so a host can
    /// scrub a drawing it never started. Called from a listener while the run
    /// is stepping, the seek lands as soon as the current step finishes.
    pub fn seek(&mut self, position_ms: u32) {
        let position = position_ms as f32;
        if self.timeline_id.is_none() {
            if self.control.is_running() {
                // Still inside prepare_run's reset
                self.control.request_seek(position);
                return;
            }
            self.prepare_run(true);
        }
        if let Some(id) = self.timeline_id {
            let applied = self.handle.with_timeline_mut(id, |t| t.seek(position));
            if applied.is_none() && self.handle.is_alive() {
                tracing::trace!("Timeline is busy; deferring seek to {}ms", position_ms);
                self.control.request_seek(position);
            }
        }
    }

    /// Scrub to a fraction of one iteration
    pub fn set_percentage(&mut self, fraction: f32) -> Result<(), AnimationError> {
        if !fraction.is_finite() {
            return Err(AnimationError::InvalidProgress(fraction));
        }
        let position = fraction.clamp(0.0, 1.0) as f64 * self.run_length_ms() as f64;
        self.seek(position.round() as u32);
        Ok(())
    }

    /// Where path `index` stands in the current iteration
    ///
    /// `None` without a run, for an unknown index, or while the run is stepping.
    pub fn phase(&self, index: usize) -> Option<PathPhase> {
        let id = self.timeline_id?;
        self.handle.with_timeline(id, |t| t.phase(index)).flatten()
    }

    /// Read every reveal state, in path order
    ///
    /// Do not advance the scheduler from inside `f`.
    pub fn with_states<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[Ref<'_, RevealState>]) -> R,
    {
        let states: Vec<Ref<'_, RevealState>> = self.states.iter().map(|s| s.borrow()).collect();
        f(&states)
    }

    /// Read a single reveal state
    pub fn with_state<F, R>(&self, index: usize, f: F) -> Option<R>
    where
        F: FnOnce(&RevealState) -> R,
    {
        self.states.get(index).map(|s| f(&s.borrow()))
    }

    fn prepare_run(&mut self, paused: bool) {
        self.stop();

        let config = self.config;
        let mut timeline = RevealTimeline::new(
            self.states.clone(),
            config.ordering,
            config.delay_ms,
            config.duration_ms,
        )
        .with_easing(config.easing)
        .with_repeat(config.repeat)
        .with_alternate(config.alternate)
        .with_control(self.control.clone())
        .with_run_listener(self.run_listener.clone());

        let epoch = self.control.epoch();
        self.control.set_paused(paused);
        timeline.start();

        // A listener restarted or stopped us during the reset
        if self.control.epoch() != epoch {
            return;
        }

        self.timeline_id = self.handle.register_timeline(timeline);
        if self.timeline_id.is_none() {
            self.control.invalidate();
            tracing::warn!("Animation scheduler is gone; path animation will not run");
        }
    }
}

impl Drop for PathAnimator {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::AnimationScheduler;
    use pathdraw_core::{Path, Point};
    use std::cell::Cell;
    use std::time::Duration;

    fn lines(count: usize) -> Vec<PathGeometry> {
        (0..count)
            .map(|i| {
                let y = i as f32 * 10.0;
                PathGeometry::new(Path::line(Point::new(0.0, y), Point::new(100.0, y)))
            })
            .collect()
    }

    fn progress(animator: &PathAnimator) -> Vec<f32> {
        animator.with_states(|states| states.iter().map(|s| s.progress()).collect())
    }

    #[test]
    fn test_default_config() {
        let config = AnimatorConfig::default();
        assert_eq!(config.delay_ms, 200);
        assert_eq!(config.duration_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let scheduler = AnimationScheduler::new();
        let mut animator = PathAnimator::from_geometries(scheduler.handle(), lines(1));
        assert_eq!(
            animator.duration(0).err(),
            Some(AnimationError::InvalidDuration)
        );
        assert_eq!(animator.config().duration_ms, 1000);

        let config = AnimatorConfig {
            duration_ms: 0,
            ..Default::default()
        };
        assert!(PathAnimator::from_geometries(scheduler.handle(), lines(1))
            .with_config(config)
            .is_err());
    }

    #[test]
    fn test_setters_do_nothing_until_start() {
        let scheduler = AnimationScheduler::new();
        let mut animator = PathAnimator::from_geometries(scheduler.handle(), lines(2));
        animator
            .delay(100)
            .ordering(Ordering::Parallel)
            .duration(500)
            .unwrap();

        assert_eq!(scheduler.timeline_count(), 0);
        assert!(!animator.is_running());
        assert_eq!(animator.run_length_ms(), 500);
    }

    #[test]
    fn test_start_resets_and_notifies_once_per_path() {
        let scheduler = AnimationScheduler::new();
        let mut animator = PathAnimator::from_geometries(scheduler.handle(), lines(3));
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        animator.set_listener(move || c.set(c.get() + 1));

        animator.start();
        assert_eq!(count.get(), 3);
        assert!(animator.is_running());
        assert_eq!(scheduler.timeline_count(), 1);
    }

    #[test]
    fn test_stop_leaves_values() {
        let scheduler = AnimationScheduler::new();
        let mut animator = PathAnimator::from_geometries(scheduler.handle(), lines(1));
        animator.delay(0).duration(1000).unwrap().start();

        scheduler.advance(400.0);
        animator.stop();
        scheduler.advance(400.0);

        assert!((progress(&animator)[0] - 0.4).abs() < 1e-4);
        assert!(!animator.is_running());
        assert_eq!(scheduler.timeline_count(), 0);
    }

    #[test]
    fn test_stop_from_listener_mid_tick() {
        let scheduler = AnimationScheduler::new();
        let animator = Rc::new(RefCell::new(PathAnimator::from_geometries(
            scheduler.handle(),
            lines(3),
        )));
        animator
            .borrow_mut()
            .ordering(Ordering::Parallel)
            .duration(1000)
            .unwrap();
        animator.borrow_mut().start();

        let weak = Rc::downgrade(&animator);
        let steps = Rc::new(Cell::new(0));
        let s = steps.clone();
        animator.borrow_mut().set_path_listener(
            0,
            Some(Rc::new(move || {
                s.set(s.get() + 1);
                if let Some(animator) = weak.upgrade() {
                    animator.borrow_mut().stop();
                }
            })),
        );

        scheduler.advance(500.0);
        assert_eq!(steps.get(), 1);
        let values = progress(&animator.borrow());
        assert!((values[0] - 0.5).abs() < 1e-4);
        assert_eq!(&values[1..], &[0.0, 0.0]);
        assert_eq!(scheduler.timeline_count(), 0);

        scheduler.advance(500.0);
        assert_eq!(steps.get(), 1);
    }

    #[test]
    fn test_pause_and_resume() {
        let scheduler = AnimationScheduler::new();
        let mut animator = PathAnimator::from_geometries(scheduler.handle(), lines(1));
        animator.delay(0).duration(1000).unwrap().start();

        scheduler.advance(200.0);
        animator.pause();
        assert!(animator.is_paused());
        assert!(!scheduler.advance(500.0));
        assert!((progress(&animator)[0] - 0.2).abs() < 1e-4);

        animator.resume();
        assert!(scheduler.advance(300.0));
        assert!((progress(&animator)[0] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_resume_skips_paused_wall_clock_time() {
        let scheduler = AnimationScheduler::new();
        let mut animator = PathAnimator::from_geometries(scheduler.handle(), lines(1));
        animator.delay(0).duration(1000).unwrap().start();

        scheduler.tick();
        animator.pause();
        assert!(!scheduler.tick());
        std::thread::sleep(Duration::from_millis(300));

        animator.resume();
        assert!(scheduler.tick());
        assert!(progress(&animator)[0] < 0.2);
    }

    #[test]
    fn test_resume_after_seek_skips_idle_time() {
        let scheduler = AnimationScheduler::new();
        let mut animator = PathAnimator::from_geometries(scheduler.handle(), lines(1));
        animator.delay(0).duration(1000).unwrap();

        animator.seek(100);
        std::thread::sleep(Duration::from_millis(300));
        animator.resume();
        assert!(scheduler.tick());
        assert!(progress(&animator)[0] < 0.25);
    }

    #[test]
    fn test_pause_after_run_ended() {
        let scheduler = AnimationScheduler::new();
        let mut animator = PathAnimator::from_geometries(scheduler.handle(), lines(1));
        animator.delay(0).duration(100).unwrap().start();

        assert!(!scheduler.advance(200.0));
        animator.pause();
        assert!(!animator.is_paused());
        assert!(!animator.is_running());
    }

    #[test]
    fn test_seek_from_listener_mid_tick() {
        let scheduler = AnimationScheduler::new();
        let animator = Rc::new(RefCell::new(PathAnimator::from_geometries(
            scheduler.handle(),
            lines(2),
        )));
        animator
            .borrow_mut()
            .ordering(Ordering::Parallel)
            .duration(1000)
            .unwrap();
        animator.borrow_mut().start();

        let weak = Rc::downgrade(&animator);
        let sought = Rc::new(Cell::new(false));
        let flag = sought.clone();
        animator.borrow_mut().set_path_listener(
            0,
            Some(Rc::new(move || {
                if !flag.replace(true) {
                    if let Some(animator) = weak.upgrade() {
                        animator.borrow_mut().seek(100);
                    }
                }
            })),
        );

        scheduler.advance(500.0);
        assert!(sought.get());
        let values = progress(&animator.borrow());
        assert!((values[0] - 0.1).abs() < 1e-4);
        assert!((values[1] - 0.1).abs() < 1e-4);

        scheduler.advance(100.0);
        let values = progress(&animator.borrow());
        assert!((values[0] - 0.2).abs() < 1e-4);
        assert!((values[1] - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_phase_follows_run() {
        let scheduler = AnimationScheduler::new();
        let mut animator = PathAnimator::from_geometries(scheduler.handle(), lines(2));
        animator.delay(500).duration(500).unwrap();
        assert_eq!(animator.phase(0), None);

        animator.start();
        scheduler.advance(600.0);
        assert_eq!(animator.phase(0), Some(PathPhase::Complete));
        assert_eq!(animator.phase(1), Some(PathPhase::Revealing));
        assert_eq!(animator.phase(2), None);
    }

    #[test]
    fn test_seek_without_start_prepares_paused_run() {
        let scheduler = AnimationScheduler::new();
        let mut animator = PathAnimator::from_geometries(scheduler.handle(), lines(3));
        animator.delay(200).duration(1000).unwrap();

        animator.seek(300);
        let values = progress(&animator);
        assert!((values[0] - 0.3).abs() < 1e-4);
        assert!((values[1] - 0.1).abs() < 1e-4);
        assert_eq!(values[2], 0.0);

        assert!(animator.is_paused());
        assert!(!scheduler.advance(100.0));
    }

    #[test]
    fn test_set_percentage() {
        let scheduler = AnimationScheduler::new();
        let mut animator = PathAnimator::from_geometries(scheduler.handle(), lines(2));
        animator.ordering(Ordering::Parallel).duration(800).unwrap();

        animator.set_percentage(0.25).unwrap();
        assert!((progress(&animator)[1] - 0.25).abs() < 1e-4);

        animator.set_percentage(3.0).unwrap();
        assert_eq!(progress(&animator), vec![1.0, 1.0]);

        assert!(matches!(
            animator.set_percentage(f32::NAN),
            Err(AnimationError::InvalidProgress(_))
        ));
    }

    #[test]
    fn test_drop_unregisters() {
        let scheduler = AnimationScheduler::new();
        {
            let mut animator = PathAnimator::from_geometries(scheduler.handle(), lines(1));
            animator.start();
            assert_eq!(scheduler.timeline_count(), 1);
        }
        assert_eq!(scheduler.timeline_count(), 0);
    }

    #[test]
    fn test_start_without_scheduler() {
        let handle = AnimationScheduler::new().handle();
        let mut animator = PathAnimator::from_geometries(handle, lines(1));
        animator.start();
        assert!(!animator.is_running());
        assert_eq!(animator.with_state(0, |s| s.progress()), Some(0.0));
        assert_eq!(animator.with_state(1, |s| s.progress()), None);
    }
}
