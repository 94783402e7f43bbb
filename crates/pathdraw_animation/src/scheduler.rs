//! Animation scheduler
//!
//! Owns every registered reveal timeline and advances them from the host's
//! frame callback. Everything runs on the host's thread: the scheduler is
//! shared through `Rc<RefCell<_>>` and components hold a weak
//! `SchedulerHandle` to it.
//!
//! While a timeline is being ticked it is taken out of its slot, so reveal and
//! run listeners may call back into the scheduler (start a new run, stop the
//! current one) without tripping over a borrow. A timeline removed while it
//! was out is dropped when the tick finishes with it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

use slotmap::{new_key_type, SlotMap};

use crate::timeline::RevealTimeline;

new_key_type! {
    /// Handle to a registered timeline
    pub struct TimelineId;
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    /// `None` while the timeline is being ticked or mutated
    timelines: SlotMap<TimelineId, Option<RevealTimeline>>,
    last_frame: Instant,
}

/// Take a timeline out of its slot, run `f` on it, and put it back
///
/// Returns `None` if the id is unknown or the timeline is already out.
fn with_detached<F, R>(inner: &RefCell<SchedulerInner>, id: TimelineId, f: F) -> Option<R>
where
    F: FnOnce(&mut RevealTimeline) -> R,
{
    let mut timeline = inner.borrow_mut().timelines.get_mut(id)?.take()?;
    let result = f(&mut timeline);

    // A timeline removed while detached is dropped outside the borrow
    let removed = match inner.borrow_mut().timelines.get_mut(id) {
        Some(slot) => {
            *slot = Some(timeline);
            None
        }
        None => Some(timeline),
    };
    drop(removed);
    Some(result)
}

/// The animation scheduler that ticks all registered timelines
///
/// Typically owned by the host's frame loop and shared via `SchedulerHandle`.
///
/// ```ignore
/// let scheduler = AnimationScheduler::new();
/// let mut animator = PathAnimator::new(scheduler.handle(), paths);
/// animator.start();
///
/// // every frame
/// if scheduler.tick() {
///     request_redraw();
/// }
/// ```
pub struct AnimationScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                timelines: SlotMap::with_key(),
                last_frame: Instant::now(),
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Tick all timelines by the wall-clock time since the last frame
    ///
    /// Returns true if any timeline still needs ticks.
    pub fn tick(&self) -> bool {
        let dt_ms = {
            let mut inner = self.inner.borrow_mut();
            let now = Instant::now();
            let dt = (now - inner.last_frame).as_secs_f32() * 1000.0;
            inner.last_frame = now;
            dt
        };
        self.advance(dt_ms)
    }

    /// Tick all timelines by exactly `dt_ms`
    ///
    /// Timelines registered during this call are not ticked until the next one.
    pub fn advance(&self, dt_ms: f32) -> bool {
        let ids: Vec<TimelineId> = self.inner.borrow().timelines.keys().collect();
        for id in ids {
            with_detached(&self.inner, id, |timeline| timeline.tick(dt_ms));
        }

        // Timelines are only removed when their controllers drop or restart,
        // so a finished run can still be scrubbed.
        self.has_active_animations()
    }

    /// Check if any timeline is still playing
    pub fn has_active_animations(&self) -> bool {
        self.inner
            .borrow()
            .timelines
            .values()
            .any(|t| t.as_ref().is_some_and(RevealTimeline::is_playing))
    }

    /// Get the number of registered timelines
    pub fn timeline_count(&self) -> usize {
        self.inner.borrow().timelines.len()
    }

    pub fn add_timeline(&self, timeline: RevealTimeline) -> TimelineId {
        self.inner.borrow_mut().timelines.insert(Some(timeline))
    }

    pub fn remove_timeline(&self, id: TimelineId) -> Option<RevealTimeline> {
        self.inner.borrow_mut().timelines.remove(id).flatten()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the animation scheduler
///
/// This is passed to components that need to register timelines.
/// It won't prevent the scheduler from being dropped.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register a timeline and return its ID
    pub fn register_timeline(&self, timeline: RevealTimeline) -> Option<TimelineId> {
        self.inner.upgrade().map(|inner| {
            let mut guard = inner.borrow_mut();
            // Reset last_frame so the first wall-clock tick doesn't jump ahead
            guard.last_frame = Instant::now();
            guard.timelines.insert(Some(timeline))
        })
    }

    /// Restart frame timing from now
    ///
    /// The next `tick` only counts time passed after this call.
    pub fn reset_clock(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().last_frame = Instant::now();
        }
    }

    /// Remove a timeline
    ///
    /// A timeline that is mid-tick is unregistered now and dropped once its
    /// tick returns.
    pub fn remove_timeline(&self, id: TimelineId) {
        if let Some(inner) = self.inner.upgrade() {
            let removed = inner.borrow_mut().timelines.remove(id);
            drop(removed);
        }
    }

    /// Check if a timeline is playing
    pub fn is_timeline_playing(&self, id: TimelineId) -> bool {
        self.with_timeline(id, RevealTimeline::is_playing)
            .unwrap_or(false)
    }

    /// Read a timeline
    ///
    /// Returns `None` if the timeline is unknown or currently being ticked.
    pub fn with_timeline<F, R>(&self, id: TimelineId, f: F) -> Option<R>
    where
        F: FnOnce(&RevealTimeline) -> R,
    {
        let inner = self.inner.upgrade()?;
        let guard = inner.borrow();
        guard.timelines.get(id)?.as_ref().map(f)
    }

    /// Mutate a timeline outside the scheduler's borrow
    ///
    /// Listeners triggered by `f` may use this handle freely. Returns `None`
    /// if the timeline is unknown or currently being ticked.
    pub fn with_timeline_mut<F, R>(&self, id: TimelineId, f: F) -> Option<R>
    where
        F: FnOnce(&mut RevealTimeline) -> R,
    {
        let inner = self.inner.upgrade()?;
        with_detached(&inner, id, f)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::{RevealState, SharedRevealState};
    use crate::timeline::Ordering;
    use pathdraw_core::{Path, PathGeometry, Point};
    use std::cell::Cell;
    use std::sync::Arc;

    fn state(length: f32) -> SharedRevealState {
        let geometry = PathGeometry::new(Path::line(Point::new(0.0, 0.0), Point::new(length, 0.0)));
        Rc::new(RefCell::new(RevealState::new(Arc::new(geometry))))
    }

    fn started(states: Vec<SharedRevealState>, duration_ms: u32) -> RevealTimeline {
        let mut timeline = RevealTimeline::new(states, Ordering::Parallel, 0, duration_ms);
        timeline.start();
        timeline
    }

    #[test]
    fn test_scheduler_advance() {
        let scheduler = AnimationScheduler::new();
        let s = state(100.0);
        scheduler.add_timeline(started(vec![s.clone()], 1000));

        assert!(scheduler.advance(250.0));
        assert!((s.borrow().progress() - 0.25).abs() < 1e-5);

        assert!(!scheduler.advance(1000.0));
        assert_eq!(s.borrow().progress(), 1.0);

        // Finished timelines stay registered
        assert_eq!(scheduler.timeline_count(), 1);
        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn test_scheduler_tick_wall_clock() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        handle.register_timeline(started(vec![state(10.0)], 60_000));
        assert!(scheduler.tick());
    }

    #[test]
    fn test_reset_clock_skips_idle_time() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let s = state(10.0);
        handle.register_timeline(started(vec![s.clone()], 1000));

        std::thread::sleep(std::time::Duration::from_millis(300));
        handle.reset_clock();
        assert!(scheduler.tick());
        assert!(s.borrow().progress() < 0.2);
    }

    #[test]
    fn test_listener_can_remove_its_own_timeline() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let s = state(10.0);
        let id = scheduler.add_timeline(started(vec![s.clone()], 100));

        let id_cell = Rc::new(Cell::new(Some(id)));
        let h = handle.clone();
        let ids = id_cell.clone();
        s.borrow_mut().set_listener(Some(Rc::new(move || {
            if let Some(id) = ids.take() {
                h.remove_timeline(id);
            }
        })));

        scheduler.advance(10.0);
        assert_eq!(scheduler.timeline_count(), 0);
        assert!(!scheduler.advance(10.0));
    }

    #[test]
    fn test_listener_can_register_during_tick() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let s = state(10.0);
        scheduler.add_timeline(started(vec![s.clone()], 100));

        let h = handle.clone();
        let registered = Rc::new(Cell::new(false));
        let r = registered.clone();
        s.borrow_mut().set_listener(Some(Rc::new(move || {
            if !r.get() {
                r.set(true);
                h.register_timeline(started(vec![state(5.0)], 100));
            }
        })));

        scheduler.advance(10.0);
        assert_eq!(scheduler.timeline_count(), 2);
    }

    #[test]
    fn test_with_timeline_mut_allows_reentrant_listeners() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let s = state(10.0);
        let id = scheduler.add_timeline(started(vec![s.clone()], 100));

        let h = handle.clone();
        let playing_seen = Rc::new(Cell::new(None));
        let seen = playing_seen.clone();
        s.borrow_mut().set_listener(Some(Rc::new(move || {
            seen.set(Some(h.is_timeline_playing(id)));
        })));

        assert_eq!(handle.with_timeline_mut(id, |t| t.seek(50.0)), Some(()));
        // The timeline is detached while the listener runs
        assert_eq!(playing_seen.get(), Some(false));
        assert!(handle.is_timeline_playing(id));
        assert_eq!(handle.with_timeline(id, |t| t.elapsed_ms()), Some(50.0));
    }

    #[test]
    fn test_handle_weak_reference() {
        let handle = {
            let scheduler = AnimationScheduler::new();
            scheduler.handle()
        };

        assert!(!handle.is_alive());
        assert!(handle
            .register_timeline(started(vec![state(1.0)], 100))
            .is_none());
        assert!(handle.with_timeline_mut(TimelineId::default(), |_| ()).is_none());
    }
}
