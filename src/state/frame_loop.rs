//! Frame Loop - cooperative per-frame scheduling.
//!
//! Animations never talk to a clock directly. They subscribe a callback to a
//! [`FrameScheduler`] and are handed the elapsed time on every frame. The
//! host owns the loop: a terminal app calls [`FrameLoop::run`], tests call
//! [`FrameLoop::tick`] with whatever deltas they like.
//!
//! # Pattern
//!
//! - Everything runs on one thread, no locking
//! - Callbacks may subscribe or unsubscribe (themselves included) mid-tick
//! - An id unsubscribed during a tick is never invoked again, even if it
//!   was due later in the same tick
//!
//! # Example
//!
//! ```ignore
//! use decoder_text::state::{FrameLoop, FrameControl, FrameScheduler};
//! use std::time::Duration;
//!
//! let frames = FrameLoop::new();
//! let id = frames.subscribe(Box::new(|dt| {
//!     println!("frame after {dt:?}");
//!     FrameControl::Continue
//! }));
//!
//! frames.tick(Duration::from_millis(16));
//! frames.unsubscribe(id);
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

// =============================================================================
// SCHEDULER TRAIT
// =============================================================================

/// Identifies one subscription on a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// For schedulers implemented outside this crate.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// What a frame callback wants after running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    /// Call again next frame.
    Continue,
    /// Drop the subscription.
    Done,
}

/// Per-frame callback. Receives the time since the previous frame.
pub type FrameCallback = Box<dyn FnMut(Duration) -> FrameControl>;

/// Source of animation frames.
pub trait FrameScheduler {
    /// Register a callback to run on every frame until it returns
    /// [`FrameControl::Done`] or is unsubscribed.
    fn subscribe(&self, callback: FrameCallback) -> SubscriptionId;

    /// Remove a subscription. Returns false if it was already gone.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

// =============================================================================
// FRAME LOOP
// =============================================================================

struct Slot {
    id: SubscriptionId,
    /// None while the callback is running.
    callback: Option<FrameCallback>,
}

#[derive(Default)]
struct LoopInner {
    slots: Vec<Slot>,
    next_id: u64,
    frame: u64,
}

/// Single-threaded frame scheduler. Cloning yields another handle to the
/// same loop.
#[derive(Clone, Default)]
pub struct FrameLoop {
    inner: Rc<RefCell<LoopInner>>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one frame: every live callback is invoked once with `dt`.
    ///
    /// Callbacks subscribed during this tick first run on the next one.
    /// Returns the number of callbacks invoked.
    pub fn tick(&self, dt: Duration) -> usize {
        let ids: Vec<SubscriptionId> = {
            let mut inner = self.inner.borrow_mut();
            inner.frame += 1;
            inner.slots.iter().map(|s| s.id).collect()
        };

        let mut ran = 0;
        for id in ids {
            // Take the callback out so it can touch the loop while running
            let callback = {
                let mut inner = self.inner.borrow_mut();
                inner
                    .slots
                    .iter_mut()
                    .find(|s| s.id == id)
                    .and_then(|s| s.callback.take())
            };
            let Some(mut callback) = callback else {
                continue;
            };

            let control = callback(dt);
            ran += 1;

            // Dropped after the borrow ends; a callback's captures may
            // reach back into the loop when they drop
            let _finished = {
                let mut inner = self.inner.borrow_mut();
                let position = inner.slots.iter().position(|s| s.id == id);
                match (control, position) {
                    (FrameControl::Continue, Some(i)) => {
                        inner.slots[i].callback = Some(callback);
                        None
                    }
                    (FrameControl::Done, Some(i)) => {
                        inner.slots.remove(i);
                        Some(callback)
                    }
                    (_, None) => Some(callback),
                }
            };
        }
        ran
    }

    /// Drive the loop in real time at `fps` until no subscriptions remain.
    ///
    /// Blocks the calling thread between frames. Returns the number of
    /// frames run. `fps` of 0 is treated as 60.
    ///
    /// A paused decoder keeps its subscription, so while one exists this
    /// never returns. Use [`FrameLoop::run_until`] to leave on your own
    /// condition.
    pub fn run(&self, fps: u32) -> u64 {
        self.run_until(fps, || false)
    }

    /// Like [`FrameLoop::run`], but also returns as soon as `done` reports
    /// true. `done` is checked before every frame.
    pub fn run_until(&self, fps: u32, mut done: impl FnMut() -> bool) -> u64 {
        let fps = if fps == 0 { 60 } else { fps };
        let frame_time = Duration::from_secs(1) / fps;
        let mut frames = 0;
        let mut last = Instant::now();

        while !self.is_idle() && !done() {
            let frame_start = Instant::now();
            self.tick(frame_start.duration_since(last));
            last = frame_start;
            frames += 1;

            let spent = frame_start.elapsed();
            if spent < frame_time {
                thread::sleep(frame_time - spent);
            }
        }

        log::debug!(
            "frame loop left after {frames} frames ({} live)",
            self.active_count()
        );
        frames
    }

    /// Number of live subscriptions.
    pub fn active_count(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    pub fn is_idle(&self) -> bool {
        self.inner.borrow().slots.is_empty()
    }

    /// Frames ticked so far.
    pub fn frame_count(&self) -> u64 {
        self.inner.borrow().frame
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.inner.borrow().slots.iter().any(|s| s.id == id)
    }
}

impl FrameScheduler for FrameLoop {
    fn subscribe(&self, callback: FrameCallback) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.slots.push(Slot {
            id,
            callback: Some(callback),
        });
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let position = inner.slots.iter().position(|s| s.id == id);
            position.map(|i| inner.slots.remove(i))
        };
        removed.is_some()
    }
}

// =============================================================================
// TESTS
// =============================================================================
