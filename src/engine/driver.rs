//! Progress Driver - moves decode progress from 0 to the text length.
//!
//! Split in two:
//!
//! - [`Progression`] is the pure timeline. Feed it frame deltas with
//!   [`Progression::tick`] and it reports what changed. No clock, no
//!   scheduler, trivially testable.
//! - [`ProgressDriver`] binds a progression to a [`FrameScheduler`] and a
//!   change callback, and owns the subscription.
//!
//! Reported progress is clamped to `[0, len]` and never goes backwards, so
//! a bouncy custom spring cannot un-decode characters.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::spring::{Spring, SpringConfig};
use crate::state::{FrameControl, FrameScheduler, SubscriptionId};

// =============================================================================
// TIMELINE
// =============================================================================

/// How progress evolves over time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Timeline {
    /// Damped spring toward the text length.
    Spring(SpringConfig),
    /// Constant speed: one character every `char_ms`, emitting at most
    /// `fps` times per second (0 = every frame).
    Linear {
        #[serde(default = "default_char_ms")]
        char_ms: f64,
        #[serde(default = "default_linear_fps")]
        fps: u32,
    },
}

fn default_char_ms() -> f64 {
    100.0
}

fn default_linear_fps() -> u32 {
    24
}

impl Timeline {
    pub const LINEAR_DEFAULT: Self = Timeline::Linear {
        char_ms: 100.0,
        fps: 24,
    };

    /// Replace unusable values with defaults.
    pub fn normalized(self) -> Self {
        match self {
            Timeline::Spring(config) => Timeline::Spring(config.normalized()),
            Timeline::Linear { char_ms, fps } => {
                if char_ms.is_finite() && char_ms > 0.0 {
                    Timeline::Linear { char_ms, fps }
                } else {
                    log::warn!("linear char_ms {char_ms} is not a positive number; using 100");
                    Timeline::Linear {
                        char_ms: 100.0,
                        fps,
                    }
                }
            }
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Timeline::Spring(SpringConfig::DECODER)
    }
}

// =============================================================================
// PROGRESSION
// =============================================================================

/// Result of one [`Progression::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// Nothing to report (delaying, paused, throttled or already settled).
    Idle,
    /// Progress moved; still going.
    Progress(f64),
    /// Final emission at the text length.
    Settled(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Spring(Spring),
    Linear {
        char_ms: f64,
        fps: u32,
        elapsed: Duration,
        since_emit: Duration,
    },
}

/// Pure progress timeline for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    target: f64,
    delay_remaining: Duration,
    motion: Motion,
    progress: f64,
    active: bool,
    settled: bool,
    stopped: bool,
}

impl Progression {
    pub fn new(text_len: usize, delay: Duration, timeline: Timeline) -> Self {
        let target = text_len as f64;
        let motion = match timeline.normalized() {
            Timeline::Spring(config) => Motion::Spring(Spring::new(config, 0.0, target)),
            Timeline::Linear { char_ms, fps } => Motion::Linear {
                char_ms,
                fps,
                elapsed: Duration::ZERO,
                since_emit: Duration::ZERO,
            },
        };
        Self {
            target,
            delay_remaining: delay,
            motion,
            progress: 0.0,
            active: true,
            settled: false,
            stopped: false,
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// True while the start delay has not yet elapsed.
    pub fn in_delay(&self) -> bool {
        !self.delay_remaining.is_zero()
    }

    /// Pause (`false`) or resume (`true`). Nothing accumulates while paused.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// No further emissions after this.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Jump to the end. Returns the final emission, or `Idle` if already
    /// settled or stopped.
    pub fn finish(&mut self) -> Tick {
        if self.settled || self.stopped {
            return Tick::Idle;
        }
        self.delay_remaining = Duration::ZERO;
        if let Motion::Spring(spring) = &mut self.motion {
            spring.snap();
        }
        self.progress = self.target;
        self.settled = true;
        Tick::Settled(self.target)
    }

    /// Advance by one frame of `dt`.
    pub fn tick(&mut self, dt: Duration) -> Tick {
        if self.settled || self.stopped || !self.active {
            return Tick::Idle;
        }

        // Start delay eats into the frame; the remainder drives motion
        let dt = if self.delay_remaining.is_zero() {
            dt
        } else if dt <= self.delay_remaining {
            self.delay_remaining -= dt;
            return Tick::Idle;
        } else {
            let rest = dt - self.delay_remaining;
            self.delay_remaining = Duration::ZERO;
            rest
        };

        let (raw, done, emit) = match &mut self.motion {
            Motion::Spring(spring) => {
                let done = spring.step(dt);
                (spring.position(), done, true)
            }
            Motion::Linear {
                char_ms,
                fps,
                elapsed,
                since_emit,
            } => {
                *elapsed += dt;
                *since_emit += dt;
                let raw = elapsed.as_secs_f64() * 1000.0 / *char_ms;
                let done = raw >= self.target;
                let due = *fps == 0 || *since_emit >= Duration::from_secs(1) / *fps;
                if due {
                    *since_emit = Duration::ZERO;
                }
                (raw, done, due || done)
            }
        };

        if done {
            self.progress = self.target;
            self.settled = true;
            return Tick::Settled(self.target);
        }

        let next = raw.clamp(0.0, self.target).max(self.progress);
        if !emit || next == self.progress {
            return Tick::Idle;
        }
        self.progress = next;
        Tick::Progress(next)
    }
}

// =============================================================================
// PROGRESS DRIVER
// =============================================================================

/// A progress change delivered to the driver's callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    pub progress: f64,
    pub settled: bool,
}

/// Options for one driver run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverOptions {
    pub text_len: usize,
    pub delay: Duration,
    pub reduce_motion: bool,
    pub timeline: Timeline,
}

/// A [`Progression`] running on a frame scheduler.
///
/// Dropping the driver stops it.
pub struct ProgressDriver {
    scheduler: Rc<dyn FrameScheduler>,
    subscription: Option<SubscriptionId>,
    state: Rc<RefCell<Progression>>,
    on_change: Rc<RefCell<dyn FnMut(ProgressEvent)>>,
}

impl ProgressDriver {
    /// Start a run.
    ///
    /// With reduced motion, or an empty text, `on_change` fires exactly once
    /// before this returns and nothing is scheduled.
    pub fn spawn<F>(scheduler: Rc<dyn FrameScheduler>, options: DriverOptions, on_change: F) -> Self
    where
        F: FnMut(ProgressEvent) + 'static,
    {
        let state = Rc::new(RefCell::new(Progression::new(
            options.text_len,
            options.delay,
            options.timeline,
        )));
        let on_change: Rc<RefCell<dyn FnMut(ProgressEvent)>> = Rc::new(RefCell::new(on_change));

        let mut driver = Self {
            scheduler,
            subscription: None,
            state,
            on_change,
        };

        if options.reduce_motion || options.text_len == 0 {
            driver.finish();
            return driver;
        }

        let state = driver.state.clone();
        let on_change = driver.on_change.clone();
        let id = driver.scheduler.subscribe(Box::new(move |dt| {
            let tick = state.borrow_mut().tick(dt);
            match tick {
                Tick::Idle => FrameControl::Continue,
                Tick::Progress(progress) => {
                    (&mut *on_change.borrow_mut())(ProgressEvent {
                        progress,
                        settled: false,
                    });
                    FrameControl::Continue
                }
                Tick::Settled(progress) => {
                    (&mut *on_change.borrow_mut())(ProgressEvent {
                        progress,
                        settled: true,
                    });
                    FrameControl::Done
                }
            }
        }));
        driver.subscription = Some(id);
        driver
    }

    /// Halt further callbacks and release the frame subscription.
    /// Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.state.borrow_mut().stop();
        if let Some(id) = self.subscription.take() {
            self.scheduler.unsubscribe(id);
        }
    }

    /// Complete the run now with a single final emission.
    pub fn finish(&mut self) {
        let tick = self.state.borrow_mut().finish();
        if let Some(id) = self.subscription.take() {
            self.scheduler.unsubscribe(id);
        }
        if let Tick::Settled(progress) = tick {
            (&mut *self.on_change.borrow_mut())(ProgressEvent {
                progress,
                settled: true,
            });
        }
    }

    pub fn set_active(&self, active: bool) {
        self.state.borrow_mut().set_active(active);
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().is_active()
    }

    pub fn progress(&self) -> f64 {
        self.state.borrow().progress()
    }

    pub fn is_settled(&self) -> bool {
        self.state.borrow().is_settled()
    }

    pub fn in_delay(&self) -> bool {
        self.state.borrow().in_delay()
    }

    pub fn is_stopped(&self) -> bool {
        self.state.borrow().is_stopped()
    }
}

impl Drop for ProgressDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FrameLoop;

    const FRAME: Duration = Duration::from_micros(16_667);

    fn spring(len: usize, delay_ms: u64) -> Progression {
        Progression::new(len, Duration::from_millis(delay_ms), Timeline::default())
    }

    fn recorder() -> (Rc<RefCell<Vec<ProgressEvent>>>, impl FnMut(ProgressEvent) + 'static) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        (events, move |e| sink.borrow_mut().push(e))
    }

    fn options(len: usize) -> DriverOptions {
        DriverOptions {
            text_len: len,
            delay: Duration::ZERO,
            reduce_motion: false,
            timeline: Timeline::default(),
        }
    }

    #[test]
    fn test_progress_is_monotonic_and_bounded() {
        let mut p = spring(5, 0);
        let mut last = 0.0;
        for _ in 0..1000 {
            match p.tick(FRAME) {
                Tick::Progress(v) => {
                    assert!(v >= last && v <= 5.0);
                    last = v;
                }
                Tick::Settled(v) => {
                    assert_eq!(v, 5.0);
                    return;
                }
                Tick::Idle => {}
            }
        }
        panic!("never settled");
    }

    #[test]
    fn test_bouncy_spring_never_goes_backwards() {
        let mut p = Progression::new(3, Duration::ZERO, Timeline::Spring(SpringConfig::GENTLE));
        let mut last = 0.0;
        for _ in 0..1000 {
            match p.tick(FRAME) {
                Tick::Progress(v) => {
                    assert!(v >= last);
                    assert!(v <= 3.0);
                    last = v;
                }
                Tick::Settled(_) => return,
                Tick::Idle => {}
            }
        }
        panic!("never settled");
    }

    #[test]
    fn test_delay_holds_progress_at_zero() {
        let mut p = spring(4, 100);
        for _ in 0..5 {
            assert_eq!(p.tick(FRAME), Tick::Idle);
            assert_eq!(p.progress(), 0.0);
        }
        assert!(p.in_delay());
        // 6 frames = 100.002ms, the leftover starts the spring
        assert!(matches!(p.tick(FRAME), Tick::Progress(_)));
        assert!(!p.in_delay());
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let mut p = spring(4, 0);
        for _ in 0..10 {
            p.tick(FRAME);
        }
        let paused_at = p.progress();
        assert!(paused_at > 0.0);

        p.set_active(false);
        for _ in 0..50 {
            assert_eq!(p.tick(FRAME), Tick::Idle);
        }
        assert_eq!(p.progress(), paused_at);

        p.set_active(true);
        match p.tick(FRAME) {
            Tick::Progress(v) => assert!(v > paused_at),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_pause_during_delay_keeps_delay() {
        let mut p = spring(4, 50);
        p.set_active(false);
        for _ in 0..10 {
            p.tick(FRAME);
        }
        assert!(p.in_delay());
    }

    #[test]
    fn test_settled_is_idempotent() {
        let mut p = spring(2, 0);
        while !matches!(p.tick(FRAME), Tick::Settled(_)) {}
        for _ in 0..20 {
            assert_eq!(p.tick(FRAME), Tick::Idle);
            assert_eq!(p.progress(), 2.0);
        }
    }

    #[test]
    fn test_finish_emits_once() {
        let mut p = spring(3, 500);
        assert_eq!(p.finish(), Tick::Settled(3.0));
        assert_eq!(p.finish(), Tick::Idle);
        assert_eq!(p.tick(FRAME), Tick::Idle);
    }

    #[test]
    fn test_linear_timeline_throttles_to_fps() {
        let mut p = Progression::new(
            10,
            Duration::ZERO,
            Timeline::Linear {
                char_ms: 100.0,
                fps: 10,
            },
        );
        let mut emitted = 0;
        // 500ms of 10ms frames at 10 fps: 5 emissions
        for _ in 0..50 {
            if let Tick::Progress(_) = p.tick(Duration::from_millis(10)) {
                emitted += 1;
            }
        }
        assert_eq!(emitted, 5);
        assert!((p.progress() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_timeline_settles_at_length() {
        let mut p = Progression::new(
            2,
            Duration::ZERO,
            Timeline::Linear {
                char_ms: 50.0,
                fps: 0,
            },
        );
        assert_eq!(p.tick(Duration::from_millis(50)), Tick::Progress(1.0));
        assert_eq!(p.tick(Duration::from_millis(50)), Tick::Settled(2.0));
    }

    #[test]
    fn test_invalid_linear_speed_is_normalized() {
        let t = Timeline::Linear {
            char_ms: -5.0,
            fps: 24,
        }
        .normalized();
        assert_eq!(t, Timeline::LINEAR_DEFAULT);
    }

    #[test]
    fn test_driver_reduced_motion_fires_once_without_scheduling() {
        let frames = FrameLoop::new();
        let (events, cb) = recorder();
        let driver = ProgressDriver::spawn(
            Rc::new(frames.clone()),
            DriverOptions {
                reduce_motion: true,
                delay: Duration::from_millis(300),
                ..options(4)
            },
            cb,
        );

        assert!(frames.is_idle());
        assert!(driver.is_settled());
        for _ in 0..10 {
            frames.tick(FRAME);
        }
        assert_eq!(
            *events.borrow(),
            vec![ProgressEvent {
                progress: 4.0,
                settled: true
            }]
        );
    }

    #[test]
    fn test_driver_empty_text_settles_immediately() {
        let frames = FrameLoop::new();
        let (events, cb) = recorder();
        let driver = ProgressDriver::spawn(Rc::new(frames.clone()), options(0), cb);
        assert!(driver.is_settled());
        assert!(frames.is_idle());
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_driver_runs_to_settle_and_unsubscribes() {
        let frames = FrameLoop::new();
        let (events, cb) = recorder();
        let driver = ProgressDriver::spawn(Rc::new(frames.clone()), options(2), cb);
        assert_eq!(frames.active_count(), 1);

        let mut ticks = 0;
        while !frames.is_idle() && ticks < 1000 {
            frames.tick(FRAME);
            ticks += 1;
        }
        assert!(ticks < 200);
        assert!(driver.is_settled());

        let events = events.borrow();
        let last = events.last().copied().unwrap();
        assert!(last.settled);
        assert_eq!(last.progress, 2.0);
        assert_eq!(events.iter().filter(|e| e.settled).count(), 1);
    }

    #[test]
    fn test_driver_stop_is_immediate_and_idempotent() {
        let frames = FrameLoop::new();
        let (events, cb) = recorder();
        let mut driver = ProgressDriver::spawn(Rc::new(frames.clone()), options(6), cb);

        frames.tick(FRAME);
        let seen = events.borrow().len();
        driver.stop();
        driver.stop();
        assert!(frames.is_idle());
        for _ in 0..10 {
            frames.tick(FRAME);
        }
        assert_eq!(events.borrow().len(), seen);
        assert!(driver.is_stopped());
    }

    #[test]
    fn test_driver_drop_unsubscribes() {
        let frames = FrameLoop::new();
        let (_, cb) = recorder();
        let driver = ProgressDriver::spawn(Rc::new(frames.clone()), options(6), cb);
        assert_eq!(frames.active_count(), 1);
        drop(driver);
        assert!(frames.is_idle());
    }

    #[test]
    fn test_driver_pause_gate() {
        let frames = FrameLoop::new();
        let (events, cb) = recorder();
        let driver = ProgressDriver::spawn(Rc::new(frames.clone()), options(6), cb);

        driver.set_active(false);
        for _ in 0..10 {
            frames.tick(FRAME);
        }
        assert!(events.borrow().is_empty());
        assert_eq!(driver.progress(), 0.0);

        driver.set_active(true);
        frames.tick(FRAME);
        assert_eq!(events.borrow().len(), 1);
    }
}
