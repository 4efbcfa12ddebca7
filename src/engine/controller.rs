//! Lifecycle Controller - one decoding text on screen.
//!
//! Wires a [`ProgressDriver`] into the shuffle function and a render sink.
//!
//! ```text
//! Idle ──start──▶ Delaying ──delay elapsed──▶ Decoding ──spring settles──▶ Settled
//!   ▲                                                                         │
//!   └────────────────────────────── stop (from any phase) ───────────────────┘
//! ```
//!
//! `start` with the text already running is a no-op; with a different text
//! it is a full restart. Reduced motion and empty text skip straight to
//! `Settled` with a single frame.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use decoder_text::{DecoderConfig, DecoderText, FrameLoop, MemorySink};
//!
//! let frames = FrameLoop::new();
//! let sink = MemorySink::new();
//! let mut decoder = DecoderText::new(Rc::new(frames.clone()), sink.clone(), DecoderConfig::default());
//!
//! decoder.start("Hello");
//! while !frames.is_idle() {
//!     frames.tick(std::time::Duration::from_millis(16));
//! }
//! assert_eq!(sink.display_text(), "Hello");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::driver::{DriverOptions, ProgressDriver, ProgressEvent};
use super::shuffle::Shuffler;
use crate::config::DecoderConfig;
use crate::renderer::RenderSink;
use crate::state::FrameScheduler;
use crate::types::RevealState;

/// Where a decoder is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No run.
    Idle,
    /// Run started, waiting out the start delay.
    Delaying,
    /// Progress is moving.
    Decoding,
    /// Text fully shown.
    Settled,
}

/// State touched from frame callbacks.
struct FrameState<S> {
    text: Vec<char>,
    reveal: RevealState,
    shuffler: Shuffler,
    rng: StdRng,
    sink: S,
    frames: usize,
}

impl<S: RenderSink> FrameState<S> {
    fn emit(&mut self, event: ProgressEvent) {
        self.reveal = self
            .shuffler
            .shuffle(&self.text, &self.reveal, event.progress, &mut self.rng);
        self.sink.render(&self.reveal);
        self.frames += 1;

        if event.settled {
            log::debug!(
                "decoder settled after {} frames: {:?}",
                self.frames,
                self.reveal.to_string()
            );
        } else {
            log::trace!("decoder frame at {:.3}: {}", event.progress, self.reveal);
        }
    }

    fn reset(&mut self) {
        self.text.clear();
        self.reveal = RevealState::empty();
        self.frames = 0;
    }
}

/// A decoding text bound to a scheduler and a sink.
///
/// Callbacks into the sink happen during scheduler ticks; the sink must not
/// call back into its decoder.
pub struct DecoderText<S: RenderSink + 'static> {
    scheduler: Rc<dyn FrameScheduler>,
    config: DecoderConfig,
    reduce_motion: bool,
    text: Option<String>,
    frame: Rc<RefCell<FrameState<S>>>,
    driver: Option<ProgressDriver>,
}

impl<S: RenderSink + 'static> DecoderText<S> {
    pub fn new(scheduler: Rc<dyn FrameScheduler>, sink: S, config: DecoderConfig) -> Self {
        let config = config.normalized();
        let frame = FrameState {
            text: Vec::new(),
            reveal: RevealState::empty(),
            shuffler: config.shuffler(),
            rng: StdRng::from_os_rng(),
            sink,
            frames: 0,
        };
        Self {
            scheduler,
            config,
            reduce_motion: false,
            text: None,
            frame: Rc::new(RefCell::new(frame)),
            driver: None,
        }
    }

    /// Use a fixed seed for glyph selection (reproducible frames).
    pub fn with_seed(self, seed: u64) -> Self {
        self.frame.borrow_mut().rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Builder form of [`DecoderText::set_reduce_motion`].
    pub fn with_reduce_motion(mut self, reduce: bool) -> Self {
        self.reduce_motion = reduce;
        self
    }

    /// Begin decoding `text`.
    ///
    /// No-op if `text` is already running; restarts from zero if a
    /// different text is running.
    pub fn start(&mut self, text: &str) {
        let restart = match self.text.as_deref() {
            Some(current) if current == text => return,
            Some(current) => {
                log::debug!("decoder restarting: {current:?} -> {text:?}");
                true
            }
            None => false,
        };
        if restart {
            self.stop();
        }

        let text_len = {
            let mut frame = self.frame.borrow_mut();
            frame.reset();
            frame.text = text.chars().collect();
            frame.sink.set_label(text);
            frame.sink.clear();
            frame.text.len()
        };
        self.text = Some(text.to_string());

        let options = DriverOptions {
            text_len,
            delay: self.config.delay(),
            reduce_motion: self.reduce_motion,
            timeline: self.config.timeline,
        };
        log::debug!(
            "decoder start: {text:?} ({text_len} chars, delay {:?}, reduce_motion {})",
            options.delay,
            options.reduce_motion
        );

        let frame = Rc::downgrade(&self.frame);
        // Spawn may emit synchronously, so no borrow of `frame` is held here
        let driver = ProgressDriver::spawn(self.scheduler.clone(), options, move |event| {
            if let Some(frame) = frame.upgrade() {
                frame.borrow_mut().emit(event);
            }
        });
        self.driver = Some(driver);
    }

    /// Cancel the run and return to [`Phase::Idle`]. The accessible label
    /// is kept; the animated output is cleared.
    pub fn stop(&mut self) {
        let Some(mut driver) = self.driver.take() else {
            return;
        };
        driver.stop();
        self.text = None;

        let mut frame = self.frame.borrow_mut();
        frame.reset();
        frame.sink.clear();
        log::debug!("decoder stopped");
    }

    /// Freeze progress where it is.
    pub fn pause(&self) {
        if let Some(driver) = &self.driver {
            driver.set_active(false);
        }
    }

    /// Continue after [`DecoderText::pause`].
    pub fn resume(&self) {
        if let Some(driver) = &self.driver {
            driver.set_active(true);
        }
    }

    /// Set the reduced-motion preference.
    ///
    /// Applies to later runs; switching it on also completes an unfinished
    /// run immediately.
    pub fn set_reduce_motion(&mut self, reduce: bool) {
        if self.reduce_motion == reduce {
            return;
        }
        self.reduce_motion = reduce;
        if reduce {
            if let Some(driver) = &mut self.driver {
                if !driver.is_settled() {
                    log::debug!("reduced motion enabled mid-run; finishing");
                    driver.finish();
                }
            }
        }
    }

    pub fn reduce_motion(&self) -> bool {
        self.reduce_motion
    }

    pub fn phase(&self) -> Phase {
        match &self.driver {
            None => Phase::Idle,
            Some(driver) if driver.is_settled() => Phase::Settled,
            Some(driver) if driver.in_delay() => Phase::Delaying,
            Some(_) => Phase::Decoding,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.driver.as_ref().is_some_and(|d| !d.is_active())
    }

    /// Current progress in characters (0 when idle).
    pub fn progress(&self) -> f64 {
        self.driver.as_ref().map_or(0.0, ProgressDriver::progress)
    }

    /// Text of the current run, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Latest frame.
    pub fn reveal(&self) -> RevealState {
        self.frame.borrow().reveal.clone()
    }

    /// Frames emitted in the current run.
    pub fn frame_count(&self) -> usize {
        self.frame.borrow().frames
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn with_sink<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.frame.borrow().sink)
    }

    pub fn with_sink_mut<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.frame.borrow_mut().sink)
    }
}

// =============================================================================
// TESTS
// =============================================================================
