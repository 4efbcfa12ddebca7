//! Render sinks - where decoded frames end up.
//!
//! A sink shows two things: the animated frame, and a plain label holding
//! the full target text for anything that should not see the animation
//! (screen readers, logs, copy/paste). Rendering a frame never touches the
//! label.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::types::RevealState;

/// Output surface for a decoder.
pub trait RenderSink {
    /// Replace the accessible label. Called once per run, before any frame.
    fn set_label(&mut self, text: &str);

    /// Show a frame. The frame has exactly one cell per character of the
    /// current label; anything else is a caller bug.
    fn render(&mut self, state: &RevealState);

    /// Remove the animated output (the label stays).
    fn clear(&mut self) {}
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn set_label(&mut self, text: &str) {
        (**self).set_label(text);
    }

    fn render(&mut self, state: &RevealState) {
        (**self).render(state);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

// =============================================================================
// Memory Sink
// =============================================================================

/// One recorded emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Accessible label at the time of the emission.
    pub label: String,
    pub state: RevealState,
}

#[derive(Debug, Default)]
struct MemoryLog {
    label: String,
    label_len: usize,
    display: RevealState,
    frames: VecDeque<Frame>,
    /// Frames kept; `None` keeps all.
    history: Option<usize>,
    rendered: usize,
    clears: usize,
}

/// In-memory sink that records frames.
///
/// [`MemorySink::new`] keeps every frame, which suits tests. Long-lived
/// hosts should use [`MemorySink::with_history`] so memory stays bounded.
///
/// Clones share the same log, so keep one clone and hand the other to a
/// decoder.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    log: Rc<RefCell<MemoryLog>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the latest `limit` frames.
    pub fn with_history(limit: usize) -> Self {
        let sink = Self::default();
        sink.log.borrow_mut().history = Some(limit);
        sink
    }

    /// Current accessible label.
    pub fn label(&self) -> String {
        self.log.borrow().label.clone()
    }

    /// What is on screen right now.
    pub fn display(&self) -> RevealState {
        self.log.borrow().display.clone()
    }

    /// Current display as a string.
    pub fn display_text(&self) -> String {
        self.log.borrow().display.to_string()
    }

    /// Retained frames, oldest first.
    pub fn frames(&self) -> Vec<Frame> {
        self.log.borrow().frames.iter().cloned().collect()
    }

    /// Frames rendered since creation or the last [`MemorySink::reset_frames`],
    /// including any dropped from a bounded history.
    pub fn frame_count(&self) -> usize {
        self.log.borrow().rendered
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.log.borrow().frames.back().cloned()
    }

    /// How many times the display was cleared.
    pub fn clear_count(&self) -> usize {
        self.log.borrow().clears
    }

    /// Forget recorded frames (label and display are kept).
    pub fn reset_frames(&self) {
        let mut log = self.log.borrow_mut();
        log.frames.clear();
        log.rendered = 0;
    }
}

impl RenderSink for MemorySink {
    fn set_label(&mut self, text: &str) {
        let mut log = self.log.borrow_mut();
        log.label = text.to_string();
        log.label_len = text.chars().count();
    }

    fn render(&mut self, state: &RevealState) {
        let mut log = self.log.borrow_mut();
        debug_assert_eq!(
            state.len(),
            log.label_len,
            "frame length does not match label {:?}",
            log.label
        );
        log.display = state.clone();
        let frame = Frame {
            label: log.label.clone(),
            state: state.clone(),
        };
        log.rendered += 1;
        if log.history == Some(0) {
            return;
        }
        if log.history.is_some_and(|limit| log.frames.len() >= limit) {
            log.frames.pop_front();
        }
        log.frames.push_back(frame);
    }

    fn clear(&mut self) {
        let mut log = self.log.borrow_mut();
        log.display = RevealState::empty();
        log.clears += 1;
    }
}

// =============================================================================
// TESTS
// =============================================================================
