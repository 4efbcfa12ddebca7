//! Decoder Engine - glyphs, shuffle, motion and lifecycle.
//!
//! - [`glyphs`] - Glyph pool the noise is drawn from
//! - [`shuffle`] - Pure frame derivation from text, progress and last frame
//! - [`spring`] - Damped spring integrator
//! - [`driver`] - Progress timeline and its frame-scheduler binding
//! - [`controller`] - One decoding text: start, stop, restart, reduced motion
//!
//! # Data Flow
//!
//! ```text
//! FrameLoop tick ─▶ ProgressDriver ─▶ progress ─▶ shuffle(text, previous) ─▶ RenderSink
//! ```
//!
//! Only the controller holds state between frames; everything below it is
//! either a value type or a pure function.

pub mod controller;
pub mod driver;
pub mod glyphs;
pub mod shuffle;
pub mod spring;

pub use controller::{DecoderText, Phase};
pub use driver::{DriverOptions, ProgressDriver, ProgressEvent, Progression, Tick, Timeline};
pub use glyphs::{GlyphSet, KATAKANA, LATIN};
pub use shuffle::{DEFAULT_HOLD_THRESHOLD, Shuffler, normalize_progress, shuffle};
pub use spring::{MAX_FRAME_DELTA, Spring, SpringConfig};
