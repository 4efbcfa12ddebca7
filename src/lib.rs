//! # decoder-text
//!
//! Decoding text effect for terminals: text first appears as random glyphs
//! and resolves left to right into the real characters, driven by a damped
//! spring.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! reactive props.
//!
//! ## Architecture
//!
//! ```text
//! FrameLoop → ProgressDriver (spring) → shuffle → RenderSink
//!                         ▲
//!              DecoderText (lifecycle) ◀── decoder_text (signals)
//! ```
//!
//! The shuffle function is pure; the frame loop is owned by the host, so
//! tests drive everything with synthetic frame deltas.
//!
//! ## Modules
//!
//! - [`types`] - Frame types (CharacterState, RevealState) and colors
//! - [`engine`] - Glyphs, shuffle, spring, progress driver, controller
//! - [`state`] - Frame loop and the reduced-motion preference
//! - [`renderer`] - Render sinks (memory, ANSI)
//! - [`primitives`] - Reactive `decoder_text` primitive
//! - [`config`] - TOML configuration

pub mod config;
pub mod engine;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{ConfigError, DecoderConfig, GlyphSource};

pub use engine::{
    DecoderText, GlyphSet, Phase, ProgressDriver, ProgressEvent, Shuffler, Spring, SpringConfig,
    Timeline, shuffle,
};

pub use primitives::{Cleanup, DecoderTextProps, PropValue, decoder_text};

pub use renderer::{AnsiSink, CellStyle, MemorySink, RenderSink};

pub use state::{
    FrameCallback, FrameControl, FrameLoop, FrameScheduler, SubscriptionId, prefers_reduced_motion,
    set_prefers_reduced_motion,
};
