//! Renderer - Where frames go.
//!
//! - [`RenderSink`] - The output seam a decoder draws through
//! - [`MemorySink`] - Records frames, optionally with a bounded history
//! - [`AnsiSink`] - Redraws a terminal line in place with crossterm

mod ansi;
mod sink;

pub use ansi::{AnsiSink, CellStyle};
pub use sink::{Frame, MemorySink, RenderSink};
