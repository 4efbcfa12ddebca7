//! Primitives - Reactive building blocks.
//!
//! - [`decoder_text`] - Decoding text bound to signals
//!
//! # Reactivity
//!
//! Props can be:
//! - Static values: `text: "Hello".into()`
//! - Signals: `text: title_signal.into()` (stays connected!)
//! - Getters: `text: PropValue::getter(move || format!("{}", n.get()))`
//!
//! Pass signals directly; extracting the value first breaks reactivity.
//!
//! ```ignore
//! // CORRECT - restarts when the signal changes
//! decoder_text(scheduler, sink, DecoderTextProps { text: title.into(), ..Default::default() });
//!
//! // WRONG - frozen at the current value
//! decoder_text(scheduler, sink, DecoderTextProps { text: title.get().into(), ..Default::default() });
//! ```

mod decoder_text;
mod types;

pub use decoder_text::decoder_text;
pub use types::*;
