//! Decoder Text Primitive - a reactive decoding text.
//!
//! Binds [`DecoderTextProps`] to a [`DecoderText`] controller:
//!
//! - `text` and `start` drive the lifecycle: `start == true` runs the current
//!   text (a new text restarts), `start == false` stops.
//! - `reduce_motion` (or the process-wide preference) switches reduced
//!   motion on and off; turning it on finishes a running effect.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use spark_signals::signal;
//! use decoder_text::{decoder_text, DecoderTextProps, FrameLoop, AnsiSink, PropValue};
//!
//! let frames = FrameLoop::new();
//! let title = signal("Hello".to_string());
//!
//! let cleanup = decoder_text(
//!     Rc::new(frames.clone()),
//!     AnsiSink::stdout(),
//!     DecoderTextProps {
//!         text: title.clone().into(),
//!         ..Default::default()
//!     },
//! );
//!
//! frames.run(60);
//! title.set("World".to_string()); // restarts
//! frames.run(60);
//! cleanup();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{effect, effect_scope, on_scope_dispose};

use super::types::{Cleanup, DecoderTextProps, PropValue};
use crate::engine::DecoderText;
use crate::renderer::RenderSink;
use crate::state::{FrameScheduler, prefers_reduced_motion_signal};

/// Mount a decoding text on `scheduler`, drawing into `sink`.
///
/// Returns a cleanup function that stops the effect and releases the frame
/// subscription.
pub fn decoder_text<S: RenderSink + 'static>(
    scheduler: Rc<dyn FrameScheduler>,
    sink: S,
    props: DecoderTextProps,
) -> Cleanup {
    let DecoderTextProps {
        text,
        start,
        reduce_motion,
        config,
        seed,
    } = props;

    let mut decoder = DecoderText::new(scheduler, sink, config);
    if let Some(seed) = seed {
        decoder = decoder.with_seed(seed);
    }
    let decoder = Rc::new(RefCell::new(decoder));
    let reduce_motion =
        reduce_motion.unwrap_or_else(|| PropValue::Signal(prefers_reduced_motion_signal()));

    let scope = effect_scope(false);
    let for_motion = decoder.clone();
    let for_lifecycle = decoder.clone();
    let for_dispose = decoder;

    scope.run(move || {
        // Registered first so the first run already honors the preference
        let _motion_effect = effect(move || {
            let reduce = reduce_motion.get();
            for_motion.borrow_mut().set_reduce_motion(reduce);
        });

        let _lifecycle_effect = effect(move || {
            let text = text.get();
            let running = start.get();
            let mut decoder = for_lifecycle.borrow_mut();
            if running {
                decoder.start(&text);
            } else {
                decoder.stop();
                // The accessible text is present even while held
                decoder.with_sink_mut(|sink| sink.set_label(&text));
            }
        });

        on_scope_dispose(move || {
            for_dispose.borrow_mut().stop();
        });
    });

    Box::new(move || {
        scope.stop();
    })
}

// =============================================================================
// TESTS
// =============================================================================
