//! Primitive types - Props and cleanup.
//!
//! Props support static values, signals, and getters for reactivity.

use std::rc::Rc;

use spark_signals::Signal;

use crate::config::DecoderConfig;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by primitives.
///
/// Call this to unmount the primitive and release its frame subscription.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Prop Value - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    Signal(Signal<T>),
    /// Getter function (called each time value is needed). Signals read
    /// inside it are tracked.
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value (for immediate reads).
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }

    pub fn getter(f: impl Fn() -> T + 'static) -> Self {
        PropValue::Getter(Rc::new(f))
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for PropValue<T> {
    fn default() -> Self {
        PropValue::Static(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

impl From<&str> for PropValue<String> {
    fn from(value: &str) -> Self {
        PropValue::Static(value.to_string())
    }
}

// =============================================================================
// Decoder Text Props
// =============================================================================

/// Properties for [`super::decoder_text`].
pub struct DecoderTextProps {
    /// Target text. Changing it restarts the effect.
    pub text: PropValue<String>,

    /// Whether the effect should run. Switching to `false` stops it.
    pub start: PropValue<bool>,

    /// Reduced-motion override. `None` follows the process-wide preference
    /// ([`crate::state::prefers_reduced_motion_signal`]).
    pub reduce_motion: Option<PropValue<bool>>,

    /// Delay, timeline and glyph settings.
    pub config: DecoderConfig,

    /// Fixed RNG seed for reproducible frames.
    pub seed: Option<u64>,
}

impl Default for DecoderTextProps {
    fn default() -> Self {
        Self {
            text: PropValue::default(),
            start: PropValue::Static(true),
            reduce_motion: None,
            config: DecoderConfig::default(),
            seed: None,
        }
    }
}
