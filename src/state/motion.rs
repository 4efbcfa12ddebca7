//! Reduced-motion preference.
//!
//! Terminals have no `prefers-reduced-motion` media query, so the
//! preference comes from the `REDUCE_MOTION` environment variable and can be
//! overridden by the host at any time. It is a signal: decoders bound to it
//! through [`crate::primitives::decoder_text`] react when it flips.

use std::cell::RefCell;

use spark_signals::{Signal, signal};

/// Environment variable holding the preference.
pub const REDUCE_MOTION_ENV: &str = "REDUCE_MOTION";

thread_local! {
    static PREFERS_REDUCED_MOTION: RefCell<Signal<bool>> =
        RefCell::new(signal(detect_reduced_motion()));
}

/// Read the preference from the environment.
pub fn detect_reduced_motion() -> bool {
    std::env::var(REDUCE_MOTION_ENV)
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

/// Truthy values: `1`, `true`, `yes`, `on` (any case).
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Current preference.
pub fn prefers_reduced_motion() -> bool {
    PREFERS_REDUCED_MOTION.with(|s| s.borrow().get())
}

/// Override the preference (e.g. from a settings toggle).
pub fn set_prefers_reduced_motion(reduce: bool) {
    PREFERS_REDUCED_MOTION.with(|s| s.borrow().set(reduce));
}

/// The preference signal, for reactive tracking.
pub fn prefers_reduced_motion_signal() -> Signal<bool> {
    PREFERS_REDUCED_MOTION.with(|s| s.borrow().clone())
}
