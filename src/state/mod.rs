//! State Module - Runtime scheduling and preferences
//!
//! - **Frame loop** - Cooperative per-frame scheduler animations subscribe to
//! - **Motion** - Reduced-motion preference signal

pub mod frame_loop;
pub mod motion;

pub use frame_loop::*;
pub use motion::*;
