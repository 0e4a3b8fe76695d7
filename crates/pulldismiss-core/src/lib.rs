//! Core runtime services for pulldismiss.
//!
//! Everything here runs on one UI-affinity queue: the [`Runtime`] owns frame
//! callbacks and delayed tasks, and the host drives it by calling
//! [`RuntimeHandle::drain_frame_callbacks`] with the current frame time.

mod collections;
mod frame_clock;
mod observable;
mod platform;
mod runtime;

pub use frame_clock::{FrameClock, FrameCallbackRegistration};
pub use observable::{ObservableProperty, Subscription};
pub use platform::RuntimeScheduler;
pub use runtime::{DefaultScheduler, FrameCallbackId, Runtime, RuntimeHandle, TimerId};

/// Converts a [`std::time::Duration`] to the nanosecond timestamps used by the frame clock.
pub fn duration_to_nanos(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
