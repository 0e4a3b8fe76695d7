//! Platform abstraction for frame scheduling.
//!
//! The host platform owns the frame loop; the runtime only asks it for
//! frames and stays a plain single-threaded queue.

/// Schedules frames for the runtime.
///
/// Implementations must be safe to use from multiple threads.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}
