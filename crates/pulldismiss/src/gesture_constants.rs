//! Default thresholds and timings for the dismiss gesture and its animation.
//!
//! Distances are in logical points, velocities in points per second.

use std::time::Duration;

/// Downward velocity a drag must exceed before it may start a dismiss.
pub const BEGIN_VELOCITY_THRESHOLD: f32 = 10.0;

/// Progress at which a release with non-negative vertical velocity commits
/// the dismiss.
pub const COMPLETION_FRACTION_THRESHOLD: f32 = 0.35;

/// Release velocity that commits the dismiss regardless of progress, as long
/// as the drag travelled [`MINIMUM_FINISH_TRANSLATION`].
pub const FINISH_VELOCITY_THRESHOLD: f32 = 1280.0;

/// Minimum total downward translation for a flick to commit.
pub const MINIMUM_FINISH_TRANSLATION: f32 = 87.0;

/// How long a deep scroll keeps new dismiss attempts from starting.
pub const SCROLL_REENABLE_DELAY: Duration = Duration::from_millis(720);

/// How long a fresh touch counts as "still" before it is assumed to be a pan.
pub const STILL_TOUCH_DELAY: Duration = Duration::from_millis(150);

pub const DIMMING_PEAK_ALPHA: f32 = 0.87;

/// Slide playback length while the gesture drives the transition.
pub const DRAG_DURATION_MILLIS: u64 = 870;

/// Playback length for the scale style and for non-interactive dismissals.
pub const INSTANT_DURATION_MILLIS: u64 = 300;

/// The scale style shrinks the snapshot by `size / SCALE_INSET_DIVISOR` per edge.
pub const SCALE_INSET_DIVISOR: f32 = 4.0;

pub const SCALE_CORNER_RADIUS: f32 = 12.0;

pub const SCALE_CORNER_DURATION_MILLIS: u64 = 120;

/// Time the dimming stays up after a scale dismiss, covering the handoff to
/// the screen underneath.
pub const SCALE_DIMMING_HOLD: Duration = Duration::from_millis(200);
