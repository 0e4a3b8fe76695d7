//! Time-based animations with easing curves, driven by the runtime's frame clock.

mod animatable;
mod easing;

pub use animatable::{Animatable, AnimationEnd, Lerp};
pub use easing::{AnimationSpec, Easing};
