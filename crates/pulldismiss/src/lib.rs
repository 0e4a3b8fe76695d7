//! Interactive pull-to-dismiss for presented screens.
//!
//! A [`PullToDismissTransition`] watches a pan gesture, decides when a
//! downward drag may start dismissing the screen, drives the dismiss
//! animation from the drag, and on release either completes or cancels it.
//! When the screen embeds a scroll view the transition arbitrates with it so
//! that scrolling and dismissing never fight over the same drag.
//!
//! [`PullToDismiss`] installs a transition on a screen (or its navigation
//! container) and keeps it installed.

mod animator;
mod classifier;
mod config;
mod dismissable;
mod driver;
mod error;
pub mod gesture_constants;
mod observer;
mod scroll_coordinator;
mod transition;

pub use animator::{transition_duration, DismissAnimator, TransitionOutcome};
pub use classifier::{GestureClassifier, GestureDecision, StartGate, TransitionState};
pub use config::{DismissThresholds, TransitionConfig, TransitionStyle};
pub use dismissable::PullToDismiss;
pub use driver::TransitionDriver;
pub use error::DismissError;
pub use observer::PullToDismissObserver;
pub use scroll_coordinator::{ScrollCoordinator, ScrollLockState};
pub use transition::PullToDismissTransition;

pub mod prelude {
    pub use crate::{
        DismissError, PullToDismiss, PullToDismissObserver, PullToDismissTransition,
        TransitionConfig, TransitionStyle,
    };
}
