//! Headless host model for pulldismiss.
//!
//! Views, scroll views, screens and transition contexts are plain shared
//! handles (`Rc` inside, cheap to clone, compared by identity). They stand in
//! for the platform's retained view hierarchy and presentation machinery.

mod context;
mod gesture;
mod ids;
mod screen;
mod scroll_view;
mod view;

pub use context::TransitionContext;
pub use gesture::{GesturePhase, GestureRecognizer, GestureSample, RecognizerKind};
pub use ids::{DelegateId, ScreenId, ViewId};
pub use screen::{Screen, WeakScreen};
pub use scroll_view::{ScrollView, WeakScrollView};
pub use view::{View, WeakView};

pub mod prelude {
    pub use crate::{
        GesturePhase, GestureRecognizer, GestureSample, Screen, ScrollView, TransitionContext,
        View,
    };
    pub use pulldismiss_graphics::prelude::*;
}
