//! Gesture samples and the recognizers that deliver them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use pulldismiss_graphics::Point;

use crate::ids::DelegateId;
use crate::view::{View, WeakView};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    Began,
    Changed,
    Cancelled,
    Ended,
}

impl GesturePhase {
    /// `Began` or `Changed`: the finger is still down and moving.
    pub fn is_tracking(self) -> bool {
        matches!(self, GesturePhase::Began | GesturePhase::Changed)
    }
}

/// One drag sample. Translation is cumulative since the gesture began and,
/// like velocity (points per second), measured in the recognizer's view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSample {
    pub translation: Point,
    pub velocity: Point,
    pub phase: GesturePhase,
}

impl GestureSample {
    pub fn new(phase: GesturePhase, translation: Point, velocity: Point) -> Self {
        Self {
            translation,
            velocity,
            phase,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecognizerKind {
    Pan,
    /// Zero-duration long press, used only to learn that a finger touched down.
    LongPress,
}

struct RecognizerInner {
    kind: RecognizerKind,
    owner: DelegateId,
    view: RefCell<WeakView>,
}

/// A recognizer installed on a view by some owner.
///
/// Recognizers created here always recognize simultaneously with every other
/// recognizer on the view, so the dismiss gesture never starves a scroll view
/// of its own pan.
#[derive(Clone)]
pub struct GestureRecognizer {
    inner: Rc<RecognizerInner>,
}

impl GestureRecognizer {
    pub fn new(kind: RecognizerKind, owner: DelegateId) -> Self {
        Self {
            inner: Rc::new(RecognizerInner {
                kind,
                owner,
                view: RefCell::new(WeakView::default()),
            }),
        }
    }

    pub fn kind(&self) -> RecognizerKind {
        self.inner.kind
    }

    pub fn owner(&self) -> DelegateId {
        self.inner.owner
    }

    /// The view this recognizer is installed on, if it is installed and the
    /// view is still alive.
    pub fn view(&self) -> Option<View> {
        self.inner.view.borrow().upgrade()
    }

    pub(crate) fn attach_to(&self, view: &View) {
        *self.inner.view.borrow_mut() = view.downgrade();
    }

    pub(crate) fn detach(&self) {
        *self.inner.view.borrow_mut() = WeakView::default();
    }
}

impl PartialEq for GestureRecognizer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for GestureRecognizer {}

impl fmt::Debug for GestureRecognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureRecognizer")
            .field("kind", &self.inner.kind)
            .field("owner", &self.inner.owner)
            .field("installed", &self.view().is_some())
            .finish()
    }
}
