use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use pulldismiss_graphics::{Color, Rect};
use smallvec::SmallVec;

use crate::gesture::GestureRecognizer;
use crate::ids::ViewId;

struct ViewNode {
    id: ViewId,
    frame: Rect,
    alpha: f32,
    hidden: bool,
    corner_radius: f32,
    background: Option<Color>,
    snapshot_of: Option<ViewId>,
    superview: Weak<RefCell<ViewNode>>,
    subviews: Vec<View>,
    gesture_recognizers: SmallVec<[GestureRecognizer; 2]>,
}

/// Shared handle to a node in the view hierarchy.
///
/// Subviews are ordered back to front. A view owns its subviews; the
/// superview link is weak.
#[derive(Clone)]
pub struct View {
    inner: Rc<RefCell<ViewNode>>,
}

#[derive(Clone, Default)]
pub struct WeakView {
    inner: Weak<RefCell<ViewNode>>,
}

impl WeakView {
    pub fn upgrade(&self) -> Option<View> {
        self.inner.upgrade().map(|inner| View { inner })
    }
}

impl View {
    pub fn new(frame: Rect) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ViewNode {
                id: ViewId::next(),
                frame,
                alpha: 1.0,
                hidden: false,
                corner_radius: 0.0,
                background: None,
                snapshot_of: None,
                superview: Weak::new(),
                subviews: Vec::new(),
                gesture_recognizers: SmallVec::new(),
            })),
        }
    }

    pub fn with_background(self, color: Color) -> Self {
        self.set_background(Some(color));
        self
    }

    pub fn id(&self) -> ViewId {
        self.inner.borrow().id
    }

    pub fn frame(&self) -> Rect {
        self.inner.borrow().frame
    }

    pub fn set_frame(&self, frame: Rect) {
        self.inner.borrow_mut().frame = frame;
    }

    pub fn bounds(&self) -> Rect {
        self.frame().bounds()
    }

    pub fn alpha(&self) -> f32 {
        self.inner.borrow().alpha
    }

    pub fn set_alpha(&self, alpha: f32) {
        self.inner.borrow_mut().alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn is_hidden(&self) -> bool {
        self.inner.borrow().hidden
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.inner.borrow_mut().hidden = hidden;
    }

    pub fn corner_radius(&self) -> f32 {
        self.inner.borrow().corner_radius
    }

    pub fn set_corner_radius(&self, radius: f32) {
        self.inner.borrow_mut().corner_radius = radius.max(0.0);
    }

    pub fn background(&self) -> Option<Color> {
        self.inner.borrow().background
    }

    pub fn set_background(&self, color: Option<Color>) {
        self.inner.borrow_mut().background = color;
    }

    /// Captures a resizable snapshot: a detached view with the same frame,
    /// appearance and corner radius that records which view it copies.
    pub fn snapshot_view(&self) -> View {
        let node = self.inner.borrow();
        let snapshot = View::new(node.frame);
        {
            let mut copy = snapshot.inner.borrow_mut();
            copy.alpha = node.alpha;
            copy.corner_radius = node.corner_radius;
            copy.background = node.background;
            copy.snapshot_of = Some(node.id);
        }
        snapshot
    }

    /// Id of the view this one is a snapshot of, if any.
    pub fn snapshot_source(&self) -> Option<ViewId> {
        self.inner.borrow().snapshot_of
    }

    pub fn superview(&self) -> Option<View> {
        self.inner
            .borrow()
            .superview
            .upgrade()
            .map(|inner| View { inner })
    }

    pub fn subviews(&self) -> Vec<View> {
        self.inner.borrow().subviews.clone()
    }

    pub fn index_of_subview(&self, view: &View) -> Option<usize> {
        self.inner
            .borrow()
            .subviews
            .iter()
            .position(|subview| subview == view)
    }

    pub fn add_subview(&self, view: &View) {
        self.insert_subview_at(view, None);
    }

    /// Inserts `view` directly behind `sibling`. Falls back to the front when
    /// `sibling` is not a subview.
    pub fn insert_subview_below(&self, view: &View, sibling: &View) {
        view.remove_from_superview();
        let index = self.index_of_subview(sibling);
        self.insert_subview_at(view, index);
    }

    /// Inserts `view` directly in front of `sibling`. Falls back to the front
    /// when `sibling` is not a subview.
    pub fn insert_subview_above(&self, view: &View, sibling: &View) {
        view.remove_from_superview();
        let index = self.index_of_subview(sibling).map(|index| index + 1);
        self.insert_subview_at(view, index);
    }

    fn insert_subview_at(&self, view: &View, index: Option<usize>) {
        debug_assert!(view != self, "a view cannot be its own subview");
        view.remove_from_superview();
        view.inner.borrow_mut().superview = Rc::downgrade(&self.inner);
        let mut node = self.inner.borrow_mut();
        let index = index.unwrap_or(node.subviews.len()).min(node.subviews.len());
        node.subviews.insert(index, view.clone());
    }

    pub fn remove_from_superview(&self) {
        let superview = std::mem::take(&mut self.inner.borrow_mut().superview);
        if let Some(parent) = superview.upgrade() {
            parent
                .borrow_mut()
                .subviews
                .retain(|subview| !Rc::ptr_eq(&subview.inner, &self.inner));
        }
    }

    pub fn add_gesture_recognizer(&self, recognizer: &GestureRecognizer) {
        if let Some(previous) = recognizer.view() {
            previous.remove_gesture_recognizer(recognizer);
        }
        recognizer.attach_to(self);
        self.inner
            .borrow_mut()
            .gesture_recognizers
            .push(recognizer.clone());
    }

    pub fn remove_gesture_recognizer(&self, recognizer: &GestureRecognizer) {
        let removed = {
            let mut node = self.inner.borrow_mut();
            let before = node.gesture_recognizers.len();
            node.gesture_recognizers
                .retain(|installed| installed != recognizer);
            before != node.gesture_recognizers.len()
        };
        if removed {
            recognizer.detach();
        }
    }

    pub fn gesture_recognizers(&self) -> Vec<GestureRecognizer> {
        self.inner.borrow().gesture_recognizers.to_vec()
    }

    pub fn downgrade(&self) -> WeakView {
        WeakView {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl PartialEq for View {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for View {}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.inner.borrow();
        f.debug_struct("View")
            .field("id", &node.id)
            .field("frame", &node.frame)
            .field("alpha", &node.alpha)
            .field("hidden", &node.hidden)
            .field("subviews", &node.subviews.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
