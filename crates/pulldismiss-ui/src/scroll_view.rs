use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use pulldismiss_core::ObservableProperty;
use pulldismiss_graphics::{Point, Rect};

use crate::view::View;

struct ScrollViewInner {
    view: View,
    content_offset: ObservableProperty<Point>,
    content_inset_top: Cell<f32>,
    bounces: Cell<bool>,
    bounce_writes: Cell<u32>,
}

/// A scrollable content area. Its content offset is observable; the
/// offset at rest (scrolled to the very top) is `-content_inset_top`.
#[derive(Clone)]
pub struct ScrollView {
    inner: Rc<ScrollViewInner>,
}

#[derive(Clone, Default)]
pub struct WeakScrollView {
    inner: Weak<ScrollViewInner>,
}

impl WeakScrollView {
    pub fn upgrade(&self) -> Option<ScrollView> {
        self.inner.upgrade().map(|inner| ScrollView { inner })
    }

    pub fn ptr_eq(&self, other: &WeakScrollView) -> bool {
        Weak::ptr_eq(&self.inner, &other.inner)
    }
}

impl ScrollView {
    pub fn new(frame: Rect) -> Self {
        Self {
            inner: Rc::new(ScrollViewInner {
                view: View::new(frame),
                content_offset: ObservableProperty::new(Point::ZERO),
                content_inset_top: Cell::new(0.0),
                bounces: Cell::new(true),
                bounce_writes: Cell::new(0),
            }),
        }
    }

    pub fn view(&self) -> &View {
        &self.inner.view
    }

    pub fn bounds_height(&self) -> f32 {
        self.inner.view.bounds().height
    }

    pub fn content_offset(&self) -> Point {
        self.inner.content_offset.get()
    }

    /// Moves the content and notifies offset observers.
    pub fn set_content_offset(&self, offset: Point) {
        self.inner.content_offset.set(offset);
    }

    pub fn content_offset_property(&self) -> &ObservableProperty<Point> {
        &self.inner.content_offset
    }

    pub fn content_inset_top(&self) -> f32 {
        self.inner.content_inset_top.get()
    }

    pub fn set_content_inset_top(&self, inset: f32) {
        self.inner.content_inset_top.set(inset);
    }

    pub fn rest_offset_y(&self) -> f32 {
        -self.content_inset_top()
    }

    pub fn bounces(&self) -> bool {
        self.inner.bounces.get()
    }

    pub fn set_bounces(&self, bounces: bool) {
        self.inner.bounce_writes.set(self.inner.bounce_writes.get() + 1);
        self.inner.bounces.set(bounces);
    }

    /// How many times `set_bounces` has been called.
    pub fn bounce_writes(&self) -> u32 {
        self.inner.bounce_writes.get()
    }

    pub fn downgrade(&self) -> WeakScrollView {
        WeakScrollView {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl PartialEq for ScrollView {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ScrollView {}

impl fmt::Debug for ScrollView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollView")
            .field("view", &self.inner.view.id())
            .field("content_offset", &self.content_offset())
            .field("bounces", &self.bounces())
            .finish()
    }
}
