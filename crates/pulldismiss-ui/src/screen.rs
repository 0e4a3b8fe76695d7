use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use pulldismiss_core::ObservableProperty;
use pulldismiss_graphics::Rect;

use crate::context::TransitionContext;
use crate::ids::{DelegateId, ScreenId};
use crate::view::View;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScreenKind {
    Content,
    Navigation,
}

struct ScreenInner {
    id: ScreenId,
    title: String,
    kind: ScreenKind,
    view: View,
    navigation: RefCell<Weak<ScreenInner>>,
    stack: RefCell<Vec<Screen>>,
    transitioning_delegate: ObservableProperty<Option<DelegateId>>,
    presentation: RefCell<Option<View>>,
}

/// A screen (view controller): a root view plus its place in a navigation
/// stack and in the modal presentation chain.
#[derive(Clone)]
pub struct Screen {
    inner: Rc<ScreenInner>,
}

/// Non-owning screen handle. Holders must cope with the screen going away.
#[derive(Clone, Default)]
pub struct WeakScreen {
    inner: Weak<ScreenInner>,
}

impl WeakScreen {
    pub fn upgrade(&self) -> Option<Screen> {
        self.inner.upgrade().map(|inner| Screen { inner })
    }
}

impl Screen {
    pub fn new(title: impl Into<String>, frame: Rect) -> Self {
        Self::with_kind(title.into(), ScreenKind::Content, View::new(frame))
    }

    /// Creates a content screen whose root view is `view`, e.g. a scroll view's view.
    pub fn with_view(title: impl Into<String>, view: View) -> Self {
        Self::with_kind(title.into(), ScreenKind::Content, view)
    }

    /// Creates a navigation container with `root` as the bottom of its stack.
    pub fn navigation(title: impl Into<String>, root: &Screen) -> Self {
        let container = Self::with_kind(
            title.into(),
            ScreenKind::Navigation,
            View::new(root.view().frame()),
        );
        container.push(root);
        container
    }

    fn with_kind(title: String, kind: ScreenKind, view: View) -> Self {
        Self {
            inner: Rc::new(ScreenInner {
                id: ScreenId::next(),
                title,
                kind,
                view,
                navigation: RefCell::new(Weak::new()),
                stack: RefCell::new(Vec::new()),
                transitioning_delegate: ObservableProperty::new(None),
                presentation: RefCell::new(None),
            }),
        }
    }

    pub fn id(&self) -> ScreenId {
        self.inner.id
    }

    pub fn title(&self) -> &str {
        &self.inner.title
    }

    pub fn view(&self) -> &View {
        &self.inner.view
    }

    pub fn is_navigation_container(&self) -> bool {
        self.inner.kind == ScreenKind::Navigation
    }

    /// Pushes `screen` onto this navigation container's stack.
    pub fn push(&self, screen: &Screen) {
        debug_assert!(
            self.is_navigation_container(),
            "push is only meaningful on navigation containers"
        );
        *screen.inner.navigation.borrow_mut() = Rc::downgrade(&self.inner);
        screen.view().set_frame(self.view().bounds());
        self.view().add_subview(screen.view());
        self.inner.stack.borrow_mut().push(screen.clone());
    }

    pub fn navigation_container(&self) -> Option<Screen> {
        self.inner
            .navigation
            .borrow()
            .upgrade()
            .map(|inner| Screen { inner })
    }

    /// True when the screen has no navigation container or sits at the bottom of its stack.
    pub fn is_root_of_navigation_stack(&self) -> bool {
        let Some(container) = self.navigation_container() else {
            return true;
        };
        let stack = container.inner.stack.borrow();
        stack.first().is_some_and(|root| root == self)
    }

    pub fn transitioning_delegate(&self) -> Option<DelegateId> {
        self.inner.transitioning_delegate.get()
    }

    pub fn set_transitioning_delegate(&self, delegate: Option<DelegateId>) {
        self.inner.transitioning_delegate.set(delegate);
    }

    pub fn transitioning_delegate_property(&self) -> &ObservableProperty<Option<DelegateId>> {
        &self.inner.transitioning_delegate
    }

    /// Presents this screen modally, filling `container`.
    pub fn present_in(&self, container: &View) {
        self.view().set_frame(container.bounds());
        container.add_subview(self.view());
        *self.inner.presentation.borrow_mut() = Some(container.clone());
    }

    pub fn is_presented(&self) -> bool {
        self.inner.presentation.borrow().is_some()
    }

    pub fn presentation_container(&self) -> Option<View> {
        self.inner.presentation.borrow().clone()
    }

    /// The screen a dismissal actually removes: this screen when presented
    /// directly, otherwise its presented navigation container.
    pub fn presentation_root(&self) -> Screen {
        if self.is_presented() {
            return self.clone();
        }
        match self.navigation_container() {
            Some(container) if container.is_presented() => container,
            _ => self.clone(),
        }
    }

    /// Creates the context for dismissing [`presentation_root`](Self::presentation_root).
    /// `None` when nothing is presented.
    pub fn dismissal_context(&self, interactive: bool) -> Option<TransitionContext> {
        let root = self.presentation_root();
        let container = root.presentation_container()?;
        Some(TransitionContext::new(container, &root, interactive))
    }

    /// Removes the screen from its presentation container.
    pub fn complete_dismissal(&self) {
        if self.inner.presentation.borrow_mut().take().is_some() {
            self.view().remove_from_superview();
            log::debug!("{} dismissed", self.title());
        }
    }

    pub fn downgrade(&self) -> WeakScreen {
        WeakScreen {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl PartialEq for Screen {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Screen {}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screen")
            .field("id", &self.inner.id)
            .field("title", &self.inner.title)
            .field("kind", &self.inner.kind)
            .field("presented", &self.is_presented())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/screen_tests.rs"]
mod tests;
