//! Installing a transition on a screen: delegate, recognizers and
//! self-healing when someone else takes the delegate slot.

use std::cell::RefCell;
use std::rc::Rc;

use pulldismiss_core::Subscription;
use pulldismiss_ui::{RecognizerKind, Screen, View, WeakScreen};
use smallvec::SmallVec;

use crate::transition::PullToDismissTransition;

struct DismissableInner {
    screen: WeakScreen,
    transition: PullToDismissTransition,
    observation: RefCell<Option<Subscription>>,
}

/// Enables and disables pull-to-dismiss for a screen.
///
/// A screen inside a navigation container is dismissed together with the
/// container, so the transition is installed on the container and the
/// touch-down recognizer on the screen itself.
///
/// ```
/// use pulldismiss::{PullToDismiss, PullToDismissTransition};
/// use pulldismiss_core::Runtime;
/// use pulldismiss_graphics::Rect;
/// use pulldismiss_ui::{Screen, View};
///
/// let runtime = Runtime::default();
/// let window = View::new(Rect::new(0.0, 0.0, 390.0, 844.0));
/// let screen = Screen::new("sheet", window.bounds());
/// screen.present_in(&window);
///
/// let transition = PullToDismissTransition::new(&screen, runtime.handle());
/// let dismissable = PullToDismiss::new(&screen, transition.clone());
/// dismissable.set_enabled(true);
///
/// assert_eq!(screen.transitioning_delegate(), Some(transition.delegate_id()));
/// assert_eq!(screen.view().gesture_recognizers().len(), 2);
/// ```
#[derive(Clone)]
pub struct PullToDismiss {
    inner: Rc<DismissableInner>,
}

impl PullToDismiss {
    pub fn new(screen: &Screen, transition: PullToDismissTransition) -> Self {
        Self {
            inner: Rc::new(DismissableInner {
                screen: screen.downgrade(),
                transition,
                observation: RefCell::new(None),
            }),
        }
    }

    pub fn transition(&self) -> &PullToDismissTransition {
        &self.inner.transition
    }

    /// The navigation container, if any, followed by the screen itself.
    pub fn eligible_screens(&self) -> SmallVec<[Screen; 2]> {
        let mut screens = SmallVec::new();
        let Some(screen) = self.inner.screen.upgrade() else {
            return screens;
        };
        if let Some(container) = screen.navigation_container() {
            screens.push(container);
        }
        screens.push(screen);
        screens
    }

    pub fn is_enabled(&self) -> bool {
        let id = self.inner.transition.delegate_id();
        self.eligible_screens()
            .iter()
            .any(|screen| screen.transitioning_delegate() == Some(id))
    }

    pub fn set_enabled(&self, enabled: bool) {
        let eligible = self.eligible_screens();
        self.propagate(&eligible, enabled);
    }

    /// Re-applies the current enabled state, e.g. after the screen moved
    /// into a navigation container.
    pub fn setup(&self) {
        let enabled = self.is_enabled();
        self.propagate(&self.eligible_screens(), enabled);
    }

    fn propagate(&self, eligible: &[Screen], enabled: bool) {
        drop(self.inner.observation.borrow_mut().take());

        let id = self.inner.transition.delegate_id();
        let long_press_anchor: Option<View> = eligible
            .iter()
            .find(|screen| !screen.is_navigation_container())
            .map(|screen| screen.view().clone());
        let Some(first) = eligible.first() else {
            return;
        };
        if enabled && long_press_anchor.is_none() {
            log::warn!("pull-to-dismiss installed on a navigation container; install it on its child");
        }
        debug_assert!(
            !enabled || long_press_anchor.is_some(),
            "pull-to-dismiss needs a content screen, not a navigation container"
        );
        for screen in eligible.iter().rev() {
            if !enabled || screen != first {
                let keep_long_press = enabled && long_press_anchor.as_ref() == Some(screen.view());
                self.tear_down(screen, keep_long_press);
                continue;
            }

            if screen.transitioning_delegate() != Some(id) {
                screen.set_transitioning_delegate(Some(id));
            }
            self.observe_delegate(screen);

            for recognizer in self.inner.transition.gesture_recognizers_for_trigger() {
                let target = match recognizer.kind() {
                    RecognizerKind::Pan => Some(screen.view()),
                    RecognizerKind::LongPress => long_press_anchor.as_ref(),
                };
                let Some(target) = target else {
                    continue;
                };
                let installed = target.gesture_recognizers().iter().any(|existing| {
                    existing.owner() == id && existing.kind() == recognizer.kind()
                });
                if !installed {
                    target.add_gesture_recognizer(&recognizer);
                }
            }
        }
        log::debug!("pull-to-dismiss {}", if enabled { "enabled" } else { "disabled" });
    }

    fn observe_delegate(&self, screen: &Screen) {
        let weak = Rc::downgrade(&self.inner);
        let subscription = screen.transitioning_delegate_property().subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                PullToDismiss { inner }.setup();
            }
        });
        *self.inner.observation.borrow_mut() = Some(subscription);
    }

    fn tear_down(&self, screen: &Screen, keep_long_press: bool) {
        let id = self.inner.transition.delegate_id();
        if screen.transitioning_delegate() == Some(id) {
            screen.set_transitioning_delegate(None);
        }
        for recognizer in screen.view().gesture_recognizers() {
            if recognizer.owner() != id {
                continue;
            }
            if keep_long_press && recognizer.kind() == RecognizerKind::LongPress {
                continue;
            }
            if recognizer.kind() == RecognizerKind::Pan {
                // The release would never arrive through a removed pan.
                self.inner.transition.abort_attempt();
            }
            screen.view().remove_gesture_recognizer(&recognizer);
        }
    }
}

#[cfg(test)]
#[path = "tests/dismissable_tests.rs"]
mod tests;
