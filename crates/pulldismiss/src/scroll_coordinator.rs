//! Arbitration between the dismiss drag and an embedded scroll view.
//!
//! The coordinator watches one scroll view's content offset. It switches the
//! scroll view's bounce off while a dismiss could be under way, so pulling
//! down at the top moves the screen instead of rubber-banding the content,
//! and it briefly blocks new attempts after the content was scrolled far.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use pulldismiss_core::{RuntimeHandle, Subscription};
use pulldismiss_graphics::Point;
use pulldismiss_ui::{ScrollView, WeakScrollView};

use crate::config::{DismissThresholds, TransitionStyle};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollLockState {
    pub bounce_suppressed: bool,
    pub recent_scroll_blocks_start: bool,
    pub touch_is_still_and_active: bool,
    pub transition_ended_while_pan_inactive: bool,
}

struct CoordinatorState {
    runtime: RuntimeHandle,
    style: TransitionStyle,
    thresholds: DismissThresholds,
    monitored: WeakScrollView,
    original_bounces: bool,
    subscription: Option<Subscription>,
    lock: ScrollLockState,
    active_translation: Option<Point>,
    attach_generation: u64,
    scroll_generation: u64,
    touch_generation: u64,
}

impl CoordinatorState {
    fn should_suppress_bounce(&self, offset: Point) -> bool {
        self.lock.touch_is_still_and_active
            || self.active_translation.is_some_and(|translation| translation.y > 0.0)
            || (self.style.slides()
                && self.lock.transition_ended_while_pan_inactive
                && offset.y <= 0.0)
    }

    fn apply_bounce(&mut self, scroll: &ScrollView, offset: Point) {
        let suppress = self.should_suppress_bounce(offset);
        if suppress == self.lock.bounce_suppressed {
            return;
        }
        self.lock.bounce_suppressed = suppress;
        let bounces = !suppress && self.original_bounces;
        if scroll.bounces() != bounces {
            log::trace!("scroll bounce {}", if bounces { "restored" } else { "suppressed" });
            scroll.set_bounces(bounces);
        }
    }
}

/// Owns the observation of at most one scroll view. Dropping the coordinator
/// detaches it.
pub struct ScrollCoordinator {
    inner: Rc<RefCell<CoordinatorState>>,
}

impl ScrollCoordinator {
    pub fn new(runtime: RuntimeHandle, style: TransitionStyle, thresholds: DismissThresholds) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CoordinatorState {
                runtime,
                style,
                thresholds,
                monitored: WeakScrollView::default(),
                original_bounces: true,
                subscription: None,
                lock: ScrollLockState::default(),
                active_translation: None,
                attach_generation: 0,
                scroll_generation: 0,
                touch_generation: 0,
            })),
        }
    }

    /// Starts observing `scroll`, replacing any previous scroll view.
    pub fn attach(&self, scroll: &ScrollView) {
        self.detach();
        {
            let mut state = self.inner.borrow_mut();
            state.monitored = scroll.downgrade();
            state.original_bounces = scroll.bounces();
            state.lock = ScrollLockState::default();
            state.attach_generation += 1;
        }

        let weak = Rc::downgrade(&self.inner);
        let observed = scroll.downgrade();
        let subscription = scroll
            .content_offset_property()
            .subscribe_with_initial(move |offset| {
                let (Some(inner), Some(scroll)) = (weak.upgrade(), observed.upgrade()) else {
                    return;
                };
                Self::offset_changed(&inner, &scroll, *offset);
            });
        self.inner.borrow_mut().subscription = Some(subscription);
        log::debug!("monitoring {scroll:?}");
    }

    /// Stops observing and gives the scroll view its own bounce setting back.
    pub fn detach(&self) {
        let (subscription, scroll, original_bounces, was_suppressed) = {
            let mut state = self.inner.borrow_mut();
            let scroll = std::mem::take(&mut state.monitored).upgrade();
            let was_suppressed = state.lock.bounce_suppressed;
            state.lock = ScrollLockState::default();
            state.attach_generation += 1;
            (
                state.subscription.take(),
                scroll,
                state.original_bounces,
                was_suppressed,
            )
        };
        drop(subscription);
        if let Some(scroll) = scroll {
            if was_suppressed && scroll.bounces() != original_bounces {
                scroll.set_bounces(original_bounces);
            }
        }
    }

    pub fn monitored(&self) -> Option<ScrollView> {
        self.inner.borrow().monitored.upgrade()
    }

    pub fn lock_state(&self) -> ScrollLockState {
        self.inner.borrow().lock
    }

    pub fn blocks_start(&self) -> bool {
        self.inner.borrow().lock.recent_scroll_blocks_start
    }

    /// True without a scroll view, otherwise true while the content sits at
    /// or above its rest offset.
    pub fn is_at_rest(&self) -> bool {
        match self.monitored() {
            Some(scroll) => scroll.content_offset().y <= scroll.rest_offset_y(),
            None => true,
        }
    }

    /// Remembers the pan translation while a finger is dragging; `None` once
    /// the pan ended.
    pub fn record_active_translation(&self, translation: Option<Point>) {
        self.inner.borrow_mut().active_translation = translation;
    }

    pub fn mark_transition_ended(&self) {
        self.inner.borrow_mut().lock.transition_ended_while_pan_inactive = true;
    }

    /// Re-evaluates the lock for the monitored scroll view at `offset`.
    pub fn on_offset_changed(&self, offset: Point, bounds_height: f32) {
        let Some(scroll) = self.monitored() else {
            return;
        };
        Self::update_for_offset(&self.inner, &scroll, offset, bounds_height);
    }

    /// A finger touched down. Bounce stays off until the touch either turns
    /// into a pan or has rested for the still-touch delay.
    pub fn on_touch_begin(&self) {
        let (runtime, delay, generation, attach_generation) = {
            let mut state = self.inner.borrow_mut();
            state.lock.touch_is_still_and_active = true;
            state.touch_generation += 1;
            (
                state.runtime.clone(),
                state.thresholds.still_touch_delay,
                state.touch_generation,
                state.attach_generation,
            )
        };
        Self::reapply_bounce(&self.inner);

        let weak = Rc::downgrade(&self.inner);
        runtime.post_delayed(delay, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            {
                let mut state = inner.borrow_mut();
                if state.touch_generation != generation
                    || state.attach_generation != attach_generation
                {
                    return;
                }
                state.lock.touch_is_still_and_active = false;
            }
            Self::reapply_bounce(&inner);
        });
    }

    fn offset_changed(inner: &Rc<RefCell<CoordinatorState>>, scroll: &ScrollView, offset: Point) {
        if !inner.borrow().monitored.ptr_eq(&scroll.downgrade()) {
            return;
        }
        Self::update_for_offset(inner, scroll, offset, scroll.bounds_height());
    }

    fn update_for_offset(
        inner: &Rc<RefCell<CoordinatorState>>,
        scroll: &ScrollView,
        offset: Point,
        bounds_height: f32,
    ) {
        let mut state = inner.borrow_mut();
        if offset.y > 0.0 {
            state.lock.transition_ended_while_pan_inactive = false;
        }
        state.apply_bounce(scroll, offset);

        if offset.y <= bounds_height {
            return;
        }
        state.lock.recent_scroll_blocks_start = true;
        state.scroll_generation += 1;
        let generation = state.scroll_generation;
        let attach_generation = state.attach_generation;
        let delay = state.thresholds.scroll_reenable_delay;
        let runtime = state.runtime.clone();
        drop(state);

        let weak: Weak<RefCell<CoordinatorState>> = Rc::downgrade(inner);
        runtime.post_delayed(delay, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut state = inner.borrow_mut();
            if state.scroll_generation == generation && state.attach_generation == attach_generation {
                state.lock.recent_scroll_blocks_start = false;
            }
        });
    }

    fn reapply_bounce(inner: &Rc<RefCell<CoordinatorState>>) {
        let Some(scroll) = inner.borrow().monitored.upgrade() else {
            return;
        };
        let offset = scroll.content_offset();
        inner.borrow_mut().apply_bounce(&scroll, offset);
    }
}

impl Drop for ScrollCoordinator {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
#[path = "tests/scroll_coordinator_tests.rs"]
mod tests;
