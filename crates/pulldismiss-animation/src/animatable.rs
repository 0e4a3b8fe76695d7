use std::cell::RefCell;
use std::rc::Rc;

use pulldismiss_core::{FrameCallbackRegistration, RuntimeHandle};

use crate::AnimationSpec;

/// Trait for types that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

/// How an animation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEnd {
    /// Reached its target.
    Finished,
    /// Superseded by another `animate_to` or by `stop`.
    Interrupted,
}

type UpdateCallback<T> = Rc<dyn Fn(&T) + 'static>;
type EndCallback = Box<dyn FnOnce(AnimationEnd) + 'static>;

/// A value that tweens toward a target on the frame clock.
///
/// Every frame the new value is pushed to the update callback; the end
/// callback given to [`animate_to`](Self::animate_to) fires exactly once.
pub struct Animatable<T: Lerp + Clone + 'static> {
    inner: Rc<RefCell<AnimatableInner<T>>>,
}

struct AnimatableInner<T: Lerp + Clone + 'static> {
    runtime: RuntimeHandle,
    current: T,
    start: T,
    target: T,
    spec: AnimationSpec,
    start_time_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
    on_update: Option<UpdateCallback<T>>,
    on_end: Option<EndCallback>,
}

impl<T: Lerp + Clone + 'static> Animatable<T> {
    pub fn new(initial: T, runtime: RuntimeHandle) -> Self {
        let inner = AnimatableInner {
            runtime,
            current: initial.clone(),
            start: initial.clone(),
            target: initial,
            spec: AnimationSpec::default(),
            start_time_nanos: None,
            registration: None,
            on_update: None,
            on_end: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Installs the callback that receives every new value.
    pub fn set_on_update(&self, on_update: impl Fn(&T) + 'static) {
        self.inner.borrow_mut().on_update = Some(Rc::new(on_update));
    }

    pub fn value(&self) -> T {
        self.inner.borrow().current.clone()
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().registration.is_some()
    }

    /// Animates from the current value to `target`. A running animation is
    /// interrupted first.
    pub fn animate_to(
        &self,
        target: T,
        spec: AnimationSpec,
        on_end: impl FnOnce(AnimationEnd) + 'static,
    ) {
        let interrupted = {
            let mut inner = self.inner.borrow_mut();
            if let Some(registration) = inner.registration.take() {
                registration.cancel();
            }
            let interrupted = inner.on_end.take();
            inner.start = inner.current.clone();
            inner.target = target;
            inner.spec = spec;
            inner.start_time_nanos = None;
            inner.on_end = Some(Box::new(on_end));
            interrupted
        };
        if let Some(on_end) = interrupted {
            on_end(AnimationEnd::Interrupted);
        }
        Self::schedule_frame(&self.inner);
    }

    /// Stops at the current value.
    pub fn stop(&self) {
        let interrupted = {
            let mut inner = self.inner.borrow_mut();
            if let Some(registration) = inner.registration.take() {
                registration.cancel();
            }
            inner.start_time_nanos = None;
            inner.on_end.take()
        };
        if let Some(on_end) = interrupted {
            on_end(AnimationEnd::Interrupted);
        }
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatableInner<T>>>) {
        let clock = {
            let inner = this.borrow();
            if inner.registration.is_some() {
                return;
            }
            inner.runtime.frame_clock()
        };
        let weak = Rc::downgrade(this);
        let registration = clock.with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, time);
            }
        });
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<AnimatableInner<T>>>, frame_time_nanos: u64) {
        let (value, finished, on_update, on_end) = {
            let mut inner = this.borrow_mut();
            if let Some(registration) = inner.registration.take() {
                registration.disarm();
            }

            let spec = inner.spec;
            let start_time = *inner.start_time_nanos.get_or_insert(frame_time_nanos);
            let elapsed_nanos = frame_time_nanos.saturating_sub(start_time);
            let duration_nanos = spec.duration_millis * 1_000_000;

            let linear_progress = if duration_nanos == 0 {
                1.0
            } else {
                (elapsed_nanos as f32 / duration_nanos as f32).clamp(0.0, 1.0)
            };

            let finished = linear_progress >= 1.0;
            inner.current = if finished {
                inner.target.clone()
            } else {
                let eased = spec.easing.transform(linear_progress);
                inner.start.lerp(&inner.target, eased)
            };
            let on_end = if finished {
                inner.start = inner.target.clone();
                inner.start_time_nanos = None;
                inner.on_end.take()
            } else {
                None
            };
            (inner.current.clone(), finished, inner.on_update.clone(), on_end)
        };

        // Schedule before running callbacks so a callback that stops or
        // retargets the animation sees a consistent registration.
        if !finished {
            Self::schedule_frame(this);
        }

        if let Some(on_update) = on_update {
            on_update(&value);
        }

        if let Some(on_end) = on_end {
            on_end(AnimationEnd::Finished);
        }
    }
}

impl<T: Lerp + Clone + 'static> Clone for Animatable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
#[path = "tests/animatable_tests.rs"]
mod tests;
