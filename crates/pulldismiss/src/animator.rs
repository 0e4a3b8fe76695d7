//! Visuals of a dismiss: the dimming layer, the snapshot and the release
//! playback.
//!
//! One attempt goes through `prepare` (lazy and idempotent), any number of
//! `apply_progress` calls while the finger drags, and a single `run` that
//! plays the rest of the way, tears the helper views down and reports to the
//! host exactly once.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use pulldismiss_animation::{Animatable, AnimationSpec};
use pulldismiss_core::RuntimeHandle;
use pulldismiss_graphics::{Color, Rect};
use pulldismiss_ui::{TransitionContext, View};

use crate::config::{TransitionConfig, TransitionStyle};
use crate::gesture_constants::{
    DIMMING_PEAK_ALPHA, DRAG_DURATION_MILLIS, INSTANT_DURATION_MILLIS, SCALE_CORNER_DURATION_MILLIS,
    SCALE_CORNER_RADIUS, SCALE_DIMMING_HOLD, SCALE_INSET_DIVISOR,
};

/// Where the release playback heads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    Finish,
    Cancel,
}

impl TransitionOutcome {
    pub fn is_cancelled(self) -> bool {
        self == TransitionOutcome::Cancel
    }

    fn target_progress(self) -> f32 {
        match self {
            TransitionOutcome::Finish => 1.0,
            TransitionOutcome::Cancel => 0.0,
        }
    }
}

/// Full playback length for `style`. Interactive slides get the long drag
/// duration; scale and programmatic dismissals use the short one.
pub fn transition_duration(style: TransitionStyle, interactive: bool) -> Duration {
    let millis = if interactive && style.slides() {
        DRAG_DURATION_MILLIS
    } else {
        INSTANT_DURATION_MILLIS
    };
    Duration::from_millis(millis)
}

type Completion = Box<dyn FnOnce(TransitionOutcome) + 'static>;

struct AnimatorState {
    runtime: RuntimeHandle,
    config: TransitionConfig,
    prepared: bool,
    running: bool,
    playing_interactive: Option<bool>,
    screen_view: Option<View>,
    base_frame: Rect,
    base_corner_radius: f32,
    travel: f32,
    visual_progress: f32,
    dimming: Option<View>,
    snapshot: Option<View>,
    corner: Option<Animatable<f32>>,
    playback: Option<Animatable<f32>>,
}

impl AnimatorState {
    fn moving_view(&self) -> Option<&View> {
        if self.config.style.uses_snapshot() {
            self.snapshot.as_ref()
        } else {
            self.screen_view.as_ref()
        }
    }
}

pub struct DismissAnimator {
    inner: Rc<RefCell<AnimatorState>>,
}

impl DismissAnimator {
    pub fn new(runtime: RuntimeHandle, config: TransitionConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(AnimatorState {
                runtime,
                config,
                prepared: false,
                running: false,
                playing_interactive: None,
                screen_view: None,
                base_frame: Rect::default(),
                base_corner_radius: 0.0,
                travel: 0.0,
                visual_progress: 0.0,
                dimming: None,
                snapshot: None,
                corner: None,
                playback: None,
            })),
        }
    }

    /// True from the start of a release playback until its completion ran.
    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    /// Whether the playback under way belongs to an interactive context.
    /// `None` when nothing plays.
    pub fn playing_interactive(&self) -> Option<bool> {
        self.inner.borrow().playing_interactive
    }

    pub fn is_prepared(&self) -> bool {
        self.inner.borrow().prepared
    }

    pub fn dimming_view(&self) -> Option<View> {
        self.inner.borrow().dimming.clone()
    }

    pub fn snapshot_view(&self) -> Option<View> {
        self.inner.borrow().snapshot.clone()
    }

    /// Installs the helper views for `context`. Returns `false` when the
    /// screen being dismissed is gone. A second call before teardown does
    /// nothing.
    pub fn prepare(&self, context: &TransitionContext) -> bool {
        let Some(from) = context.from_screen() else {
            log::debug!("dismiss setup skipped: screen is gone");
            return false;
        };
        let mut state = self.inner.borrow_mut();
        if state.prepared {
            return true;
        }

        let container = context.container_view();
        let view = from.view().clone();
        state.base_frame = view.frame();
        state.base_corner_radius = view.corner_radius();
        state.travel = container.bounds().height;
        state.visual_progress = 0.0;

        if state.config.dimming {
            let dimming = View::new(container.bounds()).with_background(Color::BLACK);
            dimming.set_alpha(DIMMING_PEAK_ALPHA);
            container.insert_subview_below(&dimming, &view);
            state.dimming = Some(dimming);
        }

        let style = state.config.style;
        if style.uses_snapshot() {
            let snapshot = view.snapshot_view();
            container.insert_subview_above(&snapshot, &view);
            view.set_hidden(true);
            if style == TransitionStyle::Scale {
                let corner = Self::round_corners(&state, &snapshot);
                state.corner = Some(corner);
            }
            state.snapshot = Some(snapshot);
        }

        state.screen_view = Some(view);
        state.prepared = true;
        log::debug!("dismiss visuals ready ({style:?})");
        true
    }

    fn round_corners(state: &AnimatorState, snapshot: &View) -> Animatable<f32> {
        let corner = Animatable::new(snapshot.corner_radius(), state.runtime.clone());
        let target = snapshot.downgrade();
        corner.set_on_update(move |radius| {
            if let Some(snapshot) = target.upgrade() {
                snapshot.set_corner_radius(*radius);
            }
        });
        corner.animate_to(
            SCALE_CORNER_RADIUS,
            AnimationSpec::tween(SCALE_CORNER_DURATION_MILLIS, state.config.easing),
            |_| {},
        );
        corner
    }

    /// Scrubs the visuals to `progress` without animating.
    pub fn apply_progress(&self, progress: f32) {
        Self::apply(&self.inner, progress);
    }

    fn apply(inner: &Rc<RefCell<AnimatorState>>, progress: f32) {
        let mut state = inner.borrow_mut();
        if !state.prepared {
            return;
        }
        let progress = progress.clamp(0.0, 1.0);
        state.visual_progress = progress;

        let base = state.base_frame;
        let style = state.config.style;
        if let Some(view) = state.moving_view() {
            if style.slides() {
                view.set_frame(base.translate(0.0, progress * state.travel));
            } else {
                view.set_alpha(1.0 - progress);
                view.set_frame(base.inset(
                    progress * base.width / SCALE_INSET_DIVISOR,
                    progress * base.height / SCALE_INSET_DIVISOR,
                ));
            }
        }
        if style.slides() {
            if let Some(dimming) = &state.dimming {
                dimming.set_alpha(DIMMING_PEAK_ALPHA * (1.0 - progress));
            }
        }
        log::trace!("dismiss progress {progress:.3}");
    }

    /// Plays from the current progress to the end `outcome` asks for, then
    /// completes `context` and calls `completion` with `outcome`.
    ///
    /// Nothing happens, not even `completion`, when the screen being
    /// dismissed is already gone.
    pub fn run(
        &self,
        context: TransitionContext,
        outcome: TransitionOutcome,
        completion: impl FnOnce(TransitionOutcome) + 'static,
    ) {
        if !self.prepare(&context) {
            return;
        }

        let (start, spec, runtime) = {
            let mut state = self.inner.borrow_mut();
            state.running = true;
            state.playing_interactive = Some(context.is_interactive());
            let start = state.visual_progress;
            let full = transition_duration(state.config.style, context.is_interactive());
            let duration = if context.is_interactive() {
                full.mul_f32((outcome.target_progress() - start).abs())
            } else {
                full
            };
            let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
            (
                start,
                AnimationSpec::tween(millis, state.config.easing),
                state.runtime.clone(),
            )
        };
        log::debug!("dismiss playback {outcome:?} over {}ms", spec.duration_millis);

        let playback = Animatable::new(start, runtime);
        let weak = Rc::downgrade(&self.inner);
        playback.set_on_update(move |progress| {
            if let Some(inner) = weak.upgrade() {
                Self::apply(&inner, *progress);
            }
        });
        self.inner.borrow_mut().playback = Some(playback.clone());

        let weak = Rc::downgrade(&self.inner);
        let completion: Completion = Box::new(completion);
        playback.animate_to(outcome.target_progress(), spec, move |_| {
            Self::teardown(weak, context, outcome, completion);
        });
    }

    fn teardown(
        weak: Weak<RefCell<AnimatorState>>,
        context: TransitionContext,
        outcome: TransitionOutcome,
        completion: Completion,
    ) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let cancelled = outcome.is_cancelled();
        let (dimming, hold, runtime) = {
            let mut state = inner.borrow_mut();
            state.playback = None;
            if cancelled {
                if let Some(corner) = state.corner.take() {
                    corner.stop();
                }
                if let Some(snapshot) = state.snapshot.take() {
                    snapshot.set_corner_radius(state.base_corner_radius);
                    snapshot.remove_from_superview();
                }
                if let Some(view) = &state.screen_view {
                    view.set_hidden(false);
                }
            }
            let hold = !cancelled && state.config.style == TransitionStyle::Scale;
            (state.dimming.take(), hold, state.runtime.clone())
        };

        let Some(dimming) = dimming else {
            Self::complete(&weak, &context, outcome, completion);
            return;
        };
        if !hold {
            dimming.remove_from_superview();
            Self::complete(&weak, &context, outcome, completion);
            return;
        }

        if !runtime.is_alive() {
            dimming.remove_from_superview();
            Self::complete(&weak, &context, outcome, completion);
            return;
        }
        runtime.post_delayed(SCALE_DIMMING_HOLD, move || {
            dimming.remove_from_superview();
            Self::complete(&weak, &context, outcome, completion);
        });
    }

    fn complete(
        weak: &Weak<RefCell<AnimatorState>>,
        context: &TransitionContext,
        outcome: TransitionOutcome,
        completion: Completion,
    ) {
        context.complete_transition(!outcome.is_cancelled());
        if let Some(inner) = weak.upgrade() {
            let corner = {
                let mut state = inner.borrow_mut();
                if let Some(snapshot) = state.snapshot.take() {
                    snapshot.remove_from_superview();
                }
                if let Some(view) = state.screen_view.take() {
                    view.set_hidden(false);
                    view.set_frame(state.base_frame);
                }
                state.dimming = None;
                state.prepared = false;
                state.running = false;
                state.playing_interactive = None;
                state.visual_progress = 0.0;
                state.corner.take()
            };
            if let Some(corner) = corner {
                corner.stop();
            }
        }
        log::debug!("dismiss {outcome:?} completed");
        completion(outcome);
    }
}

#[cfg(test)]
#[path = "tests/animator_tests.rs"]
mod tests;
