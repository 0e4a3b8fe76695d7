//! Turns raw drag samples into start, progress and release decisions.
//!
//! The classifier only computes. Callbacks, scroll bookkeeping and animation
//! are left to the caller, which acts on the returned [`GestureDecision`].

use pulldismiss_graphics::Point;
use pulldismiss_ui::{GesturePhase, GestureSample};

use crate::config::DismissThresholds;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionState {
    Inactive,
    /// An attempt is running. `origin` is the pan translation it started at.
    Active { origin: Point },
}

/// Facts from outside the gesture that gate the start of an attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartGate {
    /// A recent deep scroll still blocks starts.
    pub scroll_blocking: bool,
    /// The screen may be dismissed from its place in the navigation stack.
    pub screen_eligible: bool,
    /// The monitored scroll view sits at or above its rest offset.
    pub scroll_at_rest: bool,
    /// No earlier dismiss animation is still playing.
    pub animation_idle: bool,
}

impl StartGate {
    pub fn open() -> Self {
        Self {
            scroll_blocking: false,
            screen_eligible: true,
            scroll_at_rest: true,
            animation_idle: true,
        }
    }

    fn permits_start(&self) -> bool {
        !self.scroll_blocking && self.screen_eligible && self.scroll_at_rest && self.animation_idle
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureDecision {
    /// Nothing to do for this sample.
    Ignored,
    /// Everything local allows a start; the caller asks the observer and then
    /// calls [`GestureClassifier::activate`].
    StartCandidate { translation: Point },
    Progress(f32),
    /// The drag came back to where it started; the attempt is over, unfinished.
    ImplicitCancel,
    /// The finger lifted or the gesture was cancelled during an attempt.
    Ended { finished: bool },
}

#[derive(Debug)]
pub struct GestureClassifier {
    thresholds: DismissThresholds,
    state: TransitionState,
    progress: f32,
}

impl GestureClassifier {
    pub fn new(thresholds: DismissThresholds) -> Self {
        Self {
            thresholds,
            state: TransitionState::Inactive,
            progress: 0.0,
        }
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TransitionState::Active { .. })
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn on_sample(
        &mut self,
        sample: &GestureSample,
        view_height: f32,
        gate: &StartGate,
    ) -> GestureDecision {
        if sample.phase.is_tracking() {
            return match self.state {
                TransitionState::Active { origin } => self.track(sample, origin, view_height),
                TransitionState::Inactive => {
                    if self.qualifies_for_start(sample) && gate.permits_start() {
                        GestureDecision::StartCandidate {
                            translation: sample.translation,
                        }
                    } else {
                        GestureDecision::Ignored
                    }
                }
            };
        }

        if !self.is_active() {
            return GestureDecision::Ignored;
        }
        let finished = sample.phase == GesturePhase::Ended && self.should_finish(sample);
        self.reset();
        GestureDecision::Ended { finished }
    }

    /// Starts an attempt anchored at `origin` once the observer approved it.
    pub fn activate(&mut self, origin: Point) {
        debug_assert!(!self.is_active(), "attempt already active");
        self.state = TransitionState::Active { origin };
        self.progress = 0.0;
    }

    /// Drops an attempt without a release, e.g. when the host refused to
    /// hand out a transition context.
    pub fn reset(&mut self) {
        self.state = TransitionState::Inactive;
        self.progress = 0.0;
    }

    fn track(&mut self, sample: &GestureSample, origin: Point, view_height: f32) -> GestureDecision {
        let travelled = sample.translation.y - origin.y;
        let progress = (travelled / view_height.max(1.0)).clamp(0.0, 1.0);
        if progress == 0.0 {
            self.reset();
            return GestureDecision::ImplicitCancel;
        }
        self.progress = progress;
        GestureDecision::Progress(progress)
    }

    fn qualifies_for_start(&self, sample: &GestureSample) -> bool {
        let velocity = sample.velocity;
        velocity.y > self.thresholds.begin_velocity && velocity.y > velocity.x.abs()
    }

    fn should_finish(&self, sample: &GestureSample) -> bool {
        let thresholds = &self.thresholds;
        let past_threshold =
            self.progress >= thresholds.completion_fraction && sample.velocity.y >= 0.0;
        let flicked = sample.velocity.y >= thresholds.finish_velocity
            && sample.translation.y >= thresholds.minimum_finish_translation;
        past_threshold || flicked
    }
}

#[cfg(test)]
#[path = "tests/classifier_tests.rs"]
mod tests;
