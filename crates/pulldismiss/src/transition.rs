use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use pulldismiss_core::{ObservableProperty, RuntimeHandle};
use pulldismiss_ui::{
    DelegateId, GesturePhase, GestureRecognizer, GestureSample, RecognizerKind, Screen,
    ScrollView, TransitionContext, WeakScreen,
};

use crate::animator::{transition_duration, DismissAnimator, TransitionOutcome};
use crate::classifier::{GestureClassifier, GestureDecision, StartGate, TransitionState};
use crate::config::TransitionConfig;
use crate::driver::TransitionDriver;
use crate::error::DismissError;
use crate::observer::PullToDismissObserver;
use crate::scroll_coordinator::{ScrollCoordinator, ScrollLockState};

struct TransitionInner {
    id: DelegateId,
    runtime: RuntimeHandle,
    screen: WeakScreen,
    config: TransitionConfig,
    observer: RefCell<Option<Weak<dyn PullToDismissObserver>>>,
    classifier: RefCell<GestureClassifier>,
    scroll: ScrollCoordinator,
    driver: TransitionDriver,
    animator: DismissAnimator,
}

/// Interactive dismiss transition for one screen.
///
/// Feed it the samples of the recognizers from
/// [`gesture_recognizers_for_trigger`](Self::gesture_recognizers_for_trigger).
/// A fast downward drag starts an attempt, the drag distance drives the
/// progress, and the release decides whether the screen goes away or springs
/// back. The screen is held weakly; once it is gone every input is ignored.
#[derive(Clone)]
pub struct PullToDismissTransition {
    inner: Rc<TransitionInner>,
}

impl PullToDismissTransition {
    pub fn new(screen: &Screen, runtime: RuntimeHandle) -> Self {
        Self::with_config(screen, runtime, TransitionConfig::default())
    }

    pub fn with_config(screen: &Screen, runtime: RuntimeHandle, config: TransitionConfig) -> Self {
        let scroll = ScrollCoordinator::new(runtime.clone(), config.style, config.thresholds);
        let animator = DismissAnimator::new(runtime.clone(), config.clone());
        Self {
            inner: Rc::new(TransitionInner {
                id: DelegateId::next(),
                runtime,
                screen: screen.downgrade(),
                classifier: RefCell::new(GestureClassifier::new(config.thresholds)),
                config,
                observer: RefCell::new(None),
                scroll,
                driver: TransitionDriver::new(),
                animator,
            }),
        }
    }

    /// Identity used as the screen's transitioning delegate and as the owner
    /// of this transition's recognizers.
    pub fn delegate_id(&self) -> DelegateId {
        self.inner.id
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.inner.config
    }

    pub fn screen(&self) -> Option<Screen> {
        self.inner.screen.upgrade()
    }

    /// Registers `observer`, held weakly, replacing any previous one.
    pub fn set_observer<O: PullToDismissObserver + 'static>(&self, observer: &Rc<O>) {
        let observer: Weak<O> = Rc::downgrade(observer);
        let observer: Weak<dyn PullToDismissObserver> = observer;
        *self.inner.observer.borrow_mut() = Some(observer);
    }

    pub fn clear_observer(&self) {
        self.inner.observer.borrow_mut().take();
    }

    fn observer(&self) -> Option<Rc<dyn PullToDismissObserver>> {
        self.inner
            .observer
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
    }

    /// A fresh pan and long-press pair owned by this transition. Both
    /// recognize simultaneously with whatever else the host view has.
    pub fn gesture_recognizers_for_trigger(&self) -> [GestureRecognizer; 2] {
        [
            GestureRecognizer::new(RecognizerKind::Pan, self.inner.id),
            GestureRecognizer::new(RecognizerKind::LongPress, self.inner.id),
        ]
    }

    /// Extra pan recognizer for views the host wants to drive the dismiss from.
    pub fn additional_pan_recognizer(&self) -> GestureRecognizer {
        GestureRecognizer::new(RecognizerKind::Pan, self.inner.id)
    }

    /// Makes `scroll` the content area that competes with the dismiss drag.
    pub fn monitor_scroll_view(&self, scroll: &ScrollView) -> Result<(), DismissError> {
        if self.is_active() {
            log::warn!("cannot monitor a new scroll view during a dismiss attempt");
            return Err(DismissError::AttemptInProgress);
        }
        self.inner.scroll.attach(scroll);
        Ok(())
    }

    pub fn stop_monitoring_scroll_view(&self) -> Result<(), DismissError> {
        if self.is_active() {
            return Err(DismissError::AttemptInProgress);
        }
        self.inner.scroll.detach();
        Ok(())
    }

    pub fn monitored_scroll_view(&self) -> Option<ScrollView> {
        self.inner.scroll.monitored()
    }

    pub fn scroll_lock_state(&self) -> ScrollLockState {
        self.inner.scroll.lock_state()
    }

    pub fn state(&self) -> TransitionState {
        self.inner.classifier.borrow().state()
    }

    pub fn is_active(&self) -> bool {
        self.inner.classifier.borrow().is_active()
    }

    /// True while a release or programmatic dismiss animation plays.
    pub fn is_animating(&self) -> bool {
        self.inner.animator.is_running()
    }

    pub fn is_interactive(&self) -> bool {
        self.inner.driver.is_interactive()
    }

    /// Progress of the current attempt, for UI that wants to follow along.
    pub fn progress(&self) -> &ObservableProperty<f32> {
        self.inner.driver.progress_property()
    }

    pub fn percent_complete(&self) -> f32 {
        self.inner.driver.percent_complete()
    }

    /// Full playback length for the current attempt or the playback under way.
    pub fn transition_duration(&self) -> Duration {
        let interactive = self
            .inner
            .animator
            .playing_interactive()
            .unwrap_or_else(|| self.is_interactive());
        transition_duration(self.inner.config.style, interactive)
    }

    fn owns(&self, recognizer: &GestureRecognizer, kind: RecognizerKind) -> bool {
        recognizer.owner() == self.inner.id && recognizer.kind() == kind
    }

    /// Delivers one pan sample. Samples from recognizers this transition does
    /// not own, or that are no longer installed on a live view, are ignored.
    pub fn handle_pan(&self, recognizer: &GestureRecognizer, sample: GestureSample) {
        self.inner.runtime.assert_ui_thread();
        if !self.owns(recognizer, RecognizerKind::Pan) {
            log::trace!("ignoring pan from {recognizer:?}");
            return;
        }
        let Some(view) = recognizer.view() else {
            return;
        };
        let Some(screen) = self.screen() else {
            return;
        };

        self.inner.scroll.record_active_translation(
            sample.phase.is_tracking().then_some(sample.translation),
        );
        let gate = StartGate {
            scroll_blocking: self.inner.scroll.blocks_start(),
            screen_eligible: self.inner.config.permit_when_not_root
                || screen.is_root_of_navigation_stack(),
            scroll_at_rest: self.inner.scroll.is_at_rest(),
            animation_idle: !self.inner.animator.is_running(),
        };
        let decision = self
            .inner
            .classifier
            .borrow_mut()
            .on_sample(&sample, view.bounds().height, &gate);

        match decision {
            GestureDecision::Ignored => {}
            GestureDecision::StartCandidate { translation } => {
                let approved = self
                    .observer()
                    .map_or(true, |observer| observer.can_begin_pull_to_dismiss(&screen));
                if !approved {
                    log::debug!("observer declined pull-to-dismiss");
                    return;
                }
                self.inner.classifier.borrow_mut().activate(translation);
                self.begin_attempt(&screen);
            }
            GestureDecision::Progress(progress) => {
                let progress = self.inner.driver.update(progress);
                self.inner.animator.apply_progress(progress);
            }
            GestureDecision::ImplicitCancel => {
                log::debug!("drag returned to its origin");
                self.inner.driver.update(0.0);
                self.end_attempt(&screen, false);
            }
            GestureDecision::Ended { finished } => {
                self.inner.scroll.mark_transition_ended();
                self.end_attempt(&screen, finished);
            }
        }
    }

    /// Delivers the touch-down anchor. Only `Began` matters.
    pub fn handle_long_press(&self, recognizer: &GestureRecognizer, phase: GesturePhase) {
        if !self.owns(recognizer, RecognizerKind::LongPress) || recognizer.view().is_none() {
            return;
        }
        if phase == GesturePhase::Began {
            self.inner.scroll.on_touch_begin();
        }
    }

    fn begin_attempt(&self, screen: &Screen) {
        log::debug!("pull-to-dismiss began on {}", screen.title());
        if let Some(observer) = self.observer() {
            observer.did_begin_pull_to_dismiss(screen);
        }
        let context = screen.dismissal_context(true);
        if context.is_none() {
            log::debug!("{} is not presented; tracking without a transition", screen.title());
        }
        if let Some(context) = &context {
            self.inner.animator.prepare(context);
        }
        self.inner.driver.start(context);
    }

    /// Ends a running attempt unfinished, for when its recognizers go away
    /// before the release can arrive.
    pub(crate) fn abort_attempt(&self) {
        if !self.is_active() {
            return;
        }
        log::debug!("pull-to-dismiss attempt aborted");
        self.inner.classifier.borrow_mut().reset();
        self.inner.scroll.record_active_translation(None);
        match self.screen() {
            Some(screen) => self.end_attempt(&screen, false),
            None => {
                self.inner.driver.cancel();
            }
        }
    }

    fn end_attempt(&self, screen: &Screen, finished: bool) {
        log::debug!("pull-to-dismiss attempt ended (finished: {finished})");
        let (context, outcome) = if finished {
            (self.inner.driver.finish(), TransitionOutcome::Finish)
        } else {
            (self.inner.driver.cancel(), TransitionOutcome::Cancel)
        };
        if let Some(context) = context {
            self.play(context, outcome);
        }
        if let Some(observer) = self.observer() {
            observer.did_complete_pull_to_dismiss_attempt(screen, finished);
        }
    }

    fn play(&self, context: TransitionContext, outcome: TransitionOutcome) {
        let weak = Rc::downgrade(&self.inner);
        let dismissed = context.clone();
        self.inner.animator.run(context, outcome, move |_| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let transition = PullToDismissTransition { inner };
            let did_dismiss = dismissed
                .from_screen()
                .map_or(true, |screen| !screen.is_presented());
            let (Some(screen), Some(observer)) = (transition.screen(), transition.observer())
            else {
                return;
            };
            observer.did_finish_transition(&screen, did_dismiss);
        });
    }

    /// Plays a host-initiated dismissal inside `context`. A context the host
    /// already marked cancelled plays back to rest instead.
    pub fn animate_transition(&self, context: TransitionContext) {
        let outcome = if context.transition_was_cancelled() {
            TransitionOutcome::Cancel
        } else {
            TransitionOutcome::Finish
        };
        self.play(context, outcome);
    }

    /// Dismisses the screen without a gesture, using the short playback.
    pub fn dismiss_animated(&self) -> Result<(), DismissError> {
        self.inner.runtime.assert_ui_thread();
        if self.is_active() {
            return Err(DismissError::AttemptInProgress);
        }
        if self.is_animating() {
            return Err(DismissError::AnimationInFlight);
        }
        let context = self
            .screen()
            .and_then(|screen| screen.dismissal_context(false))
            .ok_or(DismissError::NotPresented)?;
        self.animate_transition(context);
        Ok(())
    }
}

impl fmt::Debug for PullToDismissTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PullToDismissTransition")
            .field("id", &self.inner.id)
            .field("style", &self.inner.config.style)
            .field("state", &self.state())
            .field("progress", &self.percent_complete())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/transition_tests.rs"]
mod tests;
