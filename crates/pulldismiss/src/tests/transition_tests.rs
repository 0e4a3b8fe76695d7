use super::*;
use pulldismiss_core::Runtime;
use pulldismiss_graphics::{Point, Rect};
use pulldismiss_ui::View;

fn presented_screen() -> (View, Screen) {
    let window = View::new(Rect::new(0.0, 0.0, 390.0, 844.0));
    let screen = Screen::new("sheet", window.bounds());
    screen.present_in(&window);
    (window, screen)
}

fn fast_down(phase: GesturePhase, y: f32) -> GestureSample {
    GestureSample::new(phase, Point::new(0.0, y), Point::new(0.0, 600.0))
}

#[test]
fn trigger_recognizers_belong_to_the_transition() {
    let runtime = Runtime::default();
    let (_window, screen) = presented_screen();
    let transition = PullToDismissTransition::new(&screen, runtime.handle());

    let [pan, long_press] = transition.gesture_recognizers_for_trigger();

    assert_eq!(pan.kind(), RecognizerKind::Pan);
    assert_eq!(long_press.kind(), RecognizerKind::LongPress);
    assert_eq!(pan.owner(), transition.delegate_id());
    assert_eq!(long_press.owner(), transition.delegate_id());
}

#[test]
fn samples_from_foreign_or_detached_recognizers_change_nothing() {
    let runtime = Runtime::default();
    let (_window, screen) = presented_screen();
    let transition = PullToDismissTransition::new(&screen, runtime.handle());

    let foreign = GestureRecognizer::new(RecognizerKind::Pan, DelegateId::next());
    screen.view().add_gesture_recognizer(&foreign);
    transition.handle_pan(&foreign, fast_down(GesturePhase::Began, 5.0));
    assert!(!transition.is_active());

    let detached = transition.additional_pan_recognizer();
    transition.handle_pan(&detached, fast_down(GesturePhase::Began, 5.0));
    assert!(!transition.is_active());

    let [_, long_press] = transition.gesture_recognizers_for_trigger();
    screen.view().add_gesture_recognizer(&long_press);
    transition.handle_pan(&long_press, fast_down(GesturePhase::Began, 5.0));
    assert!(!transition.is_active());
}

#[test]
fn a_fast_downward_drag_starts_an_attempt() {
    let runtime = Runtime::default();
    let (_window, screen) = presented_screen();
    let transition = PullToDismissTransition::new(&screen, runtime.handle());
    let pan = transition.additional_pan_recognizer();
    screen.view().add_gesture_recognizer(&pan);

    transition.handle_pan(&pan, fast_down(GesturePhase::Began, 5.0));

    assert_eq!(
        transition.state(),
        TransitionState::Active {
            origin: Point::new(0.0, 5.0)
        }
    );
    assert!(transition.is_interactive());
    assert_eq!(transition.transition_duration(), Duration::from_millis(870));
}

#[test]
fn monitoring_is_refused_during_an_attempt() {
    let runtime = Runtime::default();
    let (_window, screen) = presented_screen();
    let transition = PullToDismissTransition::new(&screen, runtime.handle());
    let first = ScrollView::new(screen.view().bounds());
    transition.monitor_scroll_view(&first).expect("idle transition");
    let pan = transition.additional_pan_recognizer();
    screen.view().add_gesture_recognizer(&pan);
    transition.handle_pan(&pan, fast_down(GesturePhase::Began, 5.0));

    let second = ScrollView::new(screen.view().bounds());
    assert_eq!(
        transition.monitor_scroll_view(&second),
        Err(DismissError::AttemptInProgress)
    );
    assert_eq!(transition.monitored_scroll_view(), Some(first));
}

#[test]
fn programmatic_dismissal_needs_a_presented_screen() {
    let runtime = Runtime::default();
    let screen = Screen::new("loose", Rect::new(0.0, 0.0, 390.0, 844.0));
    let transition = PullToDismissTransition::new(&screen, runtime.handle());

    assert_eq!(transition.dismiss_animated(), Err(DismissError::NotPresented));
}

#[test]
fn programmatic_dismissal_refuses_to_overlap() {
    let runtime = Runtime::default();
    let (_window, screen) = presented_screen();
    let transition = PullToDismissTransition::new(&screen, runtime.handle());

    transition.dismiss_animated().expect("first dismissal");

    assert!(transition.is_animating());
    assert_eq!(transition.dismiss_animated(), Err(DismissError::AnimationInFlight));
}

#[test]
fn duration_follows_the_playback_after_release() {
    let runtime = Runtime::default();
    let (_window, screen) = presented_screen();
    let transition = PullToDismissTransition::new(&screen, runtime.handle());
    let pan = transition.additional_pan_recognizer();
    screen.view().add_gesture_recognizer(&pan);
    transition.handle_pan(&pan, fast_down(GesturePhase::Began, 5.0));
    transition.handle_pan(&pan, fast_down(GesturePhase::Changed, 400.0));

    transition.handle_pan(
        &pan,
        GestureSample::new(GesturePhase::Ended, Point::new(0.0, 400.0), Point::ZERO),
    );

    assert!(!transition.is_active());
    assert!(transition.is_animating());
    assert_eq!(transition.transition_duration(), Duration::from_millis(870));
}

#[test]
fn programmatic_playback_reports_the_short_duration() {
    let runtime = Runtime::default();
    let (_window, screen) = presented_screen();
    let transition = PullToDismissTransition::new(&screen, runtime.handle());

    transition.dismiss_animated().expect("presented");

    assert_eq!(transition.transition_duration(), Duration::from_millis(300));
}

#[test]
fn a_host_context_marked_cancelled_plays_back_to_rest() {
    let runtime = Runtime::default();
    let (_window, screen) = presented_screen();
    let transition = PullToDismissTransition::new(&screen, runtime.handle());
    let context = screen.dismissal_context(false).expect("presented");
    context.cancel_interactive_transition();

    transition.animate_transition(context.clone());
    runtime.handle().drain_frame_callbacks(16_000_000);
    runtime.handle().drain_frame_callbacks(1_000_000_000);

    assert_eq!(context.completed_with(), Some(false));
    assert!(screen.is_presented());
    assert!(!screen.view().is_hidden());
}

#[derive(Default)]
struct CountingObserver {
    begins: std::cell::Cell<u32>,
}

impl PullToDismissObserver for CountingObserver {
    fn did_begin_pull_to_dismiss(&self, _screen: &Screen) {
        self.begins.set(self.begins.get() + 1);
    }
}

#[test]
fn observers_are_held_weakly() {
    let runtime = Runtime::default();
    let (_window, screen) = presented_screen();
    let transition = PullToDismissTransition::new(&screen, runtime.handle());
    let pan = transition.additional_pan_recognizer();
    screen.view().add_gesture_recognizer(&pan);
    let observer = Rc::new(CountingObserver::default());
    transition.set_observer(&observer);

    transition.handle_pan(&pan, fast_down(GesturePhase::Began, 5.0));
    assert_eq!(observer.begins.get(), 1);
    assert_eq!(Rc::strong_count(&observer), 1);

    drop(observer);
    transition.handle_pan(&pan, fast_down(GesturePhase::Cancelled, 5.0));
    assert!(!transition.is_active());
}
