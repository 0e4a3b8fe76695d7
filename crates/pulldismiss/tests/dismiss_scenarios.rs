use std::cell::RefCell;
use std::rc::Rc;

use pulldismiss::{PullToDismissTransition, TransitionConfig, TransitionStyle};
use pulldismiss_core::Runtime;
use pulldismiss_graphics::{Color, Point, Rect};
use pulldismiss_testing::{DismissHarness, ObserverEvent};
use pulldismiss_ui::{GesturePhase, GestureSample, Screen, ScrollView, View};

fn slide() -> TransitionConfig {
    TransitionConfig::new(TransitionStyle::SlideStatic)
}

fn scale() -> TransitionConfig {
    TransitionConfig::new(TransitionStyle::Scale)
}

#[test]
fn dragging_past_the_fraction_and_letting_go_dismisses() {
    let harness = DismissHarness::new(slide());

    harness.begin_drag();
    assert!(harness.transition().is_active());
    harness.drag_to(402.0);
    assert!((harness.transition().percent_complete() - 400.0 / 844.0).abs() < 1e-5);
    harness.release(402.0, 0.0);

    assert!(!harness.transition().is_active());
    assert_eq!(
        harness.observer().events(),
        vec![
            ObserverEvent::CanBegin,
            ObserverEvent::DidBegin,
            ObserverEvent::DidCompleteAttempt { finished: true },
        ]
    );

    harness.settle(2000);

    assert_eq!(
        harness.observer().lifecycle().last(),
        Some(&ObserverEvent::DidFinishTransition { did_dismiss: true })
    );
    assert!(!harness.screen().is_presented());
    assert!(harness.window().subviews().is_empty());
}

#[test]
fn a_short_slow_drag_springs_back() {
    let harness = DismissHarness::new(slide());

    harness.begin_drag();
    harness.drag_to(200.0);
    harness.release(200.0, 100.0);
    harness.settle(2000);

    assert_eq!(
        harness.observer().lifecycle(),
        vec![
            ObserverEvent::DidBegin,
            ObserverEvent::DidCompleteAttempt { finished: false },
            ObserverEvent::DidFinishTransition { did_dismiss: false },
        ]
    );
    assert!(harness.screen().is_presented());
    assert!(!harness.screen().view().is_hidden());
    assert_eq!(harness.window().subviews(), vec![harness.screen().view().clone()]);
}

#[test]
fn a_long_enough_flick_dismisses_early() {
    let harness = DismissHarness::new(slide());

    harness.begin_drag();
    harness.drag_to(100.0);
    harness.release(100.0, 1500.0);

    assert_eq!(
        harness.observer().count(&ObserverEvent::DidCompleteAttempt { finished: true }),
        1
    );
}

#[test]
fn a_flick_that_barely_moved_is_not_enough() {
    let harness = DismissHarness::new(slide());

    harness.begin_drag();
    harness.drag_to(60.0);
    harness.release(60.0, 1500.0);

    assert_eq!(
        harness.observer().count(&ObserverEvent::DidCompleteAttempt { finished: false }),
        1
    );
}

#[test]
fn a_cancelled_gesture_always_cancels() {
    let harness = DismissHarness::new(slide());

    harness.begin_drag();
    harness.drag_to(700.0);
    harness.cancel_gesture(700.0);
    harness.settle(2000);

    assert!(harness.screen().is_presented());
    assert_eq!(
        harness.observer().count(&ObserverEvent::DidFinishTransition { did_dismiss: false }),
        1
    );
}

#[test]
fn dragging_back_to_the_start_ends_the_attempt() {
    let harness = DismissHarness::new(slide());

    harness.begin_drag();
    harness.drag_to(100.0);
    harness.drag_to(2.0);

    assert!(!harness.transition().is_active());
    assert_eq!(
        harness.observer().lifecycle(),
        vec![
            ObserverEvent::DidBegin,
            ObserverEvent::DidCompleteAttempt { finished: false },
        ]
    );

    harness.release(2.0, 0.0);
    harness.settle(2000);
    assert_eq!(
        harness.observer().count(&ObserverEvent::DidCompleteAttempt { finished: false }),
        1,
        "a release after the implicit cancel reports nothing"
    );
    assert!(harness.screen().is_presented());
}

#[test]
fn the_observer_can_veto_a_start() {
    let harness = DismissHarness::new(slide());
    harness.observer().set_allow_begin(false);

    harness.begin_drag();
    harness.drag_to(300.0);
    harness.release(300.0, 0.0);

    assert!(!harness.transition().is_active());
    assert!(harness.observer().lifecycle().is_empty());
    assert_eq!(harness.observer().count(&ObserverEvent::CanBegin), 2);
    assert_eq!(harness.window().subviews().len(), 1);
}

#[test]
fn begin_and_end_stay_paired_over_repeated_attempts() {
    let harness = DismissHarness::new(slide());

    for _ in 0..3 {
        harness.begin_drag();
        harness.drag_to(150.0);
        harness.release(150.0, 0.0);
        harness.settle(2000);
    }

    let observer = harness.observer();
    assert_eq!(observer.count(&ObserverEvent::DidBegin), 3);
    assert_eq!(
        observer.count(&ObserverEvent::DidCompleteAttempt { finished: false }),
        3
    );
    assert_eq!(
        observer.count(&ObserverEvent::DidFinishTransition { did_dismiss: false }),
        3
    );
}

#[test]
fn no_new_attempt_while_the_release_animation_plays() {
    let harness = DismissHarness::new(slide());
    harness.begin_drag();
    harness.drag_to(300.0);
    harness.release(300.0, -10.0);

    harness.begin_drag();
    assert!(!harness.transition().is_active());
    assert!(harness.transition().is_animating());

    harness.settle(2000);
    harness.begin_drag();
    assert!(harness.transition().is_active());
}

#[test]
fn disabling_mid_drag_springs_back_and_frees_the_transition() {
    let harness = DismissHarness::new(slide());
    harness.begin_drag();
    harness.drag_to(300.0);

    harness.dismissable().set_enabled(false);
    harness.release(300.0, 0.0);
    harness.settle(3000);

    assert!(!harness.transition().is_active());
    assert!(!harness.screen().view().is_hidden());
    assert_eq!(harness.window().subviews(), vec![harness.screen().view().clone()]);
    assert_eq!(
        harness.observer().lifecycle(),
        vec![
            ObserverEvent::DidBegin,
            ObserverEvent::DidCompleteAttempt { finished: false },
            ObserverEvent::DidFinishTransition { did_dismiss: false },
        ]
    );
    assert_eq!(
        harness
            .transition()
            .monitor_scroll_view(&ScrollView::new(DismissHarness::WINDOW)),
        Ok(())
    );

    harness.dismissable().set_enabled(true);
    assert_eq!(harness.transition().dismiss_animated(), Ok(()));
}

#[test]
fn dismissing_from_a_navigation_root_removes_the_container() {
    let harness = DismissHarness::in_navigation(slide());
    let navigation = harness.navigation().expect("navigation").clone();

    harness.begin_drag();
    harness.drag_to(500.0);
    harness.release(500.0, 50.0);
    harness.settle(2000);

    assert!(!navigation.is_presented());
    assert_eq!(
        harness.observer().lifecycle().last(),
        Some(&ObserverEvent::DidFinishTransition { did_dismiss: true })
    );
}

#[test]
fn screens_deeper_in_the_stack_need_permission() {
    let window = View::new(DismissHarness::WINDOW);
    let root = Screen::new("root", DismissHarness::WINDOW);
    let navigation = Screen::navigation("navigation", &root);
    navigation.present_in(&window);
    let detail = Screen::new("detail", DismissHarness::WINDOW);
    navigation.push(&detail);
    let began = GestureSample::new(
        GesturePhase::Began,
        Point::new(0.0, 3.0),
        Point::new(0.0, 500.0),
    );

    for (permit, expected) in [(false, false), (true, true)] {
        let runtime = Runtime::default();
        let transition = PullToDismissTransition::with_config(
            &detail,
            runtime.handle(),
            slide().permit_when_not_root(permit),
        );
        let pan = transition.additional_pan_recognizer();
        navigation.view().add_gesture_recognizer(&pan);

        transition.handle_pan(&pan, began);

        assert_eq!(transition.is_active(), expected, "permit: {permit}");
        navigation.view().remove_gesture_recognizer(&pan);
    }
}

#[test]
fn scale_finish_holds_the_dimming_then_dismisses() {
    let harness = DismissHarness::new(scale());

    harness.begin_drag();
    harness.drag_to(500.0);
    let snapshot = harness
        .window()
        .subviews()
        .into_iter()
        .find(|view| view.snapshot_source().is_some())
        .expect("snapshot");
    assert!(harness.screen().view().is_hidden());
    assert!(snapshot.alpha() < 0.5);
    assert!(snapshot.frame().width < DismissHarness::WINDOW.width);
    harness.release(500.0, 0.0);

    // Playback covers the remaining ~41% of 300ms; the hold adds 200ms.
    harness.advance(160);
    let dimming = harness
        .window()
        .subviews()
        .into_iter()
        .find(|view| view.background() == Some(Color::BLACK))
        .expect("dimming still up");
    assert!((dimming.alpha() - 0.87).abs() < 1e-6);
    assert!(harness.screen().is_presented());
    assert_eq!(
        harness
            .observer()
            .count(&ObserverEvent::DidFinishTransition { did_dismiss: true }),
        0
    );

    harness.advance(250);

    assert!(!harness.screen().is_presented());
    assert!(harness.window().subviews().is_empty());
    assert_eq!(
        harness.observer().lifecycle(),
        vec![
            ObserverEvent::DidBegin,
            ObserverEvent::DidCompleteAttempt { finished: true },
            ObserverEvent::DidFinishTransition { did_dismiss: true },
        ]
    );
}

#[test]
fn scale_cancel_puts_the_screen_back() {
    let harness = DismissHarness::new(scale());

    harness.begin_drag();
    harness.drag_to(200.0);
    harness.release(200.0, -50.0);
    harness.settle(2000);

    let view = harness.screen().view();
    assert!(!view.is_hidden());
    assert_eq!(view.corner_radius(), 0.0);
    assert_eq!(view.frame(), DismissHarness::WINDOW);
    assert_eq!(harness.window().subviews(), vec![view.clone()]);
    assert_eq!(
        harness.observer().lifecycle().last(),
        Some(&ObserverEvent::DidFinishTransition { did_dismiss: false })
    );
}

#[test]
fn programmatic_dismissal_reports_only_the_finish() {
    let harness = DismissHarness::new(slide());

    harness
        .transition()
        .dismiss_animated()
        .expect("screen is presented");
    harness.advance(200);
    assert!(harness.screen().is_presented());
    harness.settle(2000);

    assert!(!harness.screen().is_presented());
    assert_eq!(
        harness.observer().events(),
        vec![ObserverEvent::DidFinishTransition { did_dismiss: true }]
    );
}

#[test]
fn progress_is_observable() {
    let harness = DismissHarness::new(slide());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _subscription = harness
        .transition()
        .progress()
        .subscribe(move |progress| sink.borrow_mut().push(*progress));

    harness.begin_drag();
    harness.drag_to(213.0);
    harness.drag_to(424.0);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0], 0.0);
    assert!((seen[1] - 0.25).abs() < 1e-6);
    assert!((seen[2] - 0.5).abs() < 1e-6);
}

#[test]
fn dynamic_slide_moves_the_screen_itself() {
    let harness = DismissHarness::new(TransitionConfig::new(TransitionStyle::SlideDynamic));

    harness.begin_drag();
    harness.drag_to(424.0);

    assert_eq!(
        harness.screen().view().frame(),
        Rect::new(0.0, 422.0, 390.0, 844.0)
    );
    assert!(harness
        .window()
        .subviews()
        .iter()
        .all(|view| view.snapshot_source().is_none()));
}
