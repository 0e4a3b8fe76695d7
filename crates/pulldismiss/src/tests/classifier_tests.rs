use super::*;

fn sample(phase: GesturePhase, ty: f32, vx: f32, vy: f32) -> GestureSample {
    GestureSample::new(phase, Point::new(0.0, ty), Point::new(vx, vy))
}

fn active_classifier(origin_y: f32) -> GestureClassifier {
    let mut classifier = GestureClassifier::new(DismissThresholds::default());
    classifier.activate(Point::new(0.0, origin_y));
    classifier
}

#[test]
fn slow_or_sideways_drags_never_start() {
    let mut classifier = GestureClassifier::new(DismissThresholds::default());
    let gate = StartGate::open();

    let slow = sample(GesturePhase::Began, 2.0, 0.0, 5.0);
    assert_eq!(classifier.on_sample(&slow, 800.0, &gate), GestureDecision::Ignored);

    let sideways = sample(GesturePhase::Changed, 4.0, 200.0, 150.0);
    assert_eq!(classifier.on_sample(&sideways, 800.0, &gate), GestureDecision::Ignored);

    let upward = sample(GesturePhase::Changed, -4.0, 0.0, -300.0);
    assert_eq!(classifier.on_sample(&upward, 800.0, &gate), GestureDecision::Ignored);
    assert!(!classifier.is_active());
}

#[test]
fn a_fast_downward_drag_is_a_start_candidate() {
    let mut classifier = GestureClassifier::new(DismissThresholds::default());
    let began = sample(GesturePhase::Began, 6.0, 3.0, 400.0);

    let decision = classifier.on_sample(&began, 800.0, &StartGate::open());

    assert_eq!(
        decision,
        GestureDecision::StartCandidate {
            translation: Point::new(0.0, 6.0)
        }
    );
    assert!(!classifier.is_active(), "activation waits for the caller");
}

#[test]
fn each_closed_gate_blocks_the_start() {
    let began = sample(GesturePhase::Began, 6.0, 0.0, 400.0);
    let closed = [
        StartGate {
            scroll_blocking: true,
            ..StartGate::open()
        },
        StartGate {
            screen_eligible: false,
            ..StartGate::open()
        },
        StartGate {
            scroll_at_rest: false,
            ..StartGate::open()
        },
        StartGate {
            animation_idle: false,
            ..StartGate::open()
        },
    ];
    for gate in closed {
        let mut classifier = GestureClassifier::new(DismissThresholds::default());
        assert_eq!(
            classifier.on_sample(&began, 800.0, &gate),
            GestureDecision::Ignored,
            "{gate:?}"
        );
    }
}

#[test]
fn progress_tracks_translation_past_the_origin() {
    let mut classifier = active_classifier(10.0);
    let gate = StartGate::open();

    let decision = classifier.on_sample(&sample(GesturePhase::Changed, 210.0, 0.0, 50.0), 800.0, &gate);

    assert_eq!(decision, GestureDecision::Progress(0.25));
    assert_eq!(classifier.progress(), 0.25);
    assert_eq!(
        classifier.state(),
        TransitionState::Active {
            origin: Point::new(0.0, 10.0)
        }
    );
}

#[test]
fn progress_is_clamped_to_one() {
    let mut classifier = active_classifier(0.0);
    let decision = classifier.on_sample(
        &sample(GesturePhase::Changed, 5000.0, 0.0, 50.0),
        800.0,
        &StartGate::open(),
    );
    assert_eq!(decision, GestureDecision::Progress(1.0));
}

#[test]
fn returning_to_the_origin_cancels_implicitly() {
    let mut classifier = active_classifier(20.0);
    let gate = StartGate::open();
    classifier.on_sample(&sample(GesturePhase::Changed, 120.0, 0.0, 50.0), 800.0, &gate);

    let decision = classifier.on_sample(&sample(GesturePhase::Changed, 5.0, 0.0, -80.0), 800.0, &gate);

    assert_eq!(decision, GestureDecision::ImplicitCancel);
    assert!(!classifier.is_active());
    assert_eq!(classifier.progress(), 0.0);
}

#[test]
fn zero_height_views_do_not_divide_by_zero() {
    let mut classifier = active_classifier(0.0);
    let decision = classifier.on_sample(
        &sample(GesturePhase::Changed, 0.5, 0.0, 50.0),
        0.0,
        &StartGate::open(),
    );
    assert_eq!(decision, GestureDecision::Progress(0.5));
}

#[test]
fn release_past_the_fraction_finishes_even_with_zero_velocity() {
    let mut classifier = active_classifier(0.0);
    let gate = StartGate::open();
    classifier.on_sample(&sample(GesturePhase::Changed, 300.0, 0.0, 0.0), 800.0, &gate);

    let decision = classifier.on_sample(&sample(GesturePhase::Ended, 300.0, 0.0, 0.0), 800.0, &gate);

    assert_eq!(decision, GestureDecision::Ended { finished: true });
    assert!(!classifier.is_active());
}

#[test]
fn upward_release_past_the_fraction_cancels() {
    let mut classifier = active_classifier(0.0);
    let gate = StartGate::open();
    classifier.on_sample(&sample(GesturePhase::Changed, 400.0, 0.0, 10.0), 800.0, &gate);

    let decision =
        classifier.on_sample(&sample(GesturePhase::Ended, 400.0, 0.0, -20.0), 800.0, &gate);

    assert_eq!(decision, GestureDecision::Ended { finished: false });
}

#[test]
fn a_flick_needs_both_speed_and_distance() {
    let gate = StartGate::open();

    let mut short_flick = active_classifier(0.0);
    short_flick.on_sample(&sample(GesturePhase::Changed, 50.0, 0.0, 2000.0), 800.0, &gate);
    assert_eq!(
        short_flick.on_sample(&sample(GesturePhase::Ended, 50.0, 0.0, 2000.0), 800.0, &gate),
        GestureDecision::Ended { finished: false }
    );

    let mut long_flick = active_classifier(0.0);
    long_flick.on_sample(&sample(GesturePhase::Changed, 90.0, 0.0, 1300.0), 800.0, &gate);
    assert_eq!(
        long_flick.on_sample(&sample(GesturePhase::Ended, 90.0, 0.0, 1300.0), 800.0, &gate),
        GestureDecision::Ended { finished: true }
    );
}

#[test]
fn cancelled_gestures_never_finish() {
    let mut classifier = active_classifier(0.0);
    let gate = StartGate::open();
    classifier.on_sample(&sample(GesturePhase::Changed, 700.0, 0.0, 3000.0), 800.0, &gate);

    let decision =
        classifier.on_sample(&sample(GesturePhase::Cancelled, 700.0, 0.0, 3000.0), 800.0, &gate);

    assert_eq!(decision, GestureDecision::Ended { finished: false });
}

#[test]
fn release_without_an_attempt_is_ignored() {
    let mut classifier = GestureClassifier::new(DismissThresholds::default());
    let decision = classifier.on_sample(
        &sample(GesturePhase::Ended, 500.0, 0.0, 3000.0),
        800.0,
        &StartGate::open(),
    );
    assert_eq!(decision, GestureDecision::Ignored);
}
