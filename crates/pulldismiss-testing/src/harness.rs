use std::rc::Rc;

use pulldismiss::{PullToDismiss, PullToDismissTransition, TransitionConfig};
use pulldismiss_core::Runtime;
use pulldismiss_graphics::{Point, Rect};
use pulldismiss_ui::{
    GesturePhase, GestureRecognizer, GestureSample, RecognizerKind, Screen, ScrollView, View,
};

use crate::recording::RecordingObserver;

const FRAME_MILLIS: u64 = 16;
const NANOS_PER_MILLI: u64 = 1_000_000;

/// Speed used by the drag helpers: fast enough to start, slow enough not to flick.
const DRAG_VELOCITY: f32 = 400.0;

/// A window with one presented screen and pull-to-dismiss enabled on it.
///
/// Time only moves when [`advance`](Self::advance) is called; it pumps the
/// runtime in 16ms frames.
pub struct DismissHarness {
    runtime: Runtime,
    window: View,
    screen: Screen,
    navigation: Option<Screen>,
    transition: PullToDismissTransition,
    dismissable: PullToDismiss,
    observer: Rc<RecordingObserver>,
    pan: GestureRecognizer,
    long_press: GestureRecognizer,
}

impl DismissHarness {
    pub const WINDOW: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 390.0,
        height: 844.0,
    };

    pub fn new(config: TransitionConfig) -> Self {
        let screen = Screen::new("sheet", Self::WINDOW);
        Self::install(screen, None, config)
    }

    /// Like [`new`](Self::new), but the screen sits at the root of a
    /// presented navigation container.
    pub fn in_navigation(config: TransitionConfig) -> Self {
        let screen = Screen::new("list", Self::WINDOW);
        let navigation = Screen::navigation("navigation", &screen);
        Self::install(screen, Some(navigation), config)
    }

    /// The screen's root view is a scroll view the transition monitors.
    pub fn with_scroll_view(config: TransitionConfig) -> (Self, ScrollView) {
        let scroll = ScrollView::new(Self::WINDOW);
        let screen = Screen::with_view("feed", scroll.view().clone());
        let harness = Self::install(screen, None, config);
        if let Err(error) = harness.transition.monitor_scroll_view(&scroll) {
            panic!("fresh transition refused a scroll view: {error}");
        }
        (harness, scroll)
    }

    fn install(screen: Screen, navigation: Option<Screen>, config: TransitionConfig) -> Self {
        crate::init_test_logging();
        let runtime = Runtime::default();
        let window = View::new(Self::WINDOW);
        navigation.as_ref().unwrap_or(&screen).present_in(&window);

        let transition = PullToDismissTransition::with_config(&screen, runtime.handle(), config);
        let observer = Rc::new(RecordingObserver::new());
        transition.set_observer(&observer);
        let dismissable = PullToDismiss::new(&screen, transition.clone());
        dismissable.set_enabled(true);

        let root_view = navigation.as_ref().unwrap_or(&screen).view().clone();
        let pan = Self::installed(&root_view, &transition, RecognizerKind::Pan);
        let long_press = Self::installed(screen.view(), &transition, RecognizerKind::LongPress);

        Self {
            runtime,
            window,
            screen,
            navigation,
            transition,
            dismissable,
            observer,
            pan,
            long_press,
        }
    }

    fn installed(
        view: &View,
        transition: &PullToDismissTransition,
        kind: RecognizerKind,
    ) -> GestureRecognizer {
        view.gesture_recognizers()
            .into_iter()
            .find(|recognizer| {
                recognizer.owner() == transition.delegate_id() && recognizer.kind() == kind
            })
            .unwrap_or_else(|| panic!("no {kind:?} recognizer installed on {view:?}"))
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn window(&self) -> &View {
        &self.window
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn navigation(&self) -> Option<&Screen> {
        self.navigation.as_ref()
    }

    /// The screen that actually leaves on dismissal.
    pub fn presented(&self) -> &Screen {
        self.navigation.as_ref().unwrap_or(&self.screen)
    }

    pub fn transition(&self) -> &PullToDismissTransition {
        &self.transition
    }

    pub fn dismissable(&self) -> &PullToDismiss {
        &self.dismissable
    }

    pub fn observer(&self) -> &RecordingObserver {
        &self.observer
    }

    pub fn pan_recognizer(&self) -> &GestureRecognizer {
        &self.pan
    }

    pub fn long_press_recognizer(&self) -> &GestureRecognizer {
        &self.long_press
    }

    pub fn pan(&self, phase: GesturePhase, translation: Point, velocity: Point) {
        self.transition
            .handle_pan(&self.pan, GestureSample::new(phase, translation, velocity));
    }

    /// Finger down and a fast first movement straight down.
    pub fn begin_drag(&self) {
        self.pan(
            GesturePhase::Began,
            Point::new(0.0, 2.0),
            Point::new(0.0, DRAG_VELOCITY),
        );
    }

    pub fn drag_to(&self, translation_y: f32) {
        self.pan(
            GesturePhase::Changed,
            Point::new(0.0, translation_y),
            Point::new(0.0, DRAG_VELOCITY),
        );
    }

    pub fn release(&self, translation_y: f32, velocity_y: f32) {
        self.pan(
            GesturePhase::Ended,
            Point::new(0.0, translation_y),
            Point::new(0.0, velocity_y),
        );
    }

    pub fn cancel_gesture(&self, translation_y: f32) {
        self.pan(
            GesturePhase::Cancelled,
            Point::new(0.0, translation_y),
            Point::new(0.0, DRAG_VELOCITY),
        );
    }

    pub fn touch_down(&self) {
        self.transition
            .handle_long_press(&self.long_press, GesturePhase::Began);
    }

    pub fn now_millis(&self) -> u64 {
        self.runtime.handle().now_nanos() / NANOS_PER_MILLI
    }

    /// Moves time forward by `millis`, draining a frame every 16ms and once
    /// more at the end.
    pub fn advance(&self, millis: u64) {
        let handle = self.runtime.handle();
        let end = self.now_millis() + millis;
        let mut now = self.now_millis();
        while now < end {
            now = (now + FRAME_MILLIS).min(end);
            handle.drain_frame_callbacks(now * NANOS_PER_MILLI);
        }
    }

    /// Pumps frames until no animation or timer is pending, up to `limit_millis`.
    pub fn settle(&self, limit_millis: u64) {
        let handle = self.runtime.handle();
        let deadline = self.now_millis() + limit_millis;
        while handle.has_pending_work() && self.now_millis() < deadline {
            self.advance(FRAME_MILLIS);
        }
    }
}
