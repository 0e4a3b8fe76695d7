use std::cell::{Cell, RefCell};

use pulldismiss::PullToDismissObserver;
use pulldismiss_ui::Screen;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObserverEvent {
    CanBegin,
    DidBegin,
    DidCompleteAttempt { finished: bool },
    DidFinishTransition { did_dismiss: bool },
}

/// Observer that remembers every callback in order. Begins are approved
/// unless [`set_allow_begin`](Self::set_allow_begin) says otherwise.
pub struct RecordingObserver {
    events: RefCell<Vec<ObserverEvent>>,
    allow_begin: Cell<bool>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
            allow_begin: Cell::new(true),
        }
    }

    pub fn set_allow_begin(&self, allow: bool) {
        self.allow_begin.set(allow);
    }

    pub fn events(&self) -> Vec<ObserverEvent> {
        self.events.borrow().clone()
    }

    /// Events other than `CanBegin` queries.
    pub fn lifecycle(&self) -> Vec<ObserverEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|event| **event != ObserverEvent::CanBegin)
            .cloned()
            .collect()
    }

    pub fn count(&self, event: &ObserverEvent) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|recorded| *recorded == event)
            .count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn record(&self, event: ObserverEvent) {
        log::trace!("observer: {event:?}");
        self.events.borrow_mut().push(event);
    }
}

impl Default for RecordingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl PullToDismissObserver for RecordingObserver {
    fn can_begin_pull_to_dismiss(&self, _screen: &Screen) -> bool {
        self.record(ObserverEvent::CanBegin);
        self.allow_begin.get()
    }

    fn did_begin_pull_to_dismiss(&self, _screen: &Screen) {
        self.record(ObserverEvent::DidBegin);
    }

    fn did_complete_pull_to_dismiss_attempt(&self, _screen: &Screen, finished: bool) {
        self.record(ObserverEvent::DidCompleteAttempt { finished });
    }

    fn did_finish_transition(&self, _screen: &Screen, did_dismiss: bool) {
        self.record(ObserverEvent::DidFinishTransition { did_dismiss });
    }
}
