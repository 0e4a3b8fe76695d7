use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::screen::{Screen, WeakScreen};
use crate::view::View;

struct ContextInner {
    container: View,
    from: WeakScreen,
    interactive: bool,
    cancelled: Cell<bool>,
    completions: Cell<u32>,
    completed_with: Cell<Option<bool>>,
}

/// What the host hands an animator for one dismissal: the container view the
/// transition plays in, the screen being dismissed, and the completion sink.
#[derive(Clone)]
pub struct TransitionContext {
    inner: Rc<ContextInner>,
}

impl TransitionContext {
    pub fn new(container: View, from: &Screen, interactive: bool) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                container,
                from: from.downgrade(),
                interactive,
                cancelled: Cell::new(false),
                completions: Cell::new(0),
                completed_with: Cell::new(None),
            }),
        }
    }

    pub fn container_view(&self) -> &View {
        &self.inner.container
    }

    /// The screen being dismissed, unless it has been dropped meanwhile.
    pub fn from_screen(&self) -> Option<Screen> {
        self.inner.from.upgrade()
    }

    pub fn is_interactive(&self) -> bool {
        self.inner.interactive
    }

    pub fn transition_was_cancelled(&self) -> bool {
        self.inner.cancelled.get()
    }

    /// Marks an interactive transition as heading back to where it started.
    pub fn cancel_interactive_transition(&self) {
        self.inner.cancelled.set(true);
    }

    /// Marks an interactive transition as heading to completion.
    pub fn finish_interactive_transition(&self) {
        self.inner.cancelled.set(false);
    }

    /// Ends the transition. With `did_complete` the from-screen leaves the
    /// presentation chain; otherwise it stays where it was.
    pub fn complete_transition(&self, did_complete: bool) {
        let completions = self.inner.completions.get() + 1;
        self.inner.completions.set(completions);
        if completions > 1 {
            log::warn!("transition completed {completions} times");
        }
        self.inner.completed_with.set(Some(did_complete));
        if did_complete {
            if let Some(from) = self.from_screen() {
                from.complete_dismissal();
            }
        }
    }

    pub fn completion_count(&self) -> u32 {
        self.inner.completions.get()
    }

    /// The argument of the last `complete_transition` call.
    pub fn completed_with(&self) -> Option<bool> {
        self.inner.completed_with.get()
    }
}

impl fmt::Debug for TransitionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionContext")
            .field("container", &self.inner.container.id())
            .field("interactive", &self.inner.interactive)
            .field("cancelled", &self.inner.cancelled.get())
            .field("completions", &self.inner.completions.get())
            .finish()
    }
}
