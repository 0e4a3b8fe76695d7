use std::cell::{Cell, RefCell};

use pulldismiss_core::ObservableProperty;
use pulldismiss_ui::TransitionContext;

/// Percent-driven interaction controller: holds the progress of the current
/// attempt and forwards the final verdict to the host's transition context.
///
/// Methods take `&self` so progress observers may read the driver while it
/// publishes.
pub struct TransitionDriver {
    progress: ObservableProperty<f32>,
    context: RefCell<Option<TransitionContext>>,
    interactive: Cell<bool>,
}

impl TransitionDriver {
    pub fn new() -> Self {
        Self {
            progress: ObservableProperty::new(0.0),
            context: RefCell::new(None),
            interactive: Cell::new(false),
        }
    }

    /// Begins an interactive attempt. `context` is `None` when the host had
    /// nothing to dismiss; progress is still tracked.
    pub fn start(&self, context: Option<TransitionContext>) {
        *self.context.borrow_mut() = context;
        self.interactive.set(true);
        self.progress.set(0.0);
    }

    /// Publishes a new progress value, clamped to `[0, 1]`.
    pub fn update(&self, progress: f32) -> f32 {
        let progress = progress.clamp(0.0, 1.0);
        self.progress.set(progress);
        progress
    }

    /// Ends the interactive phase heading to completion and hands back the
    /// context for playback.
    pub fn finish(&self) -> Option<TransitionContext> {
        let context = self.end();
        if let Some(context) = &context {
            context.finish_interactive_transition();
        }
        context
    }

    pub fn cancel(&self) -> Option<TransitionContext> {
        let context = self.end();
        if let Some(context) = &context {
            context.cancel_interactive_transition();
        }
        context
    }

    fn end(&self) -> Option<TransitionContext> {
        self.interactive.set(false);
        self.context.borrow_mut().take()
    }

    pub fn percent_complete(&self) -> f32 {
        self.progress.get()
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive.get()
    }

    pub fn context(&self) -> Option<TransitionContext> {
        self.context.borrow().clone()
    }

    pub fn progress_property(&self) -> &ObservableProperty<f32> {
        &self.progress
    }
}

impl Default for TransitionDriver {
    fn default() -> Self {
        Self::new()
    }
}
