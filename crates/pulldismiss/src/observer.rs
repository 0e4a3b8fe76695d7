use pulldismiss_ui::Screen;

/// Receives the lifecycle of pull-to-dismiss attempts.
///
/// Every hook has a default, so implementors override only what they need.
/// The engine holds its observer weakly; callbacks arrive on the UI queue
/// with no engine state borrowed, so they may call back into the engine.
pub trait PullToDismissObserver {
    /// Asked once per attempt, after the gesture qualified. Returning `false`
    /// vetoes the attempt.
    fn can_begin_pull_to_dismiss(&self, _screen: &Screen) -> bool {
        true
    }

    fn did_begin_pull_to_dismiss(&self, _screen: &Screen) {}

    /// The finger lifted. `finished` tells whether the release committed.
    fn did_complete_pull_to_dismiss_attempt(&self, _screen: &Screen, _finished: bool) {}

    /// The release animation ended and the host was told the outcome.
    fn did_finish_transition(&self, _screen: &Screen, _did_dismiss: bool) {}
}
