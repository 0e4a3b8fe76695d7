use std::fmt;

/// Why a request to the dismiss engine was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DismissError {
    /// An interactive attempt is running; the request would disturb it.
    AttemptInProgress,
    /// A dismiss animation is still playing.
    AnimationInFlight,
    /// The screen is gone or is not presented, so there is nothing to dismiss.
    NotPresented,
}

impl fmt::Display for DismissError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DismissError::AttemptInProgress => {
                write!(f, "a pull-to-dismiss attempt is in progress")
            }
            DismissError::AnimationInFlight => write!(f, "a dismiss animation is still running"),
            DismissError::NotPresented => write!(f, "screen is not presented"),
        }
    }
}

impl std::error::Error for DismissError {}
