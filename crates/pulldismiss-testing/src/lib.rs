//! Testing utilities for pulldismiss: a presented screen in a window with a
//! transition installed, a frame pump, and an observer that records every
//! callback.

mod harness;
mod recording;

pub use harness::DismissHarness;
pub use recording::{ObserverEvent, RecordingObserver};

/// Routes `log` output through the test harness. Safe to call from every test.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub mod prelude {
    pub use crate::{init_test_logging, DismissHarness, ObserverEvent, RecordingObserver};
    pub use pulldismiss::prelude::*;
    pub use pulldismiss_graphics::prelude::*;
    pub use pulldismiss_ui::GesturePhase;
}
