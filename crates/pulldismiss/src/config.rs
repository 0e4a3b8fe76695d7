use std::time::Duration;

use pulldismiss_animation::Easing;

use crate::gesture_constants::{
    BEGIN_VELOCITY_THRESHOLD, COMPLETION_FRACTION_THRESHOLD, FINISH_VELOCITY_THRESHOLD,
    MINIMUM_FINISH_TRANSLATION, SCROLL_REENABLE_DELAY, STILL_TOUCH_DELAY,
};

/// How the dismissing screen leaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionStyle {
    /// A snapshot slides down while the live view stays hidden underneath.
    #[default]
    SlideStatic,
    /// The live view itself slides down.
    SlideDynamic,
    /// A snapshot shrinks toward its centre and fades out.
    Scale,
}

impl TransitionStyle {
    pub fn slides(self) -> bool {
        matches!(self, TransitionStyle::SlideStatic | TransitionStyle::SlideDynamic)
    }

    pub fn uses_snapshot(self) -> bool {
        !matches!(self, TransitionStyle::SlideDynamic)
    }
}

/// Numbers that decide when a drag starts, how it maps to progress and
/// whether a release commits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DismissThresholds {
    pub begin_velocity: f32,
    pub completion_fraction: f32,
    pub finish_velocity: f32,
    pub minimum_finish_translation: f32,
    pub scroll_reenable_delay: Duration,
    pub still_touch_delay: Duration,
}

impl Default for DismissThresholds {
    fn default() -> Self {
        Self {
            begin_velocity: BEGIN_VELOCITY_THRESHOLD,
            completion_fraction: COMPLETION_FRACTION_THRESHOLD,
            finish_velocity: FINISH_VELOCITY_THRESHOLD,
            minimum_finish_translation: MINIMUM_FINISH_TRANSLATION,
            scroll_reenable_delay: SCROLL_REENABLE_DELAY,
            still_touch_delay: STILL_TOUCH_DELAY,
        }
    }
}

/// Per-transition configuration, fixed at construction.
///
/// ```
/// use pulldismiss::{TransitionConfig, TransitionStyle};
///
/// let config = TransitionConfig::new(TransitionStyle::Scale).with_dimming(false);
/// assert_eq!(config.style, TransitionStyle::Scale);
/// assert!(!config.dimming);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionConfig {
    pub style: TransitionStyle,
    /// Curve for the release animation. Dragging maps progress linearly.
    pub easing: Easing,
    /// Whether a dimming layer covers the screen underneath.
    pub dimming: bool,
    /// Lets screens pushed deeper than the root of a navigation stack start a dismiss.
    pub permit_when_not_root: bool,
    pub thresholds: DismissThresholds,
}

impl TransitionConfig {
    pub fn new(style: TransitionStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_dimming(mut self, dimming: bool) -> Self {
        self.dimming = dimming;
        self
    }

    pub fn permit_when_not_root(mut self, permit: bool) -> Self {
        self.permit_when_not_root = permit;
        self
    }

    pub fn with_thresholds(mut self, thresholds: DismissThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            style: TransitionStyle::default(),
            easing: Easing::EaseInOut,
            dimming: true,
            permit_when_not_root: false,
            thresholds: DismissThresholds::default(),
        }
    }
}
