use crate::foundation::error::{FlaretimeError, FlaretimeResult};

pub use kurbo::{CubicBez, Point};

/// The looping CSS animation timeline that generated keyframes are laid out on.
///
/// Keyframe positions are percentages of one loop; trigger times are seconds
/// into the loop.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimTimeline {
    pub duration_secs: f64,
}

impl AnimTimeline {
    pub fn new(duration_secs: f64) -> FlaretimeResult<Self> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(FlaretimeError::validation(
                "AnimTimeline duration_secs must be finite and > 0",
            ));
        }
        Ok(Self { duration_secs })
    }

    /// Keyframe percentage for a trigger time in seconds.
    pub fn percent_of(self, secs: f64) -> f64 {
        secs / self.duration_secs * 100.0
    }

    /// Trigger time in seconds for a keyframe percentage.
    pub fn secs_of(self, percent: f64) -> f64 {
        percent / 100.0 * self.duration_secs
    }

    /// Clamp a trigger time into the timeline.
    pub fn clamp_secs(self, secs: f64) -> f64 {
        secs.clamp(0.0, self.duration_secs)
    }
}
