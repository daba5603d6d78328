//! World actions: deeds done in the world that the deity has an opinion on.

use serde::{Deserialize, Serialize};

/// Magnitude assumed when the caller does not specify one.
pub const DEFAULT_MAGNITUDE: f64 = 0.5;

/// A world action. Its signed impact on the deity is `favor × magnitude`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldAction {
    /// What was acted upon. Used as the variety discriminator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// How big the deed was, `[0, 1]`.
    pub magnitude: f64,
    /// How the deity regards it, `-1` (abhorrent) to `+1` (pleasing).
    pub favor: f64,
}

impl WorldAction {
    /// A neutral action of default magnitude.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: None,
            magnitude: DEFAULT_MAGNITUDE,
            favor: 0.0,
        }
    }

    /// Set the target.
    #[must_use]
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the magnitude (clamped to `[0, 1]`).
    #[must_use]
    pub fn magnitude(mut self, magnitude: f64) -> Self {
        self.magnitude = clamp_magnitude(magnitude);
        self
    }

    /// Set the favor (clamped to `[-1, 1]`).
    #[must_use]
    pub fn favor(mut self, favor: f64) -> Self {
        self.favor = clamp_favor(favor);
        self
    }

    /// Signed impact before decay.
    #[must_use]
    pub fn impact(&self) -> f64 {
        self.favor * self.magnitude
    }

    /// Re-apply the builder clamps to hand-built or deserialized values.
    pub(crate) fn sanitize(&mut self) {
        self.magnitude = clamp_magnitude(self.magnitude);
        self.favor = clamp_favor(self.favor);
    }
}

impl Default for WorldAction {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_magnitude(magnitude: f64) -> f64 {
    if magnitude.is_nan() {
        DEFAULT_MAGNITUDE
    } else {
        magnitude.clamp(0.0, 1.0)
    }
}

fn clamp_favor(favor: f64) -> f64 {
    if favor.is_nan() { 0.0 } else { favor.clamp(-1.0, 1.0) }
}
