//! Mood resolution.
//!
//! Once per tick the [`MoodEngine`] turns ledger contents into a new point on
//! the mood simplex:
//!
//! 1. **Impulse**: per-dimension push derived from ledger aggregates
//!    ([`impulse::compute`]).
//! 2. **Attractor**: `(personality − current) × attractor_strength`, a pull
//!    back toward the deity's baseline.
//! 3. **Hysteresis**: the summed delta is damped by `current × hysteresis`
//!    when positive and amplified by the same factor when negative.
//! 4. **Renormalization**: negatives clamped to zero, the vector rescaled to
//!    sum to 1 (uniform if nothing is left).
//!
//! Reads never mutate. The fuzzed read is a pure function of the current
//! vector, so it is stable until the next resolution.

pub mod impulse;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ledger::Ledger;
use crate::noise;
use crate::types::{Dimension, MoodVector, Precision};

/// Default stickiness coefficient.
pub const DEFAULT_HYSTERESIS: f64 = 0.3;
/// Default pull-back rate toward the personality.
pub const DEFAULT_ATTRACTOR_STRENGTH: f64 = 0.05;

/// Derives and holds a deity's live mood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEngine {
    personality: MoodVector,
    current: MoodVector,
    hysteresis: f64,
    attractor_strength: f64,
    last_resolved_tick: Option<u64>,
}

impl MoodEngine {
    /// Create an engine resting at its personality.
    ///
    /// The personality is renormalized; coefficients are clamped to `[0, 1]`.
    #[must_use]
    pub fn new(personality: MoodVector, hysteresis: f64, attractor_strength: f64) -> Self {
        let personality = personality.normalized();
        Self {
            personality,
            current: personality,
            hysteresis: unit_clamp(hysteresis),
            attractor_strength: unit_clamp(attractor_strength),
            last_resolved_tick: None,
        }
    }

    /// Advance the mood one step using the ledger's state at `tick`.
    ///
    /// Returns `false` without touching anything if `tick` was already
    /// resolved.
    pub fn resolve(&mut self, ledger: &Ledger, tick: u64) -> bool {
        if self.last_resolved_tick == Some(tick) {
            return false;
        }

        let impulse = impulse::compute(ledger);
        let mut next = *self.current.values();
        for dimension in Dimension::ALL {
            let current = self.current[dimension];
            let attractor = (self.personality[dimension] - current) * self.attractor_strength;
            let delta = impulse[dimension] + attractor;
            let damping = current * self.hysteresis;
            let effective = if delta > 0.0 {
                delta * (1.0 - damping)
            } else {
                delta * (1.0 + damping)
            };
            next[dimension.index()] = current + effective;
        }

        self.current = MoodVector::from_raw(next).normalized();
        self.last_resolved_tick = Some(tick);

        let (dominant, level) = self.current.dominant();
        debug!(
            tick,
            dominant = %dominant,
            level,
            entries = ledger.len(),
            "Mood resolved"
        );
        true
    }

    /// Read the mood.
    ///
    /// [`Precision::Exact`] returns a copy of the live vector.
    /// [`Precision::Fuzzed`] perturbs each dimension by a deterministic
    /// offset of at most ±0.02, clamps to `[0, 1]` and renormalizes.
    #[must_use]
    pub fn query(&self, precision: Precision) -> MoodVector {
        match precision {
            Precision::Exact => self.current,
            Precision::Fuzzed => fuzzed(&self.current),
        }
    }

    /// Strongest dimension of the exact vector and its value.
    #[must_use]
    pub fn dominant(&self) -> (Dimension, f64) {
        self.current.dominant()
    }

    /// Whether the exact value of `dimension` is above `threshold`.
    #[must_use]
    pub fn exceeds(&self, dimension: Dimension, threshold: f64) -> bool {
        self.current[dimension] > threshold
    }

    /// The baseline the mood drifts back to.
    #[must_use]
    pub fn personality(&self) -> MoodVector {
        self.personality
    }

    /// Stickiness coefficient.
    #[must_use]
    pub fn hysteresis(&self) -> f64 {
        self.hysteresis
    }

    /// Pull-back rate toward the personality.
    #[must_use]
    pub fn attractor_strength(&self) -> f64 {
        self.attractor_strength
    }

    /// Tick of the most recent resolution, if any.
    #[must_use]
    pub fn last_resolved_tick(&self) -> Option<u64> {
        self.last_resolved_tick
    }

    /// Re-establish invariants after deserialization from untrusted data.
    pub(crate) fn sanitize(&mut self) {
        self.personality = self.personality.normalized();
        self.current = self.current.normalized();
        self.hysteresis = unit_clamp(self.hysteresis);
        self.attractor_strength = unit_clamp(self.attractor_strength);
    }
}

impl Default for MoodEngine {
    fn default() -> Self {
        Self::new(MoodVector::UNIFORM, DEFAULT_HYSTERESIS, DEFAULT_ATTRACTOR_STRENGTH)
    }
}

fn fuzzed(vector: &MoodVector) -> MoodVector {
    let mut raw = *vector.values();
    for (i, value) in raw.iter_mut().enumerate() {
        *value = (*value + noise::fuzz_offset(*value, i)).clamp(0.0, 1.0);
    }
    MoodVector::from_raw(raw).normalized()
}

fn unit_clamp(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}
