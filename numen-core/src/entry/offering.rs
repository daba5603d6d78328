//! Offerings: gifts placed before the deity.
//!
//! The raw `value` says how much the gift is worth in general; the
//! `effective_value` says how much it is worth to *this* deity, taking
//! alignment into account. Only the latter drives mood.

use serde::{Deserialize, Serialize};

use crate::types::Alignment;

/// Value assumed when the caller does not specify one.
pub const DEFAULT_OFFERING_VALUE: f64 = 0.3;

/// Multiplier for an offering whose alignment matches the deity's.
pub const ALIGNED_BONUS: f64 = 1.2;

/// An offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offering {
    /// Item name, if any. Used as the variety discriminator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    /// Intrinsic worth, clamped to `[0, 1]`.
    pub value: f64,
    /// Alignment of the gift itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    /// Worth to the receiving deity. Negative for insulting gifts.
    pub effective_value: f64,
    /// Injected by the engine (predictor surprise), not given by a caller.
    #[serde(default)]
    pub synthetic: bool,
}

impl Offering {
    /// A plain offering of default value.
    #[must_use]
    pub fn new() -> Self {
        Self {
            item: None,
            value: DEFAULT_OFFERING_VALUE,
            alignment: None,
            effective_value: DEFAULT_OFFERING_VALUE,
            synthetic: false,
        }
    }

    /// The synthetic offering recorded when the caller does something the
    /// predictor did not expect. Carries no value of its own.
    #[must_use]
    pub fn surprise() -> Self {
        Self {
            item: None,
            value: 0.0,
            alignment: None,
            effective_value: 0.0,
            synthetic: true,
        }
    }

    /// Set the item name.
    #[must_use]
    pub fn item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    /// Set the intrinsic value (clamped to `[0, 1]`, NaN treated as default).
    #[must_use]
    pub fn value(mut self, value: f64) -> Self {
        self.value = clamp_value(value);
        self.effective_value = self.value;
        self
    }

    /// Set the alignment of the gift.
    #[must_use]
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Compute `effective_value` as seen by a deity of the given alignment.
    ///
    /// Opposing alignment turns the gift into an insult (negative value);
    /// matching, non-neutral alignment earns a bonus.
    #[must_use]
    pub fn appraised_by(mut self, deity: Alignment) -> Self {
        self.sanitize();
        if self.synthetic {
            return self;
        }
        self.effective_value = match self.alignment {
            Some(gift) if gift.opposes(deity) => -self.value,
            Some(gift) if gift == deity && gift != Alignment::Neutral => self.value * ALIGNED_BONUS,
            _ => self.value,
        };
        self
    }

    /// Pull `value` back into `[0, 1]` and `effective_value` into the range
    /// an appraisal of that value can produce.
    pub(crate) fn sanitize(&mut self) {
        self.value = clamp_value(self.value);
        let floor = -self.value;
        let ceiling = self.value * ALIGNED_BONUS;
        self.effective_value = if self.effective_value.is_nan() {
            self.value
        } else {
            self.effective_value.clamp(floor, ceiling)
        };
    }
}

impl Default for Offering {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_value(value: f64) -> f64 {
    if value.is_nan() {
        DEFAULT_OFFERING_VALUE
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_clamped() {
        assert!((Offering::new().value(4.0).value - 1.0).abs() < f64::EPSILON);
        assert!(Offering::new().value(-1.0).value.abs() < f64::EPSILON);
        assert!((Offering::new().value(f64::NAN).value - DEFAULT_OFFERING_VALUE).abs() < f64::EPSILON);
    }

    #[test]
    fn unspecified_value_defaults_mid_low() {
        let o = Offering::new().appraised_by(Alignment::Lawful);
        assert!((o.effective_value - DEFAULT_OFFERING_VALUE).abs() < f64::EPSILON);
    }

    #[test]
    fn opposing_alignment_insults() {
        let o = Offering::new()
            .value(0.9)
            .alignment(Alignment::Chaotic)
            .appraised_by(Alignment::Lawful);
        assert!((o.effective_value + 0.9).abs() < 1e-12);
    }

    #[test]
    fn matching_alignment_earns_bonus() {
        let o = Offering::new()
            .value(0.5)
            .alignment(Alignment::Lawful)
            .appraised_by(Alignment::Lawful);
        assert!((o.effective_value - 0.6).abs() < 1e-12);

        let neutral = Offering::new()
            .value(0.5)
            .alignment(Alignment::Neutral)
            .appraised_by(Alignment::Neutral);
        assert!((neutral.effective_value - 0.5).abs() < 1e-12);
    }

    #[test]
    fn surprise_offerings_stay_worthless() {
        let o = Offering::surprise().appraised_by(Alignment::Chaotic);
        assert!(o.synthetic);
        assert!(o.effective_value.abs() < f64::EPSILON);
    }

    #[test]
    fn hand_built_offerings_are_pulled_into_range() {
        let mut o = Offering {
            value: 7.0,
            effective_value: 7.0,
            ..Offering::new()
        };
        o.sanitize();
        assert!((o.value - 1.0).abs() < f64::EPSILON);
        assert!((o.effective_value - ALIGNED_BONUS).abs() < f64::EPSILON);

        let appraised = Offering {
            value: 9.0,
            effective_value: 9.0,
            ..Offering::new()
        }
        .appraised_by(Alignment::Neutral);
        assert!((appraised.effective_value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn synthetic_offerings_stay_at_zero_after_sanitize() {
        let mut o = Offering {
            effective_value: 3.0,
            ..Offering::surprise()
        };
        o.sanitize();
        assert!(o.effective_value.abs() < f64::EPSILON);
    }
}
