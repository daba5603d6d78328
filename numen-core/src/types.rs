//! Core type definitions for the NUMEN mood engine.
//!
//! All types are serializable. The mood dimensions form a closed, ordered set
//! so a [`MoodVector`] always carries exactly six slots.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::NumenError;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Unique identifier for a deity aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeityId(pub Uuid);

impl DeityId {
    /// Create a new random deity ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DeityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Mood dimensions
// ---------------------------------------------------------------------------

/// Number of mood dimensions.
pub const DIMENSION_COUNT: usize = 6;

/// One axis of the deity's mood.
///
/// The declaration order is significant: it is the index order of
/// [`MoodVector`] and the tie-break order of [`MoodVector::dominant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Anger at the mortals.
    Wrath,
    /// Contentment, being well attended.
    Serenity,
    /// Appetite for offerings and attention.
    Hunger,
    /// Being entertained.
    Amusement,
    /// Grief, loneliness.
    Sorrow,
    /// Capriciousness, unpredictability.
    Chaos,
}

impl Dimension {
    /// All dimensions in index order.
    pub const ALL: [Self; DIMENSION_COUNT] = [
        Self::Wrath,
        Self::Serenity,
        Self::Hunger,
        Self::Amusement,
        Self::Sorrow,
        Self::Chaos,
    ];

    /// Slot of this dimension inside a [`MoodVector`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lower-case name, as used in config files and snapshots.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wrath => "wrath",
            Self::Serenity => "serenity",
            Self::Hunger => "hunger",
            Self::Amusement => "amusement",
            Self::Sorrow => "sorrow",
            Self::Chaos => "chaos",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = NumenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.name() == lower)
            .ok_or_else(|| NumenError::UnknownName {
                what: "mood dimension",
                name: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Mood vector
// ---------------------------------------------------------------------------

/// A point on the six-dimension mood simplex.
///
/// After [`normalized`](Self::normalized) every slot is in `[0, 1]` and the
/// slots sum to 1. Serialized as a map keyed by dimension name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "NamedMood", into = "NamedMood")]
pub struct MoodVector([f64; DIMENSION_COUNT]);

impl MoodVector {
    /// The uniform distribution across all dimensions.
    pub const UNIFORM: Self = Self([1.0 / DIMENSION_COUNT as f64; DIMENSION_COUNT]);

    /// Wrap raw values without normalizing them.
    #[must_use]
    pub const fn from_raw(values: [f64; DIMENSION_COUNT]) -> Self {
        Self(values)
    }

    /// Build a baseline from a partial assignment.
    ///
    /// Specified values are clamped to `[0, 1]`. Unspecified dimensions share
    /// whatever mass is left below 1 evenly. The result is normalized, so an
    /// assignment summing past 1 is scaled down rather than rejected.
    #[must_use]
    pub fn from_partial(partial: &[(Dimension, f64)]) -> Self {
        let mut values: [Option<f64>; DIMENSION_COUNT] = [None; DIMENSION_COUNT];
        for &(dimension, value) in partial {
            let v = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
            values[dimension.index()] = Some(v);
        }

        let specified: f64 = values.iter().flatten().sum();
        let unspecified = values.iter().filter(|v| v.is_none()).count();
        let share = if unspecified == 0 {
            0.0
        } else {
            (1.0 - specified).max(0.0) / unspecified as f64
        };

        Self(values.map(|v| v.unwrap_or(share))).normalized()
    }

    /// Value of one dimension.
    #[must_use]
    pub fn get(&self, dimension: Dimension) -> f64 {
        self.0[dimension.index()]
    }

    /// Raw slot values in [`Dimension::ALL`] order.
    #[must_use]
    pub const fn values(&self) -> &[f64; DIMENSION_COUNT] {
        &self.0
    }

    /// Iterate `(dimension, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.into_iter().zip(self.0.iter().copied())
    }

    /// Sum of all slots.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Project onto the simplex: negatives (and NaN) become 0, the rest is
    /// divided by the total. Falls back to [`Self::UNIFORM`] when nothing
    /// positive remains.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let clamped = self.0.map(|v| if v > 0.0 { v } else { 0.0 });
        let total: f64 = clamped.iter().sum();
        if total > 0.0 && total.is_finite() {
            Self(clamped.map(|v| v / total))
        } else {
            Self::UNIFORM
        }
    }

    /// The largest dimension and its value. Ties go to the dimension that
    /// comes first in [`Dimension::ALL`].
    #[must_use]
    pub fn dominant(&self) -> (Dimension, f64) {
        let mut best = (Dimension::ALL[0], self.0[0]);
        for (dimension, value) in self.iter().skip(1) {
            if value > best.1 {
                best = (dimension, value);
            }
        }
        best
    }
}

impl Default for MoodVector {
    fn default() -> Self {
        Self::UNIFORM
    }
}

impl Index<Dimension> for MoodVector {
    type Output = f64;

    fn index(&self, dimension: Dimension) -> &f64 {
        &self.0[dimension.index()]
    }
}

impl IndexMut<Dimension> for MoodVector {
    fn index_mut(&mut self, dimension: Dimension) -> &mut f64 {
        &mut self.0[dimension.index()]
    }
}

impl fmt::Display for MoodVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (dimension, value) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{dimension}={value:.3}")?;
            first = false;
        }
        Ok(())
    }
}

/// Serialized shape of a [`MoodVector`].
#[derive(Serialize, Deserialize)]
struct NamedMood {
    wrath: f64,
    serenity: f64,
    hunger: f64,
    amusement: f64,
    sorrow: f64,
    chaos: f64,
}

impl From<NamedMood> for MoodVector {
    fn from(m: NamedMood) -> Self {
        Self([m.wrath, m.serenity, m.hunger, m.amusement, m.sorrow, m.chaos])
    }
}

impl From<MoodVector> for NamedMood {
    fn from(v: MoodVector) -> Self {
        let [wrath, serenity, hunger, amusement, sorrow, chaos] = v.0;
        Self {
            wrath,
            serenity,
            hunger,
            amusement,
            sorrow,
            chaos,
        }
    }
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Moral alignment of a deity or of an offering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Order, law, tradition.
    Lawful,
    /// Neither; accepts anything at face value.
    #[default]
    Neutral,
    /// Disorder, freedom, whim.
    Chaotic,
}

impl Alignment {
    /// Whether `self` and `other` sit on opposite ends of the axis.
    #[must_use]
    pub fn opposes(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Lawful, Self::Chaotic) | (Self::Chaotic, Self::Lawful)
        )
    }

    /// Lower-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lawful => "lawful",
            Self::Neutral => "neutral",
            Self::Chaotic => "chaotic",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Alignment {
    type Err = NumenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lawful" => Ok(Self::Lawful),
            "neutral" => Ok(Self::Neutral),
            "chaotic" => Ok(Self::Chaotic),
            _ => Err(NumenError::UnknownName {
                what: "alignment",
                name: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Read precision
// ---------------------------------------------------------------------------

/// Which read path [`query`](crate::mood::MoodEngine::query) takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// Deterministically perturbed view. The only mode external consumers
    /// should rely on.
    #[default]
    Fuzzed,
    /// The exact internal vector.
    Exact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_personality_spreads_remaining_mass() {
        let v = MoodVector::from_partial(&[(Dimension::Serenity, 0.3), (Dimension::Wrath, 0.1)]);
        assert!((v.get(Dimension::Serenity) - 0.3).abs() < 1e-12);
        assert!((v.get(Dimension::Wrath) - 0.1).abs() < 1e-12);
        for d in [Dimension::Hunger, Dimension::Amusement, Dimension::Sorrow, Dimension::Chaos] {
            assert!((v.get(d) - 0.15).abs() < 1e-12);
        }
        assert!((v.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn oversized_personality_is_scaled_not_rejected() {
        let v = MoodVector::from_partial(&[
            (Dimension::Wrath, 0.9),
            (Dimension::Chaos, 0.9),
            (Dimension::Sorrow, 7.0),
        ]);
        assert!((v.sum() - 1.0).abs() < 1e-12);
        assert!(v.get(Dimension::Serenity).abs() < 1e-12);
        assert!((v.get(Dimension::Sorrow) - v.get(Dimension::Wrath) * (1.0 / 0.9)).abs() < 1e-9);
    }

    #[test]
    fn empty_personality_is_uniform() {
        assert_eq!(MoodVector::from_partial(&[]), MoodVector::UNIFORM);
    }

    #[test]
    fn normalizing_all_negative_falls_back_to_uniform() {
        let v = MoodVector::from_raw([-1.0, 0.0, -0.5, 0.0, -2.0, 0.0]).normalized();
        assert_eq!(v, MoodVector::UNIFORM);
    }

    #[test]
    fn normalizing_clamps_negatives() {
        let v = MoodVector::from_raw([-1.0, 1.0, 1.0, 0.0, 0.0, 2.0]).normalized();
        assert!(v.get(Dimension::Wrath).abs() < f64::EPSILON);
        assert!((v.get(Dimension::Chaos) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn dominant_ties_go_to_declaration_order() {
        let v = MoodVector::from_raw([0.1, 0.3, 0.3, 0.1, 0.1, 0.1]);
        assert_eq!(v.dominant().0, Dimension::Serenity);
        assert_eq!(MoodVector::UNIFORM.dominant().0, Dimension::Wrath);
    }

    #[test]
    fn dimension_parse_roundtrip() {
        for d in Dimension::ALL {
            assert_eq!(d.to_string().parse::<Dimension>().ok(), Some(d));
        }
        assert!("melancholy".parse::<Dimension>().is_err());
    }

    #[test]
    fn mood_vector_serializes_by_name() {
        let json = serde_json::to_value(MoodVector::UNIFORM).expect("serialize");
        assert!(json.get("serenity").is_some());
        assert!(json.get("chaos").is_some());
    }

    #[test]
    fn lawful_and_chaotic_oppose() {
        assert!(Alignment::Lawful.opposes(Alignment::Chaotic));
        assert!(!Alignment::Neutral.opposes(Alignment::Chaotic));
        assert!(!Alignment::Lawful.opposes(Alignment::Lawful));
    }
}
