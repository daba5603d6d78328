//! Configuration for a NUMEN deity.
//!
//! Maps directly to `numen.toml`. Every field has a default, so an empty file
//! (or no file) yields a neutral deity with the stock coefficients.
//!
//! Numeric values are never rejected: out-of-range coefficients are clamped
//! when the deity is built.

use serde::{Deserialize, Serialize};

use crate::ledger::DEFAULT_HALF_LIFE;
use crate::mood::{DEFAULT_ATTRACTOR_STRENGTH, DEFAULT_HYSTERESIS};
use crate::predictor::DEFAULT_WINDOW;
use crate::types::{Alignment, Dimension, MoodVector};

/// Top-level NUMEN configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumenConfig {
    /// Identity and temperament of the deity.
    #[serde(default)]
    pub deity: DeityConfig,
    /// Ledger decay settings.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Mood resolution coefficients.
    #[serde(default)]
    pub mood: MoodConfig,
    /// Neglect detection.
    #[serde(default)]
    pub neglect: NeglectConfig,
    /// Notification thresholds and chances.
    #[serde(default)]
    pub events: EventConfig,
    /// Player-behaviour predictor.
    #[serde(default)]
    pub predictor: PredictorConfig,
}

impl NumenConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `NumenError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::NumenError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Identity and temperament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeityConfig {
    /// Display name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Moral alignment, used to appraise aligned offerings.
    #[serde(default)]
    pub alignment: Alignment,
    /// Baseline mood. Unspecified dimensions share the remaining mass.
    #[serde(default)]
    pub personality: PersonalityConfig,
}

impl Default for DeityConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            alignment: Alignment::default(),
            personality: PersonalityConfig::default(),
        }
    }
}

/// Partial baseline mood, one optional value per dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalityConfig {
    /// Baseline wrath.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrath: Option<f64>,
    /// Baseline serenity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serenity: Option<f64>,
    /// Baseline hunger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hunger: Option<f64>,
    /// Baseline amusement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amusement: Option<f64>,
    /// Baseline sorrow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorrow: Option<f64>,
    /// Baseline chaos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chaos: Option<f64>,
}

impl PersonalityConfig {
    /// Set one dimension.
    #[must_use]
    pub fn with(mut self, dimension: Dimension, value: f64) -> Self {
        let slot = match dimension {
            Dimension::Wrath => &mut self.wrath,
            Dimension::Serenity => &mut self.serenity,
            Dimension::Hunger => &mut self.hunger,
            Dimension::Amusement => &mut self.amusement,
            Dimension::Sorrow => &mut self.sorrow,
            Dimension::Chaos => &mut self.chaos,
        };
        *slot = Some(value);
        self
    }

    /// Resolve into a normalized baseline vector.
    #[must_use]
    pub fn to_vector(&self) -> MoodVector {
        let partial: Vec<(Dimension, f64)> = [
            (Dimension::Wrath, self.wrath),
            (Dimension::Serenity, self.serenity),
            (Dimension::Hunger, self.hunger),
            (Dimension::Amusement, self.amusement),
            (Dimension::Sorrow, self.sorrow),
            (Dimension::Chaos, self.chaos),
        ]
        .into_iter()
        .filter_map(|(d, v)| v.map(|v| (d, v)))
        .collect();
        MoodVector::from_partial(&partial)
    }
}

/// Ledger decay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Ticks for an entry's weight to halve.
    #[serde(default = "default_half_life")]
    pub half_life_ticks: f64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            half_life_ticks: DEFAULT_HALF_LIFE,
        }
    }
}

/// Mood resolution coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodConfig {
    /// Stickiness, `[0, 1]`.
    #[serde(default = "default_hysteresis")]
    pub hysteresis: f64,
    /// Pull-back rate toward the personality, `[0, 1]`.
    #[serde(default = "default_attractor_strength")]
    pub attractor_strength: f64,
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            hysteresis: DEFAULT_HYSTERESIS,
            attractor_strength: DEFAULT_ATTRACTOR_STRENGTH,
        }
    }
}

/// Neglect detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeglectConfig {
    /// Ticks without a direct interaction after which every tick records a
    /// neglect marker.
    #[serde(default = "default_neglect_threshold")]
    pub threshold_ticks: u64,
}

impl Default for NeglectConfig {
    fn default() -> Self {
        Self {
            threshold_ticks: default_neglect_threshold(),
        }
    }
}

/// One watched cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Dimension to watch.
    pub dimension: Dimension,
    /// Exact-vector value whose crossing fires a notification.
    pub cutoff: f64,
}

/// Notification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    /// Probability per tick that the deity utters something, `[0, 1]`.
    #[serde(default = "default_utterance_chance")]
    pub utterance_chance: f64,
    /// Cutoffs watched for crossings.
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<ThresholdConfig>,
}

impl EventConfig {
    /// Clamp the utterance chance into `[0, 1]`; NaN disables utterances.
    pub(crate) fn sanitize(&mut self) {
        self.utterance_chance = if self.utterance_chance.is_nan() {
            0.0
        } else {
            self.utterance_chance.clamp(0.0, 1.0)
        };
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            utterance_chance: default_utterance_chance(),
            thresholds: default_thresholds(),
        }
    }
}

/// Predictor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Use the frequency predictor; `false` selects the null predictor.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Consecutive correct predictions before the caller is "predictable".
    #[serde(default = "default_window")]
    pub window: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window: DEFAULT_WINDOW,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_name() -> String { "Unnamed".to_string() }
fn default_half_life() -> f64 { DEFAULT_HALF_LIFE }
fn default_hysteresis() -> f64 { DEFAULT_HYSTERESIS }
fn default_attractor_strength() -> f64 { DEFAULT_ATTRACTOR_STRENGTH }
fn default_neglect_threshold() -> u64 { 20 }
fn default_utterance_chance() -> f64 { 0.1 }
fn default_window() -> usize { DEFAULT_WINDOW }
fn default_thresholds() -> Vec<ThresholdConfig> {
    vec![
        ThresholdConfig { dimension: Dimension::Wrath, cutoff: 0.4 },
        ThresholdConfig { dimension: Dimension::Hunger, cutoff: 0.4 },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = NumenConfig::from_toml("").expect("parse");
        assert_eq!(config, NumenConfig::default());
        assert_eq!(config.neglect.threshold_ticks, 20);
        assert!(config.predictor.enabled);
    }

    #[test]
    fn partial_toml_overrides_only_what_it_names() {
        let config = NumenConfig::from_toml(
            r#"
            [deity]
            name = "Oshun"
            alignment = "lawful"

            [deity.personality]
            serenity = 0.3
            wrath = 0.1

            [mood]
            hysteresis = 0.5

            [events]
            thresholds = [{ dimension = "chaos", cutoff = 0.25 }]
            "#,
        )
        .expect("parse");

        assert_eq!(config.deity.name, "Oshun");
        assert_eq!(config.deity.alignment, Alignment::Lawful);
        assert!((config.mood.hysteresis - 0.5).abs() < f64::EPSILON);
        assert!((config.mood.attractor_strength - DEFAULT_ATTRACTOR_STRENGTH).abs() < f64::EPSILON);
        assert_eq!(config.events.thresholds.len(), 1);
        assert_eq!(config.events.thresholds[0].dimension, Dimension::Chaos);

        let baseline = config.deity.personality.to_vector();
        assert!((baseline[Dimension::Serenity] - 0.3).abs() < 1e-12);
        assert!((baseline[Dimension::Chaos] - 0.15).abs() < 1e-12);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = NumenConfig::from_toml("[mood]\nhysteresis = \"sticky\"").expect_err("must fail");
        assert!(matches!(err, crate::NumenError::Config(_)));
    }

    #[test]
    fn unknown_dimension_in_thresholds_is_rejected() {
        assert!(NumenConfig::from_toml("[events]\nthresholds = [{ dimension = \"joy\", cutoff = 0.2 }]").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[ledger]\nhalf_life_ticks = 4.0").expect("write");
        let config = NumenConfig::from_file(file.path()).expect("load");
        assert!((config.ledger.half_life_ticks - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn personality_builder_sets_slots() {
        let p = PersonalityConfig::default().with(Dimension::Hunger, 0.7);
        assert_eq!(p.hunger, Some(0.7));
        assert!((p.to_vector()[Dimension::Hunger] - 0.7).abs() < 1e-12);
    }
}
