//! Serializable image of a deity.
//!
//! A snapshot carries everything needed to resume a deity where it left off:
//! its profile, notification settings, the full ledger, the mood engine and
//! the learned state of the built-in predictor. Listeners are runtime-only
//! and are not captured.

use serde::{Deserialize, Serialize};

use crate::config::EventConfig;
use crate::deity::DeityProfile;
use crate::error::{NumenError, Result};
use crate::ledger::Ledger;
use crate::mood::MoodEngine;
use crate::predictor::FrequencyPredictor;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Persistable state of one deity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeitySnapshot {
    /// Format version the snapshot was written with.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Identity and temperament.
    pub profile: DeityProfile,
    /// Notification settings.
    pub events: EventConfig,
    /// Complete event history and clock.
    pub ledger: Ledger,
    /// Personality, live mood and coefficients.
    pub mood: MoodEngine,
    /// Learned predictor state. Absent for a disabled or custom predictor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictor: Option<FrequencyPredictor>,
}

impl DeitySnapshot {
    /// Encode as JSON.
    ///
    /// # Errors
    /// Returns [`NumenError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| NumenError::Serialization(e.to_string()))
    }

    /// Decode from JSON, re-establishing numeric invariants on the way in.
    ///
    /// # Errors
    /// Returns [`NumenError::Serialization`] if the input is not a valid
    /// snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut snapshot: Self =
            serde_json::from_str(json).map_err(|e| NumenError::Serialization(e.to_string()))?;
        snapshot.sanitize();
        Ok(snapshot)
    }

    pub(crate) fn sanitize(&mut self) {
        self.ledger.sanitize();
        self.mood.sanitize();
        self.events.sanitize();
        if let Some(predictor) = &mut self.predictor {
            predictor.sanitize();
        }
    }
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}
