//! Prayers and desecrations: the caller addressing the deity directly,
//! for better or worse.

use serde::{Deserialize, Serialize};

/// A prayer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prayer {
    /// What was prayed for. Used as the variety discriminator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
}

impl Prayer {
    /// A prayer with a stated intent.
    #[must_use]
    pub fn new(intent: impl Into<String>) -> Self {
        Self {
            intent: Some(intent.into()),
        }
    }
}

/// A desecration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Desecration {
    /// Which shrine, idol or relic was defiled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
}

impl Desecration {
    /// A desecration of a named site.
    #[must_use]
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: Some(site.into()),
        }
    }
}
