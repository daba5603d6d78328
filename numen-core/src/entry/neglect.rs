//! Neglect markers, recorded by the engine, never by callers.

use serde::{Deserialize, Serialize};

/// Why a neglect marker was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeglectReason {
    /// Nobody has addressed the deity for longer than the neglect threshold.
    Idle,
    /// The caller has become entirely predictable; the deity is bored.
    Predictable,
}

impl NeglectReason {
    /// Short tag, also used as the variety discriminator.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Predictable => "predictable",
        }
    }
}

/// A neglect marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neglect {
    /// What triggered it.
    pub reason: NeglectReason,
}

impl Neglect {
    /// A marker with the given reason.
    #[must_use]
    pub const fn new(reason: NeglectReason) -> Self {
        Self { reason }
    }
}
