//! # NUMEN Core Library
//!
//! Mood simulation for game deities.
//!
//! Every deity gets a [`Deity`] that remembers what was done to it and how
//! long ago, and derives a mood from that history:
//!
//! - **Ledger** keeps an append-only record of offerings, prayers, world
//!   actions, desecrations and neglect, weighted by half-life decay
//! - **Mood** is a point on a six-dimension simplex (wrath, serenity,
//!   hunger, amusement, sorrow, chaos) with hysteresis and a pull back
//!   toward the deity's personality
//! - **Predictor** guesses the caller's next move, so surprises delight
//!   and routine bores
//! - **Notifications** tell the host about ticks, mood shifts, crossed
//!   thresholds, utterances, neglect and surprises
//!
//! Everything is deterministic: the same calls in the same order give the
//! same mood, bit for bit.
//!
//! ## Performance Contract
//!
//! - Recording an event: O(1)
//! - Resolving a tick: O(ledger length)
//! - Mood reads: O(1), no allocation

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod decay;
pub mod deity;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod mood;
pub mod noise;
pub mod notify;
pub mod predictor;
pub mod snapshot;
pub mod types;

pub use config::NumenConfig;
pub use deity::{Deity, DeityProfile};
pub use entry::{
    Desecration, EventDetails, EventKind, LedgerEntry, Neglect, NeglectReason, Offering, Prayer,
    WorldAction,
};
pub use error::NumenError;
pub use ledger::Ledger;
pub use mood::MoodEngine;
pub use notify::{Notification, NotificationRegistry, SubscriptionId, TriggerKind};
pub use predictor::{FrequencyPredictor, NullPredictor, Prediction, Predictor};
pub use snapshot::DeitySnapshot;
pub use types::*;
