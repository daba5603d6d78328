//! The ledger: append-only, time-decayed record of everything that happened
//! to a deity.
//!
//! Writes are O(1): an entry is stamped with the current tick and pushed.
//! Decay is never applied in place; each aggregate query recomputes weights
//! against the current tick (see [`crate::decay`]). Entries are never pruned,
//! since [`Ledger::variety`] and long-horizon weighted counts depend on the
//! whole history.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::decay::{half_life_weight, sanitize_half_life};
use crate::entry::{EventDetails, EventKind, LedgerEntry};

/// Default half-life in ticks.
pub const DEFAULT_HALF_LIFE: f64 = 10.0;

/// Append-only event log with lazy half-life decay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    current_tick: u64,
    half_life: f64,
}

impl Ledger {
    /// Create an empty ledger at tick 0.
    #[must_use]
    pub fn new(half_life: f64) -> Self {
        Self {
            entries: Vec::new(),
            current_tick: 0,
            half_life: sanitize_half_life(half_life),
        }
    }

    /// Append an entry stamped with the current tick.
    ///
    /// Numeric fields are clamped on the way in, whatever way the payload
    /// was built.
    pub fn record(&mut self, details: impl Into<EventDetails>) {
        let mut details = details.into();
        details.sanitize();
        trace!(
            tick = self.current_tick,
            kind = %details.kind(),
            synthetic = details.is_synthetic(),
            "Ledger entry recorded"
        );
        self.entries.push(LedgerEntry {
            tick: self.current_tick,
            details,
        });
    }

    /// Move the clock forward `n` ticks. Stored entries are untouched.
    pub fn advance_tick(&mut self, n: u64) {
        self.current_tick = self.current_tick.saturating_add(n);
    }

    /// Current tick.
    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Configured half-life in ticks.
    #[must_use]
    pub fn half_life(&self) -> f64 {
        self.half_life
    }

    /// Number of entries ever recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in chronological order.
    #[must_use]
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Weight of `entry` at the current tick.
    #[must_use]
    pub fn weight_of(&self, entry: &LedgerEntry) -> f64 {
        half_life_weight(self.current_tick.saturating_sub(entry.tick), self.half_life)
    }

    /// Every entry of `kind`, oldest first, paired with its current weight.
    pub fn of_type(&self, kind: EventKind) -> impl Iterator<Item = (&LedgerEntry, f64)> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.kind() == kind)
            .map(move |e| (e, self.weight_of(e)))
    }

    /// Sum of current weights of all entries of `kind`.
    #[must_use]
    pub fn weighted_count(&self, kind: EventKind) -> f64 {
        self.of_type(kind).map(|(_, w)| w).sum()
    }

    /// Ticks elapsed since the newest entry of `kind`.
    ///
    /// `None` stands for "never happened", i.e. infinitely long ago.
    #[must_use]
    pub fn ticks_since_last(&self, kind: EventKind) -> Option<u64> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.kind() == kind)
            .map(|e| self.current_tick.saturating_sub(e.tick))
    }

    /// Smallest [`ticks_since_last`](Self::ticks_since_last) across `kinds`;
    /// `None` if none of them ever happened.
    #[must_use]
    pub fn ticks_since_any(&self, kinds: &[EventKind]) -> Option<u64> {
        kinds.iter().filter_map(|&k| self.ticks_since_last(k)).min()
    }

    /// Number of distinct `(kind, sub-kind)` pairs ever recorded.
    #[must_use]
    pub fn variety(&self) -> usize {
        self.entries
            .iter()
            .map(|e| (e.kind(), e.details.sub_kind()))
            .collect::<HashSet<_>>()
            .len()
    }

    /// How many of the most recent entries, counting back from the newest,
    /// are all of `kind`. Stops at the first entry of another kind.
    #[must_use]
    pub fn current_streak(&self, kind: EventKind) -> usize {
        self.entries
            .iter()
            .rev()
            .take_while(|e| e.kind() == kind)
            .count()
    }

    /// The last `n` entries, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &LedgerEntry> + '_ {
        self.entries.iter().rev().take(n)
    }

    /// Re-apply half-life and payload clamps after deserialization.
    pub(crate) fn sanitize(&mut self) {
        self.half_life = sanitize_half_life(self.half_life);
        for entry in &mut self.entries {
            entry.details.sanitize();
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(DEFAULT_HALF_LIFE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Desecration, Neglect, NeglectReason, Offering, Prayer, WorldAction};

    #[test]
    fn entries_are_stamped_with_current_tick() {
        let mut ledger = Ledger::default();
        ledger.record(Prayer::default());
        ledger.advance_tick(3);
        ledger.record(Offering::new());
        let ticks: Vec<u64> = ledger.entries().iter().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![0, 3]);
    }

    #[test]
    fn weighted_count_follows_half_life() {
        let mut ledger = Ledger::new(10.0);
        ledger.record(Desecration::default());
        ledger.record(Desecration::default());
        assert!((ledger.weighted_count(EventKind::Desecrate) - 2.0).abs() < 1e-12);

        ledger.advance_tick(10);
        assert!((ledger.weighted_count(EventKind::Desecrate) - 1.0).abs() < 1e-12);
        assert!(ledger.weighted_count(EventKind::Pray).abs() < f64::EPSILON);
    }

    #[test]
    fn of_type_pairs_entries_with_weights() {
        let mut ledger = Ledger::new(2.0);
        ledger.record(Offering::new().value(0.5));
        ledger.advance_tick(2);
        ledger.record(Offering::new().value(0.7));
        ledger.record(Prayer::default());

        let weights: Vec<f64> = ledger.of_type(EventKind::Offer).map(|(_, w)| w).collect();
        assert_eq!(weights.len(), 2);
        assert!((weights[0] - 0.5).abs() < 1e-12);
        assert!((weights[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reads_do_not_mutate() {
        let mut ledger = Ledger::default();
        ledger.record(Prayer::default());
        ledger.advance_tick(4);
        let before = ledger.clone();
        let _ = ledger.weighted_count(EventKind::Pray);
        let _ = ledger.variety();
        let _ = ledger.recent(3).count();
        assert_eq!(ledger, before);
    }

    #[test]
    fn ticks_since_last_searches_newest_first() {
        let mut ledger = Ledger::default();
        assert_eq!(ledger.ticks_since_last(EventKind::Pray), None);

        ledger.record(Prayer::default());
        ledger.advance_tick(5);
        ledger.record(Prayer::default());
        ledger.advance_tick(2);
        assert_eq!(ledger.ticks_since_last(EventKind::Pray), Some(2));
        assert_eq!(ledger.ticks_since_any(&EventKind::DIRECT), Some(2));
        assert_eq!(ledger.ticks_since_any(&[EventKind::Offer]), None);
    }

    #[test]
    fn variety_counts_kind_and_sub_kind_pairs() {
        let mut ledger = Ledger::default();
        ledger.record(Offering::new().item("wine"));
        ledger.record(Offering::new().item("wine"));
        ledger.record(Offering::new().item("bread"));
        ledger.record(Offering::new());
        ledger.record(WorldAction::new().target("bread"));
        ledger.record(Neglect::new(NeglectReason::Idle));
        assert_eq!(ledger.variety(), 5);
    }

    #[test]
    fn streak_stops_at_first_mismatch() {
        let mut ledger = Ledger::default();
        ledger.record(Prayer::default());
        ledger.record(Offering::new());
        ledger.record(Prayer::default());
        ledger.record(Prayer::default());
        assert_eq!(ledger.current_streak(EventKind::Pray), 2);
        assert_eq!(ledger.current_streak(EventKind::Offer), 0);
    }

    #[test]
    fn recent_is_newest_first() {
        let mut ledger = Ledger::default();
        ledger.record(Prayer::default());
        ledger.record(Offering::new());
        ledger.record(Desecration::default());
        let kinds: Vec<EventKind> = ledger.recent(2).map(LedgerEntry::kind).collect();
        assert_eq!(kinds, vec![EventKind::Desecrate, EventKind::Offer]);
        assert_eq!(ledger.recent(10).count(), 3);
    }

    #[test]
    fn out_of_range_payloads_are_clamped_on_record_and_load() {
        let mut ledger = Ledger::default();
        ledger.record(Offering {
            value: 7.0,
            effective_value: 7.0,
            ..Offering::new()
        });
        ledger.record(WorldAction {
            magnitude: 50.0,
            favor: -3.0,
            ..WorldAction::new()
        });
        let EventDetails::Offer(o) = &ledger.entries()[0].details else {
            panic!("expected an offering");
        };
        assert!((o.value - 1.0).abs() < f64::EPSILON);
        let EventDetails::Action(a) = &ledger.entries()[1].details else {
            panic!("expected an action");
        };
        assert!((a.magnitude - 1.0).abs() < f64::EPSILON);
        assert!((a.favor + 1.0).abs() < f64::EPSILON);

        let json = serde_json::to_string(&ledger)
            .expect("serialize")
            .replace("\"value\":1.0", "\"value\":9.0");
        assert!(json.contains("\"value\":9.0"));
        let mut loaded: Ledger = serde_json::from_str(&json).expect("deserialize");
        loaded.sanitize();
        let EventDetails::Offer(o) = &loaded.entries()[0].details else {
            panic!("expected an offering");
        };
        assert!((o.value - 1.0).abs() < f64::EPSILON);
    }
}
