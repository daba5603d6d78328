//! Player-behaviour prediction.
//!
//! The deity keeps a running guess of what the caller will do next. Being
//! wrong is a pleasant surprise; being right every single time is boring.
//! Both reactions are fed back into the ledger by [`crate::deity::Deity`].
//!
//! [`FrequencyPredictor`] is a first-order (bigram) model with a frequency
//! fallback. [`NullPredictor`] opts out entirely.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::entry::{EVENT_KIND_COUNT, EventKind};

/// Default number of consecutive correct predictions that makes the caller
/// "fully predictable".
pub const DEFAULT_WINDOW: usize = 10;

/// Outcome of feeding one event to a predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Prediction {
    /// What the predictor expected before seeing the event.
    pub predicted: Option<EventKind>,
    /// A prediction existed and it was wrong.
    pub surprised: bool,
}

/// Anything that can watch the caller's event stream and guess ahead.
pub trait Predictor: Send {
    /// Observe `kind`, returning what was expected beforehand.
    fn record(&mut self, kind: EventKind) -> Prediction;

    /// Whether the caller's recent behaviour has been entirely predictable.
    fn is_fully_predictable(&self) -> bool;

    /// Learned state worth carrying across a snapshot, if this predictor
    /// has any.
    fn saved_state(&self) -> Option<FrequencyPredictor> {
        None
    }
}

/// Predictor that never predicts anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPredictor;

impl Predictor for NullPredictor {
    fn record(&mut self, _kind: EventKind) -> Prediction {
        Prediction::default()
    }

    fn is_fully_predictable(&self) -> bool {
        false
    }
}

/// Bigram transition counts with an overall-frequency fallback.
///
/// Serializable so a restored deity keeps its expectations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyPredictor {
    window: usize,
    last: Option<EventKind>,
    counts: [u32; EVENT_KIND_COUNT],
    transitions: [[u32; EVENT_KIND_COUNT]; EVENT_KIND_COUNT],
    outcomes: VecDeque<bool>,
}

impl FrequencyPredictor {
    /// Create a predictor that calls the caller predictable after `window`
    /// consecutive hits. A zero window is raised to 1.
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            last: None,
            counts: [0; EVENT_KIND_COUNT],
            transitions: [[0; EVENT_KIND_COUNT]; EVENT_KIND_COUNT],
            outcomes: VecDeque::with_capacity(window),
        }
    }

    /// Window size this predictor was built with.
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Re-establish the window invariants after deserialization.
    pub(crate) fn sanitize(&mut self) {
        self.window = self.window.max(1);
        while self.outcomes.len() > self.window {
            self.outcomes.pop_front();
        }
    }

    /// Best guess for the next event, without observing anything.
    #[must_use]
    pub fn predict(&self) -> Option<EventKind> {
        self.last
            .and_then(|last| argmax(&self.transitions[last.index()]))
            .or_else(|| argmax(&self.counts))
    }
}

impl Default for FrequencyPredictor {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Predictor for FrequencyPredictor {
    fn record(&mut self, kind: EventKind) -> Prediction {
        let predicted = self.predict();
        let surprised = predicted.is_some_and(|p| p != kind);

        if predicted.is_some() {
            if self.outcomes.len() == self.window {
                self.outcomes.pop_front();
            }
            self.outcomes.push_back(!surprised);
        }

        self.counts[kind.index()] = self.counts[kind.index()].saturating_add(1);
        if let Some(last) = self.last {
            let cell = &mut self.transitions[last.index()][kind.index()];
            *cell = cell.saturating_add(1);
        }
        self.last = Some(kind);

        Prediction {
            predicted,
            surprised,
        }
    }

    fn is_fully_predictable(&self) -> bool {
        self.outcomes.len() >= self.window && self.outcomes.iter().all(|&hit| hit)
    }

    fn saved_state(&self) -> Option<FrequencyPredictor> {
        Some(self.clone())
    }
}

/// Most frequent kind in a count row; ties go to declaration order, an
/// all-zero row yields `None`.
fn argmax(row: &[u32; EVENT_KIND_COUNT]) -> Option<EventKind> {
    let mut best: Option<(EventKind, u32)> = None;
    for kind in EventKind::ALL {
        let count = row[kind.index()];
        if count > 0 && best.is_none_or(|(_, c)| count > c) {
            best = Some((kind, count));
        }
    }
    best.map(|(kind, _)| kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_event_is_never_predicted() {
        let mut p = FrequencyPredictor::default();
        assert_eq!(p.record(EventKind::Pray), Prediction::default());
    }

    #[test]
    fn falls_back_to_frequency_then_learns_transitions() {
        let mut p = FrequencyPredictor::default();
        p.record(EventKind::Offer);
        // No transition out of Offer yet: most frequent overall.
        assert_eq!(p.predict(), Some(EventKind::Offer));

        p.record(EventKind::Pray);
        p.record(EventKind::Offer);
        // Offer -> Pray has been seen once.
        assert_eq!(p.predict(), Some(EventKind::Pray));
    }

    #[test]
    fn wrong_guess_is_a_surprise() {
        let mut p = FrequencyPredictor::default();
        p.record(EventKind::Offer);
        let outcome = p.record(EventKind::Desecrate);
        assert_eq!(outcome.predicted, Some(EventKind::Offer));
        assert!(outcome.surprised);
    }

    #[test]
    fn repetition_becomes_predictable() {
        let mut p = FrequencyPredictor::new(3);
        p.record(EventKind::Pray);
        p.record(EventKind::Pray);
        p.record(EventKind::Pray);
        assert!(!p.is_fully_predictable());
        p.record(EventKind::Pray);
        assert!(p.is_fully_predictable());

        p.record(EventKind::Action);
        assert!(!p.is_fully_predictable());
    }

    #[test]
    fn null_predictor_is_inert() {
        let mut p = NullPredictor;
        for kind in EventKind::ALL {
            assert_eq!(p.record(kind), Prediction::default());
        }
        assert!(!p.is_fully_predictable());
    }

    #[test]
    fn saved_state_resumes_where_it_left_off() {
        let mut p = FrequencyPredictor::new(3);
        p.record(EventKind::Offer);
        p.record(EventKind::Pray);
        p.record(EventKind::Offer);

        let json = serde_json::to_string(&p.saved_state()).expect("serialize");
        let mut resumed: FrequencyPredictor = serde_json::from_str(&json).expect("deserialize");
        resumed.sanitize();
        assert_eq!(resumed, p);
        assert_eq!(resumed.predict(), Some(EventKind::Pray));
        assert_eq!(NullPredictor.saved_state(), None);
    }

    #[test]
    fn sanitize_trims_oversized_history() {
        let mut p = FrequencyPredictor::new(5);
        for _ in 0..6 {
            p.record(EventKind::Pray);
        }
        p.window = 0;
        p.sanitize();
        assert_eq!(p.window(), 1);
        assert_eq!(p.outcomes.len(), 1);
        assert!(p.is_fully_predictable());
    }
}
