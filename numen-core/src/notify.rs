//! Notifications: how the deity tells its host that something happened.
//!
//! Hosts subscribe a listener to one [`TriggerKind`] and receive a
//! [`Notification`] each time it fires. Subscriptions are identified by an
//! opaque [`SubscriptionId`]; registering the same closure twice yields two
//! independent subscriptions, each removed by its own id.
//!
//! A listener that returns an error or panics is logged and skipped; it never
//! aborts the tick and never prevents later listeners from running.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;

use serde::Serialize;
use tracing::warn;

use crate::error::{NumenError, Result};
use crate::entry::EventKind;
use crate::types::{Dimension, MoodVector};

/// The fixed set of things a host can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Every resolved tick.
    Tick,
    /// The dominant dimension changed.
    MoodShift,
    /// A configured cutoff was crossed.
    Threshold,
    /// The deity feels like saying something.
    Utterance,
    /// An idle-neglect marker was recorded.
    Neglect,
    /// The caller did something the predictor did not expect.
    Surprise,
}

impl TriggerKind {
    /// All trigger kinds.
    pub const ALL: [Self; 6] = [
        Self::Tick,
        Self::MoodShift,
        Self::Threshold,
        Self::Utterance,
        Self::Neglect,
        Self::Surprise,
    ];

    /// Canonical snake-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tick => "tick",
            Self::MoodShift => "mood_shift",
            Self::Threshold => "threshold",
            Self::Utterance => "utterance",
            Self::Neglect => "neglect",
            Self::Surprise => "surprise",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TriggerKind {
    type Err = NumenError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|k| k.name() == normalized)
            .ok_or_else(|| NumenError::UnknownTrigger {
                name: s.to_string(),
                valid: Self::ALL.map(Self::name).join(", "),
            })
    }
}

/// Payload delivered to listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "trigger", rename_all = "snake_case")]
pub enum Notification {
    /// A tick was resolved.
    Tick {
        /// The tick just resolved.
        tick: u64,
        /// Fuzzed mood after resolution.
        mood: MoodVector,
    },
    /// The dominant dimension changed.
    MoodShift {
        /// Tick of the change.
        tick: u64,
        /// Dominant dimension before.
        from: Dimension,
        /// Dominant dimension after.
        to: Dimension,
        /// Value of the new dominant dimension.
        level: f64,
    },
    /// A configured cutoff was crossed.
    Threshold {
        /// Tick of the crossing.
        tick: u64,
        /// Which dimension crossed.
        dimension: Dimension,
        /// The configured cutoff.
        cutoff: f64,
        /// Exact value after the tick.
        value: f64,
        /// `true` when crossing upward, `false` when falling back below.
        rising: bool,
    },
    /// The deity speaks, in the key of its dominant dimension.
    Utterance {
        /// Tick of the utterance.
        tick: u64,
        /// Dominant dimension, the tone of the utterance.
        dimension: Dimension,
        /// Strength of that dimension.
        intensity: f64,
    },
    /// An idle-neglect marker was recorded.
    Neglect {
        /// Tick of the marker.
        tick: u64,
        /// Ticks since the last direct interaction; `None` if there never was one.
        idle_ticks: Option<u64>,
    },
    /// The predictor guessed wrong.
    Surprise {
        /// Tick of the event.
        tick: u64,
        /// What the predictor expected.
        expected: EventKind,
        /// What actually happened.
        actual: EventKind,
    },
}

impl Notification {
    /// Which trigger this notification belongs to.
    #[must_use]
    pub fn kind(&self) -> TriggerKind {
        match self {
            Self::Tick { .. } => TriggerKind::Tick,
            Self::MoodShift { .. } => TriggerKind::MoodShift,
            Self::Threshold { .. } => TriggerKind::Threshold,
            Self::Utterance { .. } => TriggerKind::Utterance,
            Self::Neglect { .. } => TriggerKind::Neglect,
            Self::Surprise { .. } => TriggerKind::Surprise,
        }
    }
}

/// Opaque handle to one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// A notification callback.
pub type Listener = Box<dyn FnMut(&Notification) -> anyhow::Result<()> + Send>;

struct Subscription {
    id: SubscriptionId,
    kind: TriggerKind,
    listener: Listener,
}

/// Registry of listeners keyed by subscription id.
#[derive(Default)]
pub struct NotificationRegistry {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

impl fmt::Debug for NotificationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationRegistry")
            .field("next_id", &self.next_id)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl NotificationRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `kind`.
    pub fn subscribe<F>(&mut self, kind: TriggerKind, listener: F) -> SubscriptionId
    where
        F: FnMut(&Notification) -> anyhow::Result<()> + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            kind,
            listener: Box::new(listener),
        });
        id
    }

    /// Register `listener` for the trigger called `name`.
    ///
    /// # Errors
    /// Returns [`NumenError::UnknownTrigger`] if `name` is not one of
    /// [`TriggerKind::ALL`]; nothing is registered in that case.
    pub fn subscribe_named<F>(&mut self, name: &str, listener: F) -> Result<SubscriptionId>
    where
        F: FnMut(&Notification) -> anyhow::Result<()> + Send + 'static,
    {
        let kind: TriggerKind = name.parse()?;
        Ok(self.subscribe(kind, listener))
    }

    /// Remove a subscription. Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether there are no subscriptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Whether anyone listens for `kind`.
    #[must_use]
    pub fn has_listeners(&self, kind: TriggerKind) -> bool {
        self.subscriptions.iter().any(|s| s.kind == kind)
    }

    /// Deliver `notification` to every listener of its kind, in
    /// subscription order. Returns how many listeners failed.
    pub fn emit(&mut self, notification: &Notification) -> usize {
        let kind = notification.kind();
        let mut failures = 0;
        for sub in self.subscriptions.iter_mut().filter(|s| s.kind == kind) {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| (sub.listener)(notification)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    failures += 1;
                    warn!(subscription = sub.id.0, trigger = %kind, %error, "Listener failed");
                }
                Err(_) => {
                    failures += 1;
                    warn!(subscription = sub.id.0, trigger = %kind, "Listener panicked");
                }
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tick(n: u64) -> Notification {
        Notification::Tick {
            tick: n,
            mood: MoodVector::UNIFORM,
        }
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnMut(&Notification) -> anyhow::Result<()> + Send + 'static) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        (hits, move |_: &Notification| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn listeners_receive_only_their_kind() {
        let mut registry = NotificationRegistry::new();
        let (ticks, on_tick) = counter();
        let (shifts, on_shift) = counter();
        registry.subscribe(TriggerKind::Tick, on_tick);
        registry.subscribe(TriggerKind::MoodShift, on_shift);

        registry.emit(&tick(1));
        registry.emit(&tick(2));
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
        assert_eq!(shifts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unknown_trigger_is_rejected_without_side_effects() {
        let mut registry = NotificationRegistry::new();
        let (_, listener) = counter();
        let err = registry
            .subscribe_named("apotheosis", listener)
            .expect_err("unknown trigger must fail");
        assert!(matches!(err, NumenError::UnknownTrigger { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn named_subscription_accepts_dashes() {
        let mut registry = NotificationRegistry::new();
        let (_, listener) = counter();
        assert!(registry.subscribe_named("mood-shift", listener).is_ok());
        assert!(registry.has_listeners(TriggerKind::MoodShift));
    }

    #[test]
    fn unsubscribe_by_token() {
        let mut registry = NotificationRegistry::new();
        let (hits, listener) = counter();
        let id = registry.subscribe(TriggerKind::Tick, listener);
        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.emit(&tick(1));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failing_listeners_do_not_stop_others() {
        let mut registry = NotificationRegistry::new();
        registry.subscribe(TriggerKind::Tick, |_| anyhow::bail!("listener refused"));
        registry.subscribe(TriggerKind::Tick, |_| panic!("listener exploded"));
        let (hits, listener) = counter();
        registry.subscribe(TriggerKind::Tick, listener);

        assert_eq!(registry.emit(&tick(1)), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
