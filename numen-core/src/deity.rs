//! The deity aggregate.
//!
//! A [`Deity`] owns one ledger, one mood engine, one predictor and one
//! notification registry. Callers report events as they happen and advance
//! the clock with [`Deity::tick`]; mood changes only on tick boundaries.
//!
//! One tick step is, in order:
//!
//! 1. advance the ledger clock by one
//! 2. record an idle-neglect marker if no offering, prayer or desecration
//!    arrived within the neglect threshold
//! 3. resolve the mood
//! 4. emit `Tick`, then `MoodShift`, `Threshold` and `Utterance` as they apply

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{EventConfig, NumenConfig, PredictorConfig};
use crate::entry::{
    Desecration, EventDetails, EventKind, Neglect, NeglectReason, Offering, Prayer, WorldAction,
};
use crate::error::Result;
use crate::ledger::Ledger;
use crate::mood::MoodEngine;
use crate::noise;
use crate::notify::{Notification, NotificationRegistry, SubscriptionId, TriggerKind};
use crate::predictor::{FrequencyPredictor, NullPredictor, Predictor};
use crate::snapshot::{DeitySnapshot, SNAPSHOT_VERSION};
use crate::types::{Alignment, DeityId, Dimension, MoodVector, Precision};

/// Salt separating the utterance gate from any other use of [`noise::unit`].
const UTTERANCE_SALT: f64 = 3.7;

/// Identity and fixed temperament of a deity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeityProfile {
    /// Unique id.
    pub id: DeityId,
    /// Display name.
    pub name: String,
    /// Moral alignment used to appraise offerings.
    pub alignment: Alignment,
    /// Idle ticks tolerated before neglect markers start accruing.
    pub neglect_threshold_ticks: u64,
    /// Which predictor a restored deity starts with.
    #[serde(default)]
    pub predictor: PredictorConfig,
}

/// A simulated deity.
pub struct Deity {
    profile: DeityProfile,
    events: EventConfig,
    ledger: Ledger,
    mood: MoodEngine,
    predictor: Box<dyn Predictor>,
    registry: NotificationRegistry,
}

impl Deity {
    /// Build a fresh deity at tick 0, resting at its personality.
    #[must_use]
    pub fn new(config: &NumenConfig) -> Self {
        let profile = DeityProfile {
            id: DeityId::new(),
            name: config.deity.name.clone(),
            alignment: config.deity.alignment,
            neglect_threshold_ticks: config.neglect.threshold_ticks,
            predictor: config.predictor.clone(),
        };
        let mut events = config.events.clone();
        events.sanitize();
        let ledger = Ledger::new(config.ledger.half_life_ticks);
        let mood = MoodEngine::new(
            config.deity.personality.to_vector(),
            config.mood.hysteresis,
            config.mood.attractor_strength,
        );
        Self::assemble(profile, events, ledger, mood, None)
    }

    fn assemble(
        profile: DeityProfile,
        events: EventConfig,
        ledger: Ledger,
        mood: MoodEngine,
        saved: Option<FrequencyPredictor>,
    ) -> Self {
        let predictor: Box<dyn Predictor> = match saved {
            _ if !profile.predictor.enabled => Box::new(NullPredictor),
            Some(state) => Box::new(state),
            None => Box::new(FrequencyPredictor::new(profile.predictor.window)),
        };
        Self {
            profile,
            events,
            ledger,
            mood,
            predictor,
            registry: NotificationRegistry::new(),
        }
    }

    /// Replace the predictor.
    #[must_use]
    pub fn with_predictor(mut self, predictor: impl Predictor + 'static) -> Self {
        self.predictor = Box::new(predictor);
        self
    }

    // -- Caller events ------------------------------------------------------

    /// Place an offering before the deity. Its worth is appraised against
    /// the deity's alignment.
    pub fn offer(&mut self, offering: Offering) {
        self.record(offering);
    }

    /// Pray for something.
    pub fn pray(&mut self, intent: impl Into<String>) {
        self.record(Prayer::new(intent));
    }

    /// Report a deed done in the world.
    pub fn act(&mut self, action: WorldAction) {
        self.record(action);
    }

    /// Defile a site sacred to the deity.
    pub fn desecrate(&mut self, site: impl Into<String>) {
        self.record(Desecration::new(site));
    }

    /// Record any event at the current tick and let the predictor react.
    ///
    /// A wrong prediction adds a synthetic zero-value offering and emits
    /// [`Notification::Surprise`]. A caller who has been right-predicted for
    /// a whole window adds a [`NeglectReason::Predictable`] marker instead.
    pub fn record(&mut self, details: impl Into<EventDetails>) {
        let details = match details.into() {
            EventDetails::Offer(offering) => {
                EventDetails::Offer(offering.appraised_by(self.profile.alignment))
            }
            other => other,
        };
        let kind = details.kind();
        self.ledger.record(details);

        let prediction = self.predictor.record(kind);
        let tick = self.ledger.current_tick();
        match prediction.predicted {
            Some(expected) if prediction.surprised => {
                debug!(tick, %expected, actual = %kind, "Deity surprised");
                self.ledger.record(Offering::surprise());
                self.registry.emit(&Notification::Surprise {
                    tick,
                    expected,
                    actual: kind,
                });
            }
            _ if self.predictor.is_fully_predictable() => {
                debug!(tick, %kind, "Deity bored by predictable caller");
                self.ledger.record(Neglect::new(NeglectReason::Predictable));
            }
            _ => {}
        }
    }

    // -- Clock --------------------------------------------------------------

    /// Run `n` full tick steps. `tick(0)` does nothing.
    pub fn tick(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    fn step(&mut self) {
        self.ledger.advance_tick(1);
        let tick = self.ledger.current_tick();
        self.check_neglect(tick);

        let before = self.mood.query(Precision::Exact);
        if !self.mood.resolve(&self.ledger, tick) {
            return;
        }
        let after = self.mood.query(Precision::Exact);

        self.registry.emit(&Notification::Tick {
            tick,
            mood: self.mood.query(Precision::Fuzzed),
        });

        let (from, _) = before.dominant();
        let (to, level) = after.dominant();
        if from != to {
            self.registry.emit(&Notification::MoodShift { tick, from, to, level });
        }

        for threshold in &self.events.thresholds {
            let was = before[threshold.dimension];
            let now = after[threshold.dimension];
            let rising = was <= threshold.cutoff && now > threshold.cutoff;
            let falling = was > threshold.cutoff && now <= threshold.cutoff;
            if rising || falling {
                self.registry.emit(&Notification::Threshold {
                    tick,
                    dimension: threshold.dimension,
                    cutoff: threshold.cutoff,
                    value: now,
                    rising,
                });
            }
        }

        if noise::unit(tick, UTTERANCE_SALT) < self.events.utterance_chance {
            self.registry.emit(&Notification::Utterance {
                tick,
                dimension: to,
                intensity: level,
            });
        }
    }

    /// Idle time counts from the last direct interaction, or from creation
    /// if there never was one.
    fn check_neglect(&mut self, tick: u64) {
        let since = self.ledger.ticks_since_any(&EventKind::DIRECT);
        let idle = since.unwrap_or(tick);
        if idle > self.profile.neglect_threshold_ticks {
            info!(
                deity = %self.profile.id,
                tick,
                idle,
                threshold = self.profile.neglect_threshold_ticks,
                "Neglect marker recorded"
            );
            self.ledger.record(Neglect::new(NeglectReason::Idle));
            self.registry.emit(&Notification::Neglect {
                tick,
                idle_ticks: since,
            });
        }
    }

    // -- Reads --------------------------------------------------------------

    /// Read the mood at the given precision.
    #[must_use]
    pub fn query(&self, precision: Precision) -> MoodVector {
        self.mood.query(precision)
    }

    /// The mood as a caller normally sees it (fuzzed).
    #[must_use]
    pub fn mood(&self) -> MoodVector {
        self.mood.query(Precision::Fuzzed)
    }

    /// Strongest dimension of the exact mood and its value.
    #[must_use]
    pub fn dominant(&self) -> (Dimension, f64) {
        self.mood.dominant()
    }

    /// Whether the exact mood in `dimension` is above `threshold`.
    #[must_use]
    pub fn exceeds(&self, dimension: Dimension, threshold: f64) -> bool {
        self.mood.exceeds(dimension, threshold)
    }

    /// The event history.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Current tick.
    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.ledger.current_tick()
    }

    /// Identity and temperament.
    #[must_use]
    pub fn profile(&self) -> &DeityProfile {
        &self.profile
    }

    /// Unique id.
    #[must_use]
    pub fn id(&self) -> DeityId {
        self.profile.id
    }

    // -- Notifications ------------------------------------------------------

    /// Subscribe to one trigger kind.
    pub fn subscribe<F>(&mut self, kind: TriggerKind, listener: F) -> SubscriptionId
    where
        F: FnMut(&Notification) -> anyhow::Result<()> + Send + 'static,
    {
        self.registry.subscribe(kind, listener)
    }

    /// Subscribe by trigger name.
    ///
    /// # Errors
    /// Returns [`crate::NumenError::UnknownTrigger`] for names outside
    /// [`TriggerKind::ALL`].
    pub fn subscribe_named<F>(&mut self, name: &str, listener: F) -> Result<SubscriptionId>
    where
        F: FnMut(&Notification) -> anyhow::Result<()> + Send + 'static,
    {
        self.registry.subscribe_named(name, listener)
    }

    /// Remove a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.registry.unsubscribe(id)
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    // -- Persistence --------------------------------------------------------

    /// Capture the persistable state.
    #[must_use]
    pub fn snapshot(&self) -> DeitySnapshot {
        DeitySnapshot {
            version: SNAPSHOT_VERSION,
            profile: self.profile.clone(),
            events: self.events.clone(),
            ledger: self.ledger.clone(),
            mood: self.mood.clone(),
            predictor: self.predictor.saved_state(),
        }
    }

    /// Rebuild a deity from a snapshot. Listeners are not restored; the
    /// built-in predictor resumes from its saved state when there is one.
    #[must_use]
    pub fn restore(mut snapshot: DeitySnapshot) -> Self {
        snapshot.sanitize();
        info!(
            deity = %snapshot.profile.id,
            name = %snapshot.profile.name,
            tick = snapshot.ledger.current_tick(),
            entries = snapshot.ledger.len(),
            "Deity restored"
        );
        Self::assemble(
            snapshot.profile,
            snapshot.events,
            snapshot.ledger,
            snapshot.mood,
            snapshot.predictor,
        )
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    /// Returns [`crate::NumenError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        self.snapshot().to_json()
    }

    /// Deserialize from JSON produced by [`Deity::to_json`].
    ///
    /// # Errors
    /// Returns [`crate::NumenError::Serialization`] for malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        DeitySnapshot::from_json(json).map(Self::restore)
    }
}

impl fmt::Debug for Deity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deity")
            .field("profile", &self.profile)
            .field("tick", &self.ledger.current_tick())
            .field("entries", &self.ledger.len())
            .field("mood", &self.mood.query(Precision::Exact))
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
