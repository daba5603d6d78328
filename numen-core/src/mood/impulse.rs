//! Impulse: the per-tick push each mood dimension receives from the ledger.
//!
//! Every signal below reads a decayed aggregate of the ledger at its current
//! tick and nudges one or more dimensions. The coefficients are fixed: they
//! are part of the deity's character, not per-call tuning.
//!
//! | Signal      | Raises                     | Lowers                  |
//! |-------------|----------------------------|-------------------------|
//! | offerings   | serenity                   | hunger, wrath           |
//! | insults     | wrath, amusement (a bit)   |                         |
//! | variety     | amusement                  |                         |
//! | good deeds  | serenity, amusement        | wrath                   |
//! | bad deeds   | wrath, sorrow              | serenity                |
//! | prayer spam | wrath                      | amusement               |
//! | prayer      | serenity                   |                         |
//! | desecration | wrath, chaos               | serenity                |
//! | neglect     | hunger, sorrow             | serenity                |
//! | monotony    | wrath                      | amusement               |

use std::collections::HashSet;
use std::ops::Index;

use crate::entry::{EventDetails, EventKind};
use crate::ledger::Ledger;
use crate::types::{DIMENSION_COUNT, Dimension};

// Offerings (sum of effective value × weight, non-synthetic only).
const OFFER_SERENITY: f64 = 0.08;
const OFFER_HUNGER_RELIEF: f64 = 0.06;
const OFFER_WRATH_RELIEF: f64 = 0.04;
const INSULT_WRATH: f64 = 0.12;
const INSULT_AMUSEMENT: f64 = 0.02;

// Variety of (kind, sub-kind) pairs.
const VARIETY_AMUSEMENT_PER_PAIR: f64 = 0.005;
const VARIETY_AMUSEMENT_CAP: f64 = 0.03;

// World actions (sum of favor × magnitude × weight).
const DEED_SERENITY: f64 = 0.05;
const DEED_AMUSEMENT: f64 = 0.03;
const DEED_WRATH_RELIEF: f64 = 0.04;
const MISDEED_WRATH: f64 = 0.06;
const MISDEED_SORROW: f64 = 0.04;
const MISDEED_SERENITY_LOSS: f64 = 0.04;

// Prayer.
const PRAYER_STREAK_TOLERANCE: usize = 2;
const PRAYER_STREAK_CAP: usize = 6;
const PESTER_WRATH: f64 = 0.02;
const PESTER_AMUSEMENT_LOSS: f64 = 0.01;
const PRAYER_MODERATION_LIMIT: f64 = 3.0;
const PRAYER_SERENITY: f64 = 0.015;

// Desecration dominates every other signal.
const DESECRATION_WRATH: f64 = 0.15;
const DESECRATION_CHAOS: f64 = 0.08;
const DESECRATION_SERENITY_LOSS: f64 = 0.10;

// Neglect.
const NEGLECT_COUNT_CAP: f64 = 10.0;
const NEGLECT_PER_ENTRY: f64 = 0.01;
const NEGLECT_IDLE_CEILING_TICKS: f64 = 50.0;
const NEGLECT_IDLE_PRESSURE: f64 = 0.03;
const NEGLECT_SORROW_SHARE: f64 = 0.5;
const NEGLECT_SERENITY_SHARE: f64 = 0.5;

// Repetition aversion over the most recent entries.
const MONOTONY_WINDOW: usize = 5;
const MONOTONY_AMUSEMENT_LOSS: f64 = 0.02;
const MONOTONY_WRATH: f64 = 0.01;

/// Raw, unnormalized push per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Impulse([f64; DIMENSION_COUNT]);

impl Impulse {
    fn push(&mut self, dimension: Dimension, amount: f64) {
        self.0[dimension.index()] += amount;
    }

    /// Raw values in [`Dimension::ALL`] order.
    #[must_use]
    pub const fn values(&self) -> &[f64; DIMENSION_COUNT] {
        &self.0
    }
}

impl Index<Dimension> for Impulse {
    type Output = f64;

    fn index(&self, dimension: Dimension) -> &f64 {
        &self.0[dimension.index()]
    }
}

/// Derive the impulse from ledger aggregates at the ledger's current tick.
#[must_use]
pub fn compute(ledger: &Ledger) -> Impulse {
    let mut impulse = Impulse::default();
    offerings(ledger, &mut impulse);
    variety(ledger, &mut impulse);
    world_actions(ledger, &mut impulse);
    prayer(ledger, &mut impulse);
    desecration(ledger, &mut impulse);
    neglect(ledger, &mut impulse);
    monotony(ledger, &mut impulse);
    impulse
}

fn offerings(ledger: &Ledger, impulse: &mut Impulse) {
    let value: f64 = ledger
        .of_type(EventKind::Offer)
        .filter_map(|(entry, weight)| match &entry.details {
            EventDetails::Offer(o) if !o.synthetic => Some(o.effective_value * weight),
            _ => None,
        })
        .sum();

    if value > 0.0 {
        impulse.push(Dimension::Serenity, value * OFFER_SERENITY);
        impulse.push(Dimension::Hunger, -value * OFFER_HUNGER_RELIEF);
        impulse.push(Dimension::Wrath, -value * OFFER_WRATH_RELIEF);
    } else if value < 0.0 {
        let insult = -value;
        impulse.push(Dimension::Wrath, insult * INSULT_WRATH);
        impulse.push(Dimension::Amusement, insult * INSULT_AMUSEMENT);
    }
}

fn variety(ledger: &Ledger, impulse: &mut Impulse) {
    #[allow(clippy::cast_precision_loss)]
    let pairs = ledger.variety() as f64;
    impulse.push(
        Dimension::Amusement,
        (pairs * VARIETY_AMUSEMENT_PER_PAIR).min(VARIETY_AMUSEMENT_CAP),
    );
}

fn world_actions(ledger: &Ledger, impulse: &mut Impulse) {
    let net: f64 = ledger
        .of_type(EventKind::Action)
        .filter_map(|(entry, weight)| match &entry.details {
            EventDetails::Action(a) => Some(a.impact() * weight),
            _ => None,
        })
        .sum();

    if net > 0.0 {
        impulse.push(Dimension::Serenity, net * DEED_SERENITY);
        impulse.push(Dimension::Amusement, net * DEED_AMUSEMENT);
        impulse.push(Dimension::Wrath, -net * DEED_WRATH_RELIEF);
    } else if net < 0.0 {
        let harm = -net;
        impulse.push(Dimension::Wrath, harm * MISDEED_WRATH);
        impulse.push(Dimension::Sorrow, harm * MISDEED_SORROW);
        impulse.push(Dimension::Serenity, -harm * MISDEED_SERENITY_LOSS);
    }
}

fn prayer(ledger: &Ledger, impulse: &mut Impulse) {
    let streak = ledger.current_streak(EventKind::Pray);
    if streak > PRAYER_STREAK_TOLERANCE {
        #[allow(clippy::cast_precision_loss)]
        let excess = (streak - PRAYER_STREAK_TOLERANCE).min(PRAYER_STREAK_CAP) as f64;
        impulse.push(Dimension::Wrath, excess * PESTER_WRATH);
        impulse.push(Dimension::Amusement, -excess * PESTER_AMUSEMENT_LOSS);
        return;
    }

    let attention = ledger.weighted_count(EventKind::Pray);
    if attention > 0.0 && attention <= PRAYER_MODERATION_LIMIT {
        impulse.push(Dimension::Serenity, attention * PRAYER_SERENITY);
    }
}

fn desecration(ledger: &Ledger, impulse: &mut Impulse) {
    let offense = ledger.weighted_count(EventKind::Desecrate);
    if offense > 0.0 {
        impulse.push(Dimension::Wrath, offense * DESECRATION_WRATH);
        impulse.push(Dimension::Chaos, offense * DESECRATION_CHAOS);
        impulse.push(Dimension::Serenity, -offense * DESECRATION_SERENITY_LOSS);
    }
}

fn neglect(ledger: &Ledger, impulse: &mut Impulse) {
    let markers = ledger.weighted_count(EventKind::Neglect).min(NEGLECT_COUNT_CAP);
    #[allow(clippy::cast_precision_loss)]
    let idle = ledger
        .ticks_since_any(&EventKind::DIRECT)
        .map_or(1.0, |ticks| (ticks as f64 / NEGLECT_IDLE_CEILING_TICKS).min(1.0));

    let pressure = markers * NEGLECT_PER_ENTRY + idle * NEGLECT_IDLE_PRESSURE;
    if pressure > 0.0 {
        impulse.push(Dimension::Hunger, pressure);
        impulse.push(Dimension::Sorrow, pressure * NEGLECT_SORROW_SHARE);
        impulse.push(Dimension::Serenity, -pressure * NEGLECT_SERENITY_SHARE);
    }
}

/// Only a full window of `MONOTONY_WINDOW` entries can be monotonous; a
/// shorter history never is.
fn monotony(ledger: &Ledger, impulse: &mut Impulse) {
    let recent: Vec<EventKind> = ledger.recent(MONOTONY_WINDOW).map(|e| e.kind()).collect();
    if recent.len() < MONOTONY_WINDOW {
        return;
    }
    let unique = recent.iter().collect::<HashSet<_>>().len();
    if unique * 2 < MONOTONY_WINDOW {
        impulse.push(Dimension::Amusement, -MONOTONY_AMUSEMENT_LOSS);
        impulse.push(Dimension::Wrath, MONOTONY_WRATH);
    }
}
