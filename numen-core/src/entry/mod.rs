//! Ledger entry definitions.
//!
//! Every interaction a deity receives is one of five kinds. Each kind has its
//! own payload type; [`EventDetails`] unifies them so the mood engine can
//! match exhaustively instead of probing optional keys.

pub mod action;
pub mod devotion;
pub mod neglect;
pub mod offering;

pub use action::WorldAction;
pub use devotion::{Desecration, Prayer};
pub use neglect::{Neglect, NeglectReason};
pub use offering::Offering;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NumenError;

/// Number of event kinds.
pub const EVENT_KIND_COUNT: usize = 5;

/// Classification of ledger entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A gift placed before the deity.
    Offer,
    /// Something done in the world that the deity cares about.
    Action,
    /// A direct appeal.
    Pray,
    /// A direct offense against the deity or its sites.
    Desecrate,
    /// Absence or boredom, recorded by the engine itself.
    Neglect,
}

impl EventKind {
    /// All kinds in declaration order.
    pub const ALL: [Self; EVENT_KIND_COUNT] = [
        Self::Offer,
        Self::Action,
        Self::Pray,
        Self::Desecrate,
        Self::Neglect,
    ];

    /// Kinds that count as the caller directly addressing the deity.
    pub const DIRECT: [Self; 3] = [Self::Offer, Self::Pray, Self::Desecrate];

    /// Dense index, for per-kind tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lower-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Action => "action",
            Self::Pray => "pray",
            Self::Desecrate => "desecrate",
            Self::Neglect => "neglect",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventKind {
    type Err = NumenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| NumenError::UnknownName {
                what: "event kind",
                name: s.to_string(),
            })
    }
}

/// Kind-specific payload of a ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventDetails {
    /// An offering.
    Offer(Offering),
    /// A world action.
    Action(WorldAction),
    /// A prayer.
    Pray(Prayer),
    /// A desecration.
    Desecrate(Desecration),
    /// A neglect marker.
    Neglect(Neglect),
}

impl EventDetails {
    /// Which kind this payload belongs to.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Offer(_) => EventKind::Offer,
            Self::Action(_) => EventKind::Action,
            Self::Pray(_) => EventKind::Pray,
            Self::Desecrate(_) => EventKind::Desecrate,
            Self::Neglect(_) => EventKind::Neglect,
        }
    }

    /// Optional discriminator inside a kind (offering item, action target,
    /// prayer intent, desecrated site, neglect reason). Feeds
    /// [`Ledger::variety`](crate::ledger::Ledger::variety).
    #[must_use]
    pub fn sub_kind(&self) -> Option<&str> {
        match self {
            Self::Offer(o) => o.item.as_deref(),
            Self::Action(a) => a.target.as_deref(),
            Self::Pray(p) => p.intent.as_deref(),
            Self::Desecrate(d) => d.site.as_deref(),
            Self::Neglect(n) => Some(n.reason.tag()),
        }
    }

    /// Whether the entry was injected by the engine rather than reported by
    /// the caller.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        match self {
            Self::Offer(o) => o.synthetic,
            Self::Neglect(_) => true,
            Self::Action(_) | Self::Pray(_) | Self::Desecrate(_) => false,
        }
    }

    /// Clamp numeric payload fields into their documented ranges.
    pub(crate) fn sanitize(&mut self) {
        match self {
            Self::Offer(o) => o.sanitize(),
            Self::Action(a) => a.sanitize(),
            Self::Pray(_) | Self::Desecrate(_) | Self::Neglect(_) => {}
        }
    }
}

impl From<Offering> for EventDetails {
    fn from(o: Offering) -> Self {
        Self::Offer(o)
    }
}

impl From<WorldAction> for EventDetails {
    fn from(a: WorldAction) -> Self {
        Self::Action(a)
    }
}

impl From<Prayer> for EventDetails {
    fn from(p: Prayer) -> Self {
        Self::Pray(p)
    }
}

impl From<Desecration> for EventDetails {
    fn from(d: Desecration) -> Self {
        Self::Desecrate(d)
    }
}

impl From<Neglect> for EventDetails {
    fn from(n: Neglect) -> Self {
        Self::Neglect(n)
    }
}

/// One immutable row of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Tick at which the entry was recorded.
    pub tick: u64,
    /// What happened.
    pub details: EventDetails,
}

impl LedgerEntry {
    /// Kind of this entry.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.details.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_parse_back() {
        for kind in EventKind::ALL {
            assert_eq!(kind.name().parse::<EventKind>().ok(), Some(kind));
        }
        assert!("sacrifice".parse::<EventKind>().is_err());
    }

    #[test]
    fn sub_kind_comes_from_payload() {
        let offer = EventDetails::from(Offering::new().item("incense"));
        assert_eq!(offer.sub_kind(), Some("incense"));
        let prayer = EventDetails::from(Prayer::default());
        assert_eq!(prayer.sub_kind(), None);
        let neglect = EventDetails::from(Neglect::new(NeglectReason::Predictable));
        assert_eq!(neglect.sub_kind(), Some("predictable"));
    }

    #[test]
    fn only_engine_entries_are_synthetic() {
        assert!(EventDetails::from(Neglect::new(NeglectReason::Idle)).is_synthetic());
        assert!(EventDetails::from(Offering::surprise()).is_synthetic());
        assert!(!EventDetails::from(Offering::new().value(0.8)).is_synthetic());
        assert!(!EventDetails::from(Desecration::default()).is_synthetic());
    }

    #[test]
    fn details_serialize_with_type_tag() {
        let entry = LedgerEntry {
            tick: 4,
            details: Prayer::new("rain").into(),
        };
        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json["details"]["type"], "pray");
        assert_eq!(json["details"]["intent"], "rain");
        let back: LedgerEntry = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, entry);
    }
}
