//! CFD position records and lifecycle states.
//!
//! A `Cfd` is owned entirely by the daemon; the client never mutates one.
//! Each `cfds` event replaces the whole collection, so these types only
//! need to deserialize and classify.

use crate::decimal::{Price, Qty};
use crate::order::{OrderId, OrderSide};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a CFD.
///
/// Closed enum over the daemon's state vocabulary. An unrecognized wire
/// tag parses to `Unknown` instead of failing, so a daemon that learns a
/// new state keeps the rest of the snapshot usable. `Unknown` is surfaced
/// through the classifier's `unsorted` bucket as a diagnostic signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CfdState {
    /// Sell order taken, daemon waiting for maker approval.
    Requested,
    /// Maker accepted the take request.
    Accepted,
    /// Maker rejected the take request.
    Rejected,
    /// Contract setup protocol is running.
    ContractSetup,
    /// Contract published, waiting for confirmation.
    PendingOpen,
    /// Contract settled or refunded.
    Closed,
    /// State tag not in the known vocabulary (boundary soft-fail).
    Unknown(String),
}

impl CfdState {
    /// Wire spelling of this state.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Requested => "Requested",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
            Self::ContractSetup => "Contract Setup",
            Self::PendingOpen => "Pending Open",
            Self::Closed => "Closed",
            Self::Unknown(s) => s,
        }
    }

    /// Parse a wire tag. Never fails; unrecognized tags map to `Unknown`.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "Requested" => Self::Requested,
            "Accepted" => Self::Accepted,
            "Rejected" => Self::Rejected,
            "Contract Setup" => Self::ContractSetup,
            "Pending Open" => Self::PendingOpen,
            "Closed" => Self::Closed,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Display bucket this state belongs to.
    ///
    /// Exhaustive over the enum: adding a state without assigning it a
    /// group is a compile error.
    pub fn group(&self) -> StateGroup {
        match self {
            Self::Accepted | Self::ContractSetup | Self::PendingOpen => StateGroup::Running,
            Self::Requested => StateGroup::Open,
            Self::Rejected | Self::Closed => StateGroup::Closed,
            Self::Unknown(_) => StateGroup::Unsorted,
        }
    }
}

impl fmt::Display for CfdState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for CfdState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CfdState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StateVisitor;

        impl de::Visitor<'_> for StateVisitor {
            type Value = CfdState;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a CFD state tag")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(CfdState::from_wire(v))
            }
        }

        deserializer.deserialize_str(StateVisitor)
    }
}

/// Display bucket for a CFD's lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateGroup {
    /// Contract is live or being set up.
    Running,
    /// Take request is outstanding.
    Open,
    /// Contract reached a terminal state.
    Closed,
    /// State not in any known group (defect signal, not an error).
    Unsorted,
}

impl fmt::Display for StateGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Unsorted => write!(f, "unsorted"),
        }
    }
}

/// One contract-for-difference position as pushed by the daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cfd {
    /// Order this CFD was taken from.
    pub order_id: OrderId,
    /// Trading pair, e.g. "BTC/USD".
    pub trading_pair: String,
    /// Our side of the contract.
    pub position: OrderSide,
    /// Price at contract creation.
    pub initial_price: Price,
    /// Contracted quantity in USD.
    pub quantity_usd: Qty,
    /// Leverage multiplier.
    pub leverage: u8,
    /// Price at which the position is liquidated.
    pub liquidation_price: Price,
    /// Unrealized profit in USD, if the daemon computed one.
    #[serde(default)]
    pub profit_usd: Option<Decimal>,
    /// Current lifecycle state.
    pub state: CfdState,
    /// Timestamp of the last state transition.
    pub state_transition_timestamp: DateTime<Utc>,
}

impl Cfd {
    /// Display bucket for this record's current state.
    pub fn group(&self) -> StateGroup {
        self.state.group()
    }
}
