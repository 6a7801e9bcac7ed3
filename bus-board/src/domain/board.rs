//! Per-stop results and the aggregate board.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Arrival, StopConfig};

/// Wire-level status of one board item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    NoService,
    Stale,
    Error,
}

/// Machine-readable reason for a per-stop error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MbtaUnreachable,
    MbtaRateLimited,
    /// Part of the published contract; not produced by the current pipeline.
    Unknown,
}

/// Error information attached to a stop whose data could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub message: String,
}

/// Outcome of the per-stop pipeline.
///
/// Each variant carries exactly the data its status allows: no arrival
/// without a bus, no stale timestamp unless the data is stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemState {
    /// Fresh data with at least one upcoming bus.
    Ok {
        arrival: Arrival,
        alternatives: Vec<Arrival>,
    },

    /// Upstream failed; answer replayed from an older cache entry.
    Stale {
        arrival: Arrival,
        alternatives: Vec<Arrival>,
        as_of: DateTime<Utc>,
    },

    /// No upcoming bus in the data we have.
    NoService,

    /// Upstream failed and nothing usable was cached.
    Error(ErrorDetail),
}

impl ItemState {
    /// Build the state for a selection result: `Ok` if there is a next
    /// arrival, `NoService` otherwise.
    pub fn from_selection(next: Option<Arrival>, alternatives: Vec<Arrival>) -> Self {
        match next {
            Some(arrival) => ItemState::Ok {
                arrival,
                alternatives,
            },
            None => ItemState::NoService,
        }
    }

    /// Demote an `Ok` state to `Stale`, recording when the data was captured.
    ///
    /// Other states are returned unchanged.
    pub fn into_stale(self, as_of: DateTime<Utc>) -> Self {
        match self {
            ItemState::Ok {
                arrival,
                alternatives,
            } => ItemState::Stale {
                arrival,
                alternatives,
                as_of,
            },
            other => other,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            ItemState::Ok { .. } => Status::Ok,
            ItemState::Stale { .. } => Status::Stale,
            ItemState::NoService => Status::NoService,
            ItemState::Error(_) => Status::Error,
        }
    }

    /// The next arrival, if the state has one.
    pub fn arrival(&self) -> Option<&Arrival> {
        match self {
            ItemState::Ok { arrival, .. } | ItemState::Stale { arrival, .. } => Some(arrival),
            ItemState::NoService | ItemState::Error(_) => None,
        }
    }

    /// Alternatives after the next arrival; empty when there is no arrival.
    pub fn alternatives(&self) -> &[Arrival] {
        match self {
            ItemState::Ok { alternatives, .. } | ItemState::Stale { alternatives, .. } => {
                alternatives
            }
            ItemState::NoService | ItemState::Error(_) => &[],
        }
    }

    pub fn stale_as_of(&self) -> Option<DateTime<Utc>> {
        match self {
            ItemState::Stale { as_of, .. } => Some(*as_of),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorDetail> {
        match self {
            ItemState::Error(detail) => Some(detail),
            _ => None,
        }
    }
}

/// One stop's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardItem {
    pub stop: StopConfig,
    pub state: ItemState,
}

impl BoardItem {
    pub fn status(&self) -> Status {
        self.state.status()
    }
}

/// All configured stops, in configured order, as of one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub as_of: DateTime<Utc>,
    pub items: Vec<BoardItem>,
}
