//! Upcoming arrival types.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Where an arrival time came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalSource {
    /// Live prediction.
    Realtime,
    /// Static timetable.
    Schedule,
}

impl ArrivalSource {
    /// Returns the wire name of the source.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrivalSource::Realtime => "realtime",
            ArrivalSource::Schedule => "schedule",
        }
    }
}

impl fmt::Display for ArrivalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One upcoming bus at a stop, timed against a specific request instant.
///
/// Arrivals are never cached: only the raw records they are built from are,
/// so `minutes` and `leave_in_minutes` always reflect the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    /// When the bus reaches the stop, in the upstream's offset.
    pub time: DateTime<FixedOffset>,

    /// Whole minutes until the bus arrives. Never negative.
    pub minutes: i64,

    /// Minutes until the user must leave. Negative means already late.
    pub leave_in_minutes: i64,

    /// Realtime or schedule.
    pub source: ArrivalSource,

    /// Upstream trip id, if the record carried one.
    pub trip_id: Option<String>,
}
