//! Configured stop types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a direction id is not 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction id {value}: must be 0 or 1")]
pub struct InvalidDirection {
    value: u8,
}

/// Travel direction of a route at a stop.
///
/// The upstream API only knows two directions, so any `DirectionId` is
/// either 0 or 1 by construction.
///
/// # Examples
///
/// ```
/// use bus_board::domain::DirectionId;
///
/// assert_eq!(DirectionId::new(1).unwrap().as_u8(), 1);
/// assert!(DirectionId::new(2).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DirectionId(u8);

impl DirectionId {
    /// Parse a direction id from its numeric form.
    pub fn new(value: u8) -> Result<Self, InvalidDirection> {
        match value {
            0 | 1 => Ok(Self(value)),
            _ => Err(InvalidDirection { value }),
        }
    }

    /// Returns the numeric direction id.
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DirectionId {
    type Error = InvalidDirection;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DirectionId> for u8 {
    fn from(direction: DirectionId) -> Self {
        direction.0
    }
}

impl fmt::Debug for DirectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DirectionId({})", self.0)
    }
}

impl fmt::Display for DirectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One configured stop on the board.
///
/// Loaded once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StopConfig {
    /// Unique key, also the cache key and the `/v1/board/{key}` path segment.
    pub key: String,

    /// Display label (e.g. "77 - Harvard").
    pub label: String,

    /// Upstream route id.
    pub route_id: String,

    /// Upstream stop id.
    pub stop_id: String,

    /// Direction of travel.
    pub direction_id: DirectionId,

    /// Minutes it takes to walk from home to the stop.
    #[serde(default)]
    pub walk_minutes: u32,
}
