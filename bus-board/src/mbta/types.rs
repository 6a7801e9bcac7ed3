//! MBTA API response DTOs.
//!
//! Predictions and schedules share the fields we read, so one record type
//! serves both. Everything is optional: records missing data are dropped
//! during selection rather than failing the whole response.

use serde::{Deserialize, Serialize};

/// Top-level envelope of `/predictions` and `/schedules` responses.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CandidateResponse {
    /// The records. Absent means none.
    #[serde(default)]
    pub data: Vec<Candidate>,
}

/// One raw prediction or schedule record, before interpretation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Candidate {
    #[serde(default)]
    pub attributes: Option<CandidateAttributes>,

    /// Related resources. Kept untyped: we only dig out the trip id, and a
    /// malformed structure must not fail deserialisation.
    #[serde(default)]
    pub relationships: Option<serde_json::Value>,
}

/// Timing attributes of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CandidateAttributes {
    /// When the bus reaches the stop.
    #[serde(default)]
    pub arrival_time: Option<String>,

    /// When the bus leaves the stop.
    #[serde(default)]
    pub departure_time: Option<String>,
}

impl Candidate {
    /// Build a record from its timing fields and an optional trip id,
    /// shaped the way the upstream nests it.
    pub fn new(
        arrival_time: Option<&str>,
        departure_time: Option<&str>,
        trip_id: Option<&str>,
    ) -> Self {
        let relationships = trip_id.map(|id| {
            serde_json::json!({
                "trip": { "data": { "id": id, "type": "trip" } }
            })
        });

        Self {
            attributes: Some(CandidateAttributes {
                arrival_time: arrival_time.map(str::to_string),
                departure_time: departure_time.map(str::to_string),
            }),
            relationships,
        }
    }
}
