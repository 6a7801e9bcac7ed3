//! Response bodies for the HTTP API.
//!
//! Optional fields are always present and serialise as `null`.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::domain::{Arrival, ArrivalSource, Board, BoardItem, ErrorDetail, Status};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// An upcoming bus.
#[derive(Debug, Serialize)]
pub struct ArrivalResponse {
    /// Arrival time with the upstream's offset
    pub time: DateTime<FixedOffset>,

    /// Whole minutes until the bus arrives
    pub minutes: i64,

    /// Minutes until the user must leave (negative when late)
    pub leave_in_minutes: i64,

    pub source: ArrivalSource,

    pub trip_id: Option<String>,
}

/// One stop on the board.
#[derive(Debug, Serialize)]
pub struct BoardItemResponse {
    pub key: String,
    pub label: String,
    pub route_id: String,
    pub stop_id: String,
    pub direction_id: u8,
    pub walk_minutes: u32,
    pub status: Status,
    pub arrival: Option<ArrivalResponse>,
    pub alternatives: Vec<ArrivalResponse>,

    /// When the replayed data was captured; set only for `stale`
    pub stale_as_of: Option<DateTime<Utc>>,

    /// Set only for `error`
    pub error: Option<ErrorDetail>,
}

/// The full board.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub as_of: DateTime<Utc>,
    pub items: Vec<BoardItemResponse>,
}

/// Error response for requests that never reach the board.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub detail: String,
}

// Conversion implementations

impl From<&Arrival> for ArrivalResponse {
    fn from(arrival: &Arrival) -> Self {
        Self {
            time: arrival.time,
            minutes: arrival.minutes,
            leave_in_minutes: arrival.leave_in_minutes,
            source: arrival.source,
            trip_id: arrival.trip_id.clone(),
        }
    }
}

impl From<BoardItem> for BoardItemResponse {
    fn from(item: BoardItem) -> Self {
        let state = &item.state;
        Self {
            status: state.status(),
            arrival: state.arrival().map(ArrivalResponse::from),
            alternatives: state.alternatives().iter().map(ArrivalResponse::from).collect(),
            stale_as_of: state.stale_as_of(),
            error: state.error().cloned(),
            direction_id: item.stop.direction_id.as_u8(),
            walk_minutes: item.stop.walk_minutes,
            key: item.stop.key,
            label: item.stop.label,
            route_id: item.stop.route_id,
            stop_id: item.stop.stop_id,
        }
    }
}

impl From<Board> for BoardResponse {
    fn from(board: Board) -> Self {
        Self {
            as_of: board.as_of,
            items: board.items.into_iter().map(BoardItemResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::domain::{DirectionId, ErrorCode, ItemState, StopConfig};

    fn stop() -> StopConfig {
        StopConfig {
            key: "route_77_harvard".to_string(),
            label: "77 to Harvard".to_string(),
            route_id: "77".to_string(),
            stop_id: "2261".to_string(),
            direction_id: DirectionId::new(1).unwrap(),
            walk_minutes: 4,
        }
    }

    fn arrival() -> Arrival {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        Arrival {
            time: offset.with_ymd_and_hms(2026, 2, 13, 7, 8, 0).unwrap(),
            minutes: 8,
            leave_in_minutes: 4,
            source: ArrivalSource::Realtime,
            trip_id: Some("t1".to_string()),
        }
    }

    #[test]
    fn ok_item_shape() {
        let item = BoardItem {
            stop: stop(),
            state: ItemState::from_selection(Some(arrival()), vec![]),
        };

        let json = serde_json::to_value(BoardItemResponse::from(item)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "key": "route_77_harvard",
                "label": "77 to Harvard",
                "route_id": "77",
                "stop_id": "2261",
                "direction_id": 1,
                "walk_minutes": 4,
                "status": "ok",
                "arrival": {
                    "time": "2026-02-13T07:08:00-05:00",
                    "minutes": 8,
                    "leave_in_minutes": 4,
                    "source": "realtime",
                    "trip_id": "t1"
                },
                "alternatives": [],
                "stale_as_of": null,
                "error": null
            })
        );
    }

    #[test]
    fn error_item_shape() {
        let item = BoardItem {
            stop: stop(),
            state: ItemState::Error(ErrorDetail {
                code: ErrorCode::MbtaRateLimited,
                message: "rate limited by MBTA".to_string(),
            }),
        };

        let json = serde_json::to_value(BoardItemResponse::from(item)).unwrap();

        assert_eq!(json["status"], "error");
        assert!(json["arrival"].is_null());
        assert_eq!(json["alternatives"], serde_json::json!([]));
        assert_eq!(json["error"]["code"], "mbta_rate_limited");
        assert_eq!(json["error"]["message"], "rate limited by MBTA");
    }

    #[test]
    fn stale_item_carries_capture_time() {
        let captured = Utc.with_ymd_and_hms(2026, 2, 13, 12, 0, 0).unwrap();
        let item = BoardItem {
            stop: stop(),
            state: ItemState::from_selection(Some(arrival()), vec![]).into_stale(captured),
        };

        let json = serde_json::to_value(BoardItemResponse::from(item)).unwrap();

        assert_eq!(json["status"], "stale");
        assert_eq!(json["stale_as_of"], "2026-02-13T12:00:00Z");
    }

    #[test]
    fn no_service_status_name() {
        let item = BoardItem {
            stop: stop(),
            state: ItemState::NoService,
        };

        let json = serde_json::to_value(BoardItemResponse::from(item)).unwrap();
        assert_eq!(json["status"], "no_service");
    }
}
