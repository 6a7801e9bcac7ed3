//! Realtime-first fetch policy.

use std::future::Future;

use tracing::debug;

use crate::domain::{ArrivalSource, DirectionId, StopConfig};
use crate::mbta::{Candidate, MbtaError};

/// Source of raw arrival records.
///
/// This abstraction allows the orchestrator to be tested with scripted
/// responses instead of a live API.
pub trait TransitClient: Send + Sync {
    /// Realtime predictions for a route at a stop in one direction.
    fn fetch_predictions(
        &self,
        route_id: &str,
        stop_id: &str,
        direction: DirectionId,
    ) -> impl Future<Output = Result<Vec<Candidate>, MbtaError>> + Send;

    /// Timetabled arrivals, same filters as predictions.
    fn fetch_schedules(
        &self,
        route_id: &str,
        stop_id: &str,
        direction: DirectionId,
    ) -> impl Future<Output = Result<Vec<Candidate>, MbtaError>> + Send;
}

/// Raw records plus the endpoint that produced them. This is what gets
/// cached, so arrivals can be re-timed on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedCandidates {
    pub candidates: Vec<Candidate>,
    pub source: ArrivalSource,
}

/// Fetch records for a stop, preferring realtime.
///
/// Predictions win whenever the upstream returned any record at all, even
/// if every one of them turns out to be in the past. Schedules are only
/// fetched when the prediction list is empty. Errors from either call are
/// returned as-is; there are no retries.
pub async fn fetch_candidates<C: TransitClient>(
    client: &C,
    stop: &StopConfig,
) -> Result<FetchedCandidates, MbtaError> {
    let predictions = client
        .fetch_predictions(&stop.route_id, &stop.stop_id, stop.direction_id)
        .await?;

    if !predictions.is_empty() {
        return Ok(FetchedCandidates {
            candidates: predictions,
            source: ArrivalSource::Realtime,
        });
    }

    debug!(key = %stop.key, "no predictions, falling back to schedules");

    let schedules = client
        .fetch_schedules(&stop.route_id, &stop.stop_id, stop.direction_id)
        .await?;

    Ok(FetchedCandidates {
        candidates: schedules,
        source: ArrivalSource::Schedule,
    })
}
