//! Picking the next arrival and its alternatives.

use chrono::{DateTime, Utc};

use crate::domain::{Arrival, ArrivalSource};
use crate::mbta::Candidate;

use super::resolve::{compute_minutes, resolve};

/// Alternatives shown after the next arrival unless told otherwise.
pub const DEFAULT_MAX_ALTERNATIVES: usize = 2;

/// Select the next arrival and up to `max_alternatives` after it.
///
/// Records without a usable time are dropped, as are records already in the
/// past relative to `as_of`. The rest are ordered by time, ties keeping input
/// order. `leave_in_minutes` is `minutes - walk_minutes` and may be negative.
///
/// Calling this again with a later `as_of` on the same records re-filters and
/// re-times them.
pub fn select_arrivals(
    candidates: &[Candidate],
    as_of: DateTime<Utc>,
    walk_minutes: u32,
    source: ArrivalSource,
    max_alternatives: usize,
) -> (Option<Arrival>, Vec<Arrival>) {
    let mut upcoming: Vec<_> = candidates
        .iter()
        .filter_map(resolve)
        .map(|resolved| {
            let minutes = compute_minutes(resolved.time, as_of);
            (resolved, minutes)
        })
        .filter(|(_, minutes)| *minutes >= 0)
        .collect();

    // Stable, so equal times keep their upstream order.
    upcoming.sort_by_key(|(resolved, _)| resolved.time);

    let mut arrivals = upcoming.into_iter().map(|(resolved, minutes)| Arrival {
        time: resolved.time,
        minutes,
        leave_in_minutes: minutes - i64::from(walk_minutes),
        source,
        trip_id: resolved.trip_id,
    });

    let Some(next) = arrivals.next() else {
        return (None, Vec::new());
    };
    (Some(next), arrivals.take(max_alternatives).collect())
}
