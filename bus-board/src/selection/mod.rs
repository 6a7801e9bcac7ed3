//! Turning raw upstream records into a ranked arrival list.
//!
//! Everything here is pure: no I/O and no clock reads. The request instant
//! is always passed in, which is what lets the orchestrator replay a cached
//! record set against a later instant and get correctly re-timed output.

mod resolve;
mod select;

pub use resolve::{
    ResolvedCandidate, compute_minutes, parse_timestamp, resolve, resolve_timestamp, trip_id,
};
pub use select::{DEFAULT_MAX_ALTERNATIVES, select_arrivals};
