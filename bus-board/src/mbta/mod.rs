//! MBTA v3 API client.
//!
//! Fetches realtime predictions and static schedules for one
//! route/stop/direction at a time.
//!
//! Key characteristics of the upstream:
//! - Responses are JSON:API documents; the records live under `data`
//! - Times are ISO 8601 strings with an offset, and either of arrival or
//!   departure may be null (first and last stops of a trip)
//! - HTTP 429 signals rate limiting, which callers report separately

mod client;
mod error;
#[cfg(test)]
pub(crate) mod mock;
mod types;

pub use client::{MbtaClient, MbtaConfig};
pub(crate) use client::{DEFAULT_BASE_URL, DEFAULT_MAX_CONCURRENT, DEFAULT_TIMEOUT_SECS};
pub use error::MbtaError;
pub use types::{Candidate, CandidateAttributes, CandidateResponse};
