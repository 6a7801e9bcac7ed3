//! Board orchestration.
//!
//! For each configured stop: serve a fresh cache entry if there is one,
//! otherwise fetch (predictions first, schedules if predictions are empty),
//! and if the fetch fails fall back to a stale entry before reporting an
//! error. Stops are independent; one stop failing never affects another.

mod fetch;
mod service;

pub use fetch::{FetchedCandidates, TransitClient, fetch_candidates};
pub use service::BoardService;
