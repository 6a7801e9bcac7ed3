//! Bus arrival board server.
//!
//! Answers: "when is the next bus at each of my stops, and when do I need
//! to leave?" Arrivals come from MBTA realtime predictions, falling back
//! to the timetable, with a short-lived cache that also papers over
//! upstream outages.

pub mod board;
pub mod cache;
pub mod config;
pub mod domain;
pub mod logging;
pub mod mbta;
pub mod selection;
pub mod web;
