//! Scripted transit client for tests.
//!
//! Each endpoint returns whatever it was last told to, and counts calls so
//! tests can assert on the fetch policy.

use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::board::TransitClient;
use crate::domain::DirectionId;

use super::error::MbtaError;
use super::types::Candidate;

type Scripted = Result<Vec<Candidate>, MbtaError>;

/// Transit client that replays scripted responses.
pub(crate) struct MockTransitClient {
    predictions: Mutex<Scripted>,
    schedules: Mutex<Scripted>,
    prediction_calls: AtomicUsize,
    schedule_calls: AtomicUsize,
}

impl MockTransitClient {
    /// Both endpoints start out answering with no records.
    pub(crate) fn new() -> Self {
        Self {
            predictions: Mutex::new(Ok(Vec::new())),
            schedules: Mutex::new(Ok(Vec::new())),
            prediction_calls: AtomicUsize::new(0),
            schedule_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn set_predictions(&self, response: Scripted) {
        *self.predictions.lock().unwrap() = response;
    }

    pub(crate) fn set_schedules(&self, response: Scripted) {
        *self.schedules.lock().unwrap() = response;
    }

    pub(crate) fn prediction_calls(&self) -> usize {
        self.prediction_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn schedule_calls(&self) -> usize {
        self.schedule_calls.load(Ordering::SeqCst)
    }
}

impl TransitClient for MockTransitClient {
    fn fetch_predictions(
        &self,
        _route_id: &str,
        _stop_id: &str,
        _direction: DirectionId,
    ) -> impl Future<Output = Result<Vec<Candidate>, MbtaError>> + Send {
        self.prediction_calls.fetch_add(1, Ordering::SeqCst);
        let response = self.predictions.lock().unwrap().clone();
        async move { response }
    }

    fn fetch_schedules(
        &self,
        _route_id: &str,
        _stop_id: &str,
        _direction: DirectionId,
    ) -> impl Future<Output = Result<Vec<Candidate>, MbtaError>> + Send {
        self.schedule_calls.fetch_add(1, Ordering::SeqCst);
        let response = self.schedules.lock().unwrap().clone();
        async move { response }
    }
}
