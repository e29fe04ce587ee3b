//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use timetable_rust::models::{Entry, ScheduleSettings};
use timetable_rust::services::solver::{SolverClient, SolverError, SolverRequest};
use timetable_rust::services::validation::SubjectRequest;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// 09:00 start, five 60-minute slots, 15-minute break after the third, Monday to Friday.
pub fn weekday_settings() -> ScheduleSettings {
    ScheduleSettings::new("09:00", 60, 5, 3, 15)
}

pub fn entry(subject: &str, faculty: &str, day: &str, slot: &str) -> Entry {
    Entry::new(subject, faculty, day, slot)
}

pub fn subject(name: &str, faculty: &str, lectures: u32) -> SubjectRequest {
    SubjectRequest {
        subject: name.to_string(),
        faculty: faculty.to_string(),
        lectures_per_week: lectures,
    }
}

/// Solver double answering from a script.
///
/// With a gate, each call signals `started` and then waits for `release`
/// before answering, so a test can act while the request is delegated.
pub struct FakeSolver {
    answer: Mutex<Result<Vec<Entry>, SolverError>>,
    delay: Option<Duration>,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
    requests: Mutex<Vec<SolverRequest>>,
}

impl FakeSolver {
    pub fn answering(entries: Vec<Entry>) -> Self {
        Self {
            answer: Mutex::new(Ok(entries)),
            delay: None,
            gate: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: SolverError) -> Self {
        Self {
            answer: Mutex::new(Err(error)),
            ..Self::answering(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns `(started, release)`.
    pub fn gated(mut self) -> (Self, Arc<Notify>, Arc<Notify>) {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        self.gate = Some((started.clone(), release.clone()));
        (self, started, release)
    }

    pub fn requests(&self) -> Vec<SolverRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SolverClient for FakeSolver {
    async fn generate(&self, request: &SolverRequest) -> Result<Vec<Entry>, SolverError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some((started, release)) = &self.gate {
            started.notify_one();
            release.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answer.lock().unwrap().clone()
    }
}

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment across parallel tests. `None` removes a variable.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}
