//! Generation orchestrator.
//!
//! Drives one request through `Pending → Delegated → {Committed | Rejected}`:
//!
//! 1. **Pending**: the subject list is validated locally; nothing is sent on failure.
//! 2. **Delegated**: the subjects, plus the grid of the settings in effect, go to
//!    the solver in a single round trip bounded by a timeout.
//! 3. **Committed**: the returned entries fit that grid and are written: first to
//!    the target timetable (if any), then as the new active schedule. If the
//!    second write fails the first is undone.
//! 4. **Rejected**: non-success status, malformed payload, timeout, or entries
//!    off the grid. Nothing is written.
//!
//! No retries happen here; a failed request is final and the caller decides
//! whether to resubmit.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::generation_tracker::{GenerationState, GenerationTracker, LogLevel};
use super::slot_grid::{compute_slots, GridError};
use super::solver::{SolverClient, SolverError, SolverRequest};
use super::validation::{
    describe, validate_entries, validate_subjects, EntryValidationError, FieldViolation,
    SubjectRequest,
};
use crate::db::repository::{
    ActiveScheduleRepository, DirectoryRepository, FullRepository, RepositoryError,
    SettingsRepository, TimetableRepository,
};
use crate::db::services::{self as timetables, NewTimetable};
use crate::models::{
    ActiveSchedule, Entry, ScheduleSettings, Timetable, TimetableId, TimetableInfo,
};

/// A request to generate a timetable.
///
/// With `timetable_id` the result replaces that timetable's entries; with a
/// `title` it is saved as a new timetable; with neither only the active
/// schedule changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub subjects: Vec<SubjectRequest>,
    #[serde(default)]
    pub timetable_id: Option<TimetableId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl GenerationRequest {
    pub fn new(subjects: Vec<SubjectRequest>) -> Self {
        Self {
            subjects,
            ..Default::default()
        }
    }
}

/// Result of a committed generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub request_id: String,
    pub entries: Vec<Entry>,
    /// Timetable the entries were written to, if the request named one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timetable: Option<TimetableInfo>,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation request is invalid: {}", describe(.0))]
    Validation(Vec<FieldViolation>),

    #[error("settings cannot produce a grid: {0}")]
    Configuration(#[from] GridError),

    #[error("generation failed: {message}")]
    Failed {
        /// Upstream HTTP status when the solver answered.
        status: Option<u16>,
        message: String,
    },

    #[error("generation was cancelled")]
    Cancelled,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<SolverError> for GenerationError {
    fn from(err: SolverError) -> Self {
        GenerationError::Failed {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

/// Coordinates the solver, the repository, and request tracking.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    solver: Arc<dyn SolverClient>,
    repository: Arc<dyn FullRepository>,
    tracker: GenerationTracker,
    timeout: Duration,
}

impl GenerationOrchestrator {
    pub fn new(
        solver: Arc<dyn SolverClient>,
        repository: Arc<dyn FullRepository>,
        timeout: Duration,
    ) -> Self {
        Self {
            solver,
            repository,
            tracker: GenerationTracker::new(),
            timeout,
        }
    }

    /// Share an existing tracker instead of a fresh one.
    pub fn with_tracker(mut self, tracker: GenerationTracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn tracker(&self) -> &GenerationTracker {
        &self.tracker
    }

    /// Register a request and return its id without running it.
    pub fn begin(&self) -> String {
        self.tracker.create()
    }

    /// Register and run a request.
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        let request_id = self.begin();
        self.run(&request_id, request).await
    }

    /// Run a request previously registered with [`begin`](Self::begin).
    pub async fn run(
        &self,
        request_id: &str,
        request: GenerationRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        let result = self.drive(request_id, request).await;
        match &result {
            Ok(outcome) => {
                self.tracker.commit(request_id, outcome.entries.len());
                info!(
                    "Generation {} committed {} entries",
                    request_id,
                    outcome.entries.len()
                );
            }
            Err(GenerationError::Cancelled) => {
                info!("Generation {} cancelled, result discarded", request_id);
            }
            Err(err) => {
                self.tracker.reject(request_id, err.to_string());
                warn!("Generation {} rejected: {}", request_id, err);
            }
        }
        result
    }

    async fn drive(
        &self,
        request_id: &str,
        request: GenerationRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        let repo = self.repository.as_ref();

        let directory = repo.directory().await?;
        validate_subjects(&request.subjects, &directory).map_err(GenerationError::Validation)?;
        if let Some(title) = &request.title {
            if title.trim().is_empty() {
                return Err(GenerationError::Validation(vec![FieldViolation::new(
                    "title",
                    "must not be blank",
                )]));
            }
        }

        // The result must fit the target timetable's own settings, else the current ones.
        let target = match request.timetable_id {
            Some(id) => Some(timetables::get_timetable(repo, id).await?),
            None => None,
        };
        let settings = match &target {
            Some(timetable) => timetable.settings.clone(),
            None => repo.get_settings().await?,
        };
        let slots = compute_slots(&settings)?;
        let solver_request = SolverRequest {
            subjects: request.subjects.clone(),
            days: settings.working_days.clone(),
            slots,
        };

        self.ensure_not_cancelled(request_id)?;
        self.tracker.transition(request_id, GenerationState::Delegated);
        self.tracker.log(
            request_id,
            LogLevel::Info,
            format!("Delegated {} subjects to solver", request.subjects.len()),
        );
        info!(
            "Generation {} delegated ({} subjects)",
            request_id,
            request.subjects.len()
        );

        let entries = match tokio::time::timeout(self.timeout, self.solver.generate(&solver_request))
            .await
        {
            Ok(answer) => answer?,
            Err(_) => return Err(SolverError::Timeout(self.timeout).into()),
        };

        validate_entries(&entries, &settings).map_err(|e| match e {
            EntryValidationError::Settings(grid) => GenerationError::Configuration(grid),
            EntryValidationError::Entries(violations) => GenerationError::Failed {
                status: None,
                message: format!(
                    "solver returned entries off the grid: {}",
                    describe(&violations)
                ),
            },
        })?;

        self.ensure_not_cancelled(request_id)?;
        self.tracker.log(
            request_id,
            LogLevel::Info,
            format!("Solver returned {} entries", entries.len()),
        );

        let timetable = self.write_target(&request, &entries, &settings).await?;
        if let Err(err) = repo
            .replace_active(ActiveSchedule::new(entries.clone(), settings))
            .await
        {
            self.undo_target(request_id, target, timetable.as_ref()).await;
            return Err(err.into());
        }

        Ok(GenerationOutcome {
            request_id: request_id.to_string(),
            entries,
            timetable,
        })
    }

    async fn write_target(
        &self,
        request: &GenerationRequest,
        entries: &[Entry],
        settings: &ScheduleSettings,
    ) -> Result<Option<TimetableInfo>, GenerationError> {
        let repo = self.repository.as_ref();
        if let Some(id) = request.timetable_id {
            let updated = timetables::replace_timetable_entries(repo, id, entries.to_vec()).await?;
            return Ok(Some(updated.summary(id)));
        }
        if let Some(title) = &request.title {
            let created = timetables::create_timetable(
                repo,
                NewTimetable {
                    title: title.clone(),
                    description: request.description.clone(),
                    entries: entries.to_vec(),
                    settings: settings.clone(),
                },
            )
            .await?;
            return Ok(created.id.map(|id| created.summary(id)));
        }
        Ok(None)
    }

    /// Put the target back the way it was before `write_target`: restore the
    /// previous entries of an existing timetable, or drop a newly created one.
    async fn undo_target(
        &self,
        request_id: &str,
        previous: Option<Timetable>,
        written: Option<&TimetableInfo>,
    ) {
        let repo = self.repository.as_ref();
        let undone = match (previous, written) {
            (Some(previous), Some(info)) => repo.replace_entries(info.id, previous.entries).await,
            (None, Some(info)) => repo.delete_timetable(info.id).await.map(|_| ()),
            _ => return,
        };
        match undone {
            Ok(()) => debug!("Generation {} undid its timetable write", request_id),
            Err(err) => warn!(
                "Generation {} could not undo its timetable write: {}",
                request_id, err
            ),
        }
    }

    fn ensure_not_cancelled(&self, request_id: &str) -> Result<(), GenerationError> {
        if self.tracker.is_cancelled(request_id) {
            Err(GenerationError::Cancelled)
        } else {
            Ok(())
        }
    }
}
