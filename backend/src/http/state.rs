//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::services::generation::GenerationOrchestrator;
use crate::services::generation_tracker::GenerationTracker;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for timetable, settings and directory storage
    pub repository: Arc<dyn FullRepository>,
    /// Orchestrator for solver-backed generation; shares `repository`
    pub orchestrator: GenerationOrchestrator,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The orchestrator should have been built over the same repository.
    pub fn new(repository: Arc<dyn FullRepository>, orchestrator: GenerationOrchestrator) -> Self {
        Self {
            repository,
            orchestrator,
        }
    }

    pub fn tracker(&self) -> &GenerationTracker {
        self.orchestrator.tracker()
    }
}
