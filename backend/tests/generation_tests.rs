//! Generation orchestrator tests against a scripted solver.

mod support;

use std::sync::Arc;
use std::time::Duration;

use support::{entry, subject, weekday_settings, FakeSolver};
use timetable_rust::db::repositories::LocalRepository;
use async_trait::async_trait;
use timetable_rust::db::repository::{
    ActiveScheduleRepository, DirectoryRepository, FullRepository, RepositoryError,
    RepositoryResult, SettingsRepository, TimetableRepository,
};
use timetable_rust::db::services::{self, NewTimetable};
use timetable_rust::models::{
    ActiveSchedule, Directory, Entry, ScheduleSettings, Timetable, TimetableId, TimetableInfo,
};
use timetable_rust::services::generation::{
    GenerationError, GenerationOrchestrator, GenerationRequest,
};
use timetable_rust::services::generation_tracker::GenerationState;
use timetable_rust::services::solver::SolverError;

const TIMEOUT: Duration = Duration::from_secs(5);

fn setup(solver: FakeSolver) -> (Arc<LocalRepository>, Arc<FakeSolver>, GenerationOrchestrator) {
    let repo = Arc::new(LocalRepository::with_default_settings(weekday_settings()));
    let solver = Arc::new(solver);
    let orchestrator = GenerationOrchestrator::new(
        solver.clone(),
        repo.clone() as Arc<dyn FullRepository>,
        TIMEOUT,
    );
    (repo, solver, orchestrator)
}

fn solved() -> Vec<Entry> {
    vec![
        entry("Math", "Dr. A", "Monday", "9:00AM-10:00AM").with_room("R1"),
        entry("Physics", "Dr. B", "Wednesday", "12:15PM-1:15PM"),
    ]
}

fn request() -> GenerationRequest {
    GenerationRequest::new(vec![subject("Math", "Dr. A", 3), subject("Physics", "Dr. B", 2)])
}

async fn saved_with(repo: &LocalRepository, entries: Vec<Entry>) -> TimetableId {
    services::create_timetable(
        repo,
        NewTimetable {
            title: "Existing".into(),
            description: None,
            entries,
            settings: weekday_settings(),
        },
    )
    .await
    .unwrap()
    .id
    .unwrap()
}

#[tokio::test]
async fn test_committed_generation_replaces_active_set() {
    let (repo, solver, orchestrator) = setup(FakeSolver::answering(solved()));

    let outcome = orchestrator.generate(request()).await.unwrap();

    assert_eq!(outcome.entries, solved());
    assert!(outcome.timetable.is_none());
    let active = repo.fetch_active().await.unwrap().unwrap();
    assert_eq!(active.entries, solved());
    assert_eq!(active.settings, weekday_settings());
    assert_eq!(
        orchestrator.tracker().state(&outcome.request_id),
        Some(GenerationState::Committed)
    );

    let sent = solver.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subjects, request().subjects);
    assert_eq!(sent[0].days, weekday_settings().working_days);
    assert_eq!(sent[0].slots.len(), 5);
    assert_eq!(sent[0].slots[3], "12:15PM-1:15PM");
}

#[tokio::test]
async fn test_invalid_request_never_reaches_solver() {
    let (_repo, solver, orchestrator) = setup(FakeSolver::answering(solved()));

    let err = orchestrator
        .generate(GenerationRequest::new(vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Validation(_)));

    let err = orchestrator
        .generate(GenerationRequest::new(vec![subject("Math", "", 0)]))
        .await
        .unwrap_err();
    match err {
        GenerationError::Validation(violations) => assert_eq!(violations.len(), 2),
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(solver.requests().is_empty());
}

#[tokio::test]
async fn test_unknown_faculty_rejected_when_directory_is_set() {
    let (repo, solver, orchestrator) = setup(FakeSolver::answering(solved()));
    repo.set_directory(Directory {
        faculty: ["Dr. A".to_string()].into_iter().collect(),
        rooms: Default::default(),
    });

    let err = orchestrator.generate(request()).await.unwrap_err();
    match err {
        GenerationError::Validation(violations) => {
            assert_eq!(violations[0].position, Some(1));
            assert!(violations[0].message.contains("Dr. B"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(solver.requests().is_empty());
}

#[tokio::test]
async fn test_rejected_generation_preserves_existing_entries() {
    let (repo, _solver, orchestrator) = setup(FakeSolver::failing(SolverError::Status {
        status: 500,
        message: "AI generation failed".into(),
    }));
    let e0 = vec![entry("History", "Dr. H", "Thursday", "10:00AM-11:00AM")];
    let id = saved_with(&repo, e0.clone()).await;

    let mut req = request();
    req.timetable_id = Some(id);
    let err = orchestrator.generate(req).await.unwrap_err();

    match err {
        GenerationError::Failed { status, message } => {
            assert_eq!(status, Some(500));
            assert!(message.contains("AI generation failed"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(services::get_timetable(&*repo, id).await.unwrap().entries, e0);
    assert!(repo.fetch_active().await.unwrap().is_none());
}

#[tokio::test]
async fn test_malformed_payload_is_rejected() {
    let (repo, _solver, orchestrator) =
        setup(FakeSolver::failing(SolverError::Malformed("expected a sequence".into())));

    let err = orchestrator.generate(request()).await.unwrap_err();
    assert!(matches!(err, GenerationError::Failed { status: None, .. }));
    assert!(repo.fetch_active().await.unwrap().is_none());
}

#[tokio::test]
async fn test_entries_off_the_grid_are_rejected() {
    let off_grid = vec![entry("Math", "Dr. A", "Saturday", "9:00AM-10:00AM")];
    let (repo, _solver, orchestrator) = setup(FakeSolver::answering(off_grid));

    let err = orchestrator.generate(request()).await.unwrap_err();
    match err {
        GenerationError::Failed { message, .. } => assert!(message.contains("Saturday")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(repo.fetch_active().await.unwrap().is_none());
}

#[tokio::test]
async fn test_slow_solver_times_out() {
    let repo = Arc::new(LocalRepository::new());
    let solver = FakeSolver::answering(vec![]).with_delay(Duration::from_millis(500));
    let orchestrator = GenerationOrchestrator::new(
        Arc::new(solver),
        repo.clone() as Arc<dyn FullRepository>,
        Duration::from_millis(20),
    );

    let request_id = orchestrator.begin();
    let err = orchestrator.run(&request_id, request()).await.unwrap_err();

    assert!(matches!(err, GenerationError::Failed { status: None, .. }));
    assert_eq!(
        orchestrator.tracker().state(&request_id),
        Some(GenerationState::Rejected)
    );
    assert!(repo.fetch_active().await.unwrap().is_none());
}

#[tokio::test]
async fn test_cancel_while_delegated_discards_result() {
    let (solver, started, release) = FakeSolver::answering(solved()).gated();
    let (repo, _solver, orchestrator) = setup(solver);

    let request_id = orchestrator.begin();
    let task = {
        let orchestrator = orchestrator.clone();
        let request_id = request_id.clone();
        tokio::spawn(async move { orchestrator.run(&request_id, request()).await })
    };

    started.notified().await;
    assert_eq!(
        orchestrator.tracker().state(&request_id),
        Some(GenerationState::Delegated)
    );
    assert_eq!(
        orchestrator.tracker().cancel(&request_id),
        Some(GenerationState::Cancelled)
    );
    release.notify_one();

    let err = task.await.unwrap().unwrap_err();
    assert!(matches!(err, GenerationError::Cancelled));
    assert!(repo.fetch_active().await.unwrap().is_none());
    assert_eq!(
        orchestrator.tracker().state(&request_id),
        Some(GenerationState::Cancelled)
    );
}

#[tokio::test]
async fn test_cancel_before_delegation_skips_solver() {
    let (_repo, solver, orchestrator) = setup(FakeSolver::answering(solved()));
    let request_id = orchestrator.begin();
    orchestrator.tracker().cancel(&request_id);

    let err = orchestrator.run(&request_id, request()).await.unwrap_err();
    assert!(matches!(err, GenerationError::Cancelled));
    assert!(solver.requests().is_empty());
}

#[tokio::test]
async fn test_title_saves_result_as_new_timetable() {
    let (repo, _solver, orchestrator) = setup(FakeSolver::answering(solved()));

    let mut req = request();
    req.title = Some("Spring draft".into());
    req.description = Some("first pass".into());
    let outcome = orchestrator.generate(req).await.unwrap();

    let info = outcome.timetable.unwrap();
    assert_eq!(info.title, "Spring draft");
    assert_eq!(info.entry_count, 2);
    let stored = services::get_timetable(&*repo, info.id).await.unwrap();
    assert_eq!(stored.entries, solved());
    assert_eq!(stored.description, "first pass");
}

#[tokio::test]
async fn test_target_timetable_grid_comes_from_its_stored_settings() {
    let answer = vec![entry("Math", "Dr. A", "Friday", "1:15PM-2:15PM")];
    let (repo, solver, orchestrator) = setup(FakeSolver::answering(answer.clone()));
    let id = saved_with(&repo, vec![]).await;
    services::save_settings(&*repo, ScheduleSettings::new("08:00", 45, 3, 0, 0))
        .await
        .unwrap();

    let mut req = request();
    req.timetable_id = Some(id);
    let outcome = orchestrator.generate(req).await.unwrap();

    assert_eq!(solver.requests()[0].slots.len(), 5);
    assert_eq!(outcome.timetable.unwrap().entry_count, 1);
    assert_eq!(services::get_timetable(&*repo, id).await.unwrap().entries, answer);
    assert_eq!(
        repo.fetch_active().await.unwrap().unwrap().settings,
        weekday_settings()
    );
}

#[tokio::test]
async fn test_missing_target_timetable_is_not_found() {
    let (_repo, solver, orchestrator) = setup(FakeSolver::answering(solved()));
    let mut req = request();
    req.timetable_id = Some(TimetableId::new(77));

    let err = orchestrator.generate(req).await.unwrap_err();
    match err {
        GenerationError::Repository(e) => assert!(e.is_not_found()),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(solver.requests().is_empty());
}

/// Local store whose active-set writes always fail.
struct ActiveWriteFails(LocalRepository);

#[async_trait]
impl TimetableRepository for ActiveWriteFails {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.0.health_check().await
    }
    async fn store_timetable(&self, timetable: &Timetable) -> RepositoryResult<TimetableInfo> {
        self.0.store_timetable(timetable).await
    }
    async fn get_timetable(&self, id: TimetableId) -> RepositoryResult<Timetable> {
        self.0.get_timetable(id).await
    }
    async fn list_timetables(&self) -> RepositoryResult<Vec<TimetableInfo>> {
        self.0.list_timetables().await
    }
    async fn replace_entries(&self, id: TimetableId, entries: Vec<Entry>) -> RepositoryResult<()> {
        self.0.replace_entries(id, entries).await
    }
    async fn delete_timetable(&self, id: TimetableId) -> RepositoryResult<bool> {
        self.0.delete_timetable(id).await
    }
}

#[async_trait]
impl ActiveScheduleRepository for ActiveWriteFails {
    async fn fetch_active(&self) -> RepositoryResult<Option<ActiveSchedule>> {
        self.0.fetch_active().await
    }
    async fn replace_active(&self, _active: ActiveSchedule) -> RepositoryResult<()> {
        Err(RepositoryError::connection("active set store is down"))
    }
}

#[async_trait]
impl SettingsRepository for ActiveWriteFails {
    async fn get_settings(&self) -> RepositoryResult<ScheduleSettings> {
        self.0.get_settings().await
    }
    async fn save_settings(&self, settings: &ScheduleSettings) -> RepositoryResult<()> {
        self.0.save_settings(settings).await
    }
    async fn reset_settings(&self) -> RepositoryResult<ScheduleSettings> {
        self.0.reset_settings().await
    }
}

#[async_trait]
impl DirectoryRepository for ActiveWriteFails {
    async fn directory(&self) -> RepositoryResult<Directory> {
        self.0.directory().await
    }
}

fn failing_active_setup() -> (LocalRepository, GenerationOrchestrator) {
    let local = LocalRepository::with_default_settings(weekday_settings());
    let orchestrator = GenerationOrchestrator::new(
        Arc::new(FakeSolver::answering(solved())),
        Arc::new(ActiveWriteFails(local.clone())) as Arc<dyn FullRepository>,
        TIMEOUT,
    );
    (local, orchestrator)
}

#[tokio::test]
async fn test_failed_active_write_restores_target_entries() {
    let (local, orchestrator) = failing_active_setup();
    let e0 = vec![entry("History", "Dr. H", "Thursday", "10:00AM-11:00AM")];
    let id = saved_with(&local, e0.clone()).await;

    let mut req = request();
    req.timetable_id = Some(id);
    let err = orchestrator.generate(req).await.unwrap_err();

    assert!(matches!(err, GenerationError::Repository(_)));
    assert_eq!(services::get_timetable(&local, id).await.unwrap().entries, e0);
    assert!(local.fetch_active().await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_active_write_drops_new_timetable() {
    let (local, orchestrator) = failing_active_setup();

    let mut req = request();
    req.title = Some("Draft".into());
    let err = orchestrator.generate(req).await.unwrap_err();

    assert!(matches!(err, GenerationError::Repository(_)));
    assert_eq!(local.timetable_count(), 0);
}
