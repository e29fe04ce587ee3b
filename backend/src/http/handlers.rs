//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    GenerateResponse, GenerationListResponse, GenerationRecord, GenerationRequest, HealthResponse,
    MessageResponse, NamesResponse, RenderedGrid, ReplaceEntriesRequest, SaveTimetableRequest,
    ScheduleSettings, SlotsResponse, Timetable, TimetableListResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services::{self as db_services, NewTimetable};
use crate::models::TimetableId;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the repository is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repo_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        repository: repo_status,
    }))
}

// =============================================================================
// Settings
// =============================================================================

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> HandlerResult<ScheduleSettings> {
    let settings = db_services::get_settings(state.repository.as_ref()).await?;
    Ok(Json(settings))
}

/// PUT /api/settings
///
/// Replace the institution settings. Rejected with 422 when they cannot
/// produce a slot grid.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<ScheduleSettings>,
) -> HandlerResult<ScheduleSettings> {
    let saved = db_services::save_settings(state.repository.as_ref(), settings).await?;
    Ok(Json(saved))
}

/// POST /api/settings/reset
pub async fn reset_settings(State(state): State<AppState>) -> HandlerResult<ScheduleSettings> {
    let defaults = db_services::reset_settings(state.repository.as_ref()).await?;
    Ok(Json(defaults))
}

/// GET /api/settings/slots
///
/// Slot labels and working days derived from the current settings.
pub async fn get_slots(State(state): State<AppState>) -> HandlerResult<SlotsResponse> {
    let repo = state.repository.as_ref();
    let settings = db_services::get_settings(repo).await?;
    let slots = db_services::current_slots(repo).await?;
    Ok(Json(SlotsResponse {
        days: settings.working_days,
        slots,
    }))
}

// =============================================================================
// Generation
// =============================================================================

/// POST /api/ai/generate
///
/// Forward the subject list to the solver and commit the result. Blocks for
/// one solver round trip; the request id in the response can be looked up
/// under `/api/generations`.
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> HandlerResult<GenerateResponse> {
    let request_id = state.orchestrator.begin();
    let outcome = state.orchestrator.run(&request_id, request).await?;

    Ok(Json(GenerateResponse {
        message: "Timetable generated".to_string(),
        outcome,
    }))
}

/// GET /api/generations
pub async fn list_generations(State(state): State<AppState>) -> HandlerResult<GenerationListResponse> {
    Ok(Json(GenerationListResponse {
        generations: state.tracker().list(),
    }))
}

/// GET /api/generations/{request_id}
pub async fn get_generation(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> HandlerResult<GenerationRecord> {
    let record = state
        .tracker()
        .get(&request_id)
        .ok_or_else(|| AppError::NotFound(format!("Generation {} not found", request_id)))?;
    Ok(Json(record))
}

/// DELETE /api/generations/{request_id}
///
/// Best-effort cancellation. A request already delegated keeps running at the
/// solver; its result is discarded. Finished requests are returned unchanged.
pub async fn cancel_generation(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> HandlerResult<GenerationRecord> {
    let tracker = state.tracker();
    tracker
        .cancel(&request_id)
        .ok_or_else(|| AppError::NotFound(format!("Generation {} not found", request_id)))?;
    let record = tracker
        .get(&request_id)
        .ok_or_else(|| AppError::NotFound(format!("Generation {} not found", request_id)))?;
    Ok(Json(record))
}

// =============================================================================
// Active schedule
// =============================================================================

/// GET /api/timetable
///
/// The active schedule rendered on the grid of the settings it was generated with.
pub async fn get_active_timetable(State(state): State<AppState>) -> HandlerResult<RenderedGrid> {
    let grid = db_services::render_active(state.repository.as_ref()).await?;
    Ok(Json(grid))
}

// =============================================================================
// Saved timetables
// =============================================================================

/// POST /api/timetables/save
///
/// Save a timetable. Without `entries` the active schedule is saved, together
/// with the settings it was generated with.
pub async fn save_timetable(
    State(state): State<AppState>,
    Json(request): Json<SaveTimetableRequest>,
) -> Result<(StatusCode, Json<Timetable>), AppError> {
    let repo = state.repository.as_ref();

    let (entries, settings) = match (request.entries, request.settings) {
        (Some(entries), Some(settings)) => (entries, settings),
        (Some(entries), None) => (entries, db_services::get_settings(repo).await?),
        (None, explicit) => match db_services::get_active(repo).await? {
            Some(active) => (active.entries, explicit.unwrap_or(active.settings)),
            None => (
                Vec::new(),
                match explicit {
                    Some(settings) => settings,
                    None => db_services::get_settings(repo).await?,
                },
            ),
        },
    };

    let timetable = db_services::create_timetable(
        repo,
        NewTimetable {
            title: request.title,
            description: request.description,
            entries,
            settings,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(timetable)))
}

/// GET /api/timetables
///
/// Summaries of all saved timetables, newest first.
pub async fn list_timetables(State(state): State<AppState>) -> HandlerResult<TimetableListResponse> {
    let timetables = db_services::list_timetables(state.repository.as_ref()).await?;
    let total = timetables.len();
    Ok(Json(TimetableListResponse { timetables, total }))
}

/// GET /api/timetables/{id}
pub async fn get_timetable(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<Timetable> {
    let timetable = db_services::get_timetable(state.repository.as_ref(), TimetableId::new(id)).await?;
    Ok(Json(timetable))
}

/// PUT /api/timetables/{id}/entries
///
/// Replace every entry of a saved timetable.
pub async fn replace_entries(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ReplaceEntriesRequest>,
) -> HandlerResult<Timetable> {
    let timetable = db_services::replace_timetable_entries(
        state.repository.as_ref(),
        TimetableId::new(id),
        request.entries,
    )
    .await?;
    Ok(Json(timetable))
}

/// GET /api/timetables/{id}/grid
///
/// Render a saved timetable on the grid derived from its stored settings.
pub async fn get_timetable_grid(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<RenderedGrid> {
    let grid = db_services::render_timetable(state.repository.as_ref(), TimetableId::new(id)).await?;
    Ok(Json(grid))
}

/// DELETE /api/timetables/{id}
///
/// Idempotent: deleting an unknown id also succeeds.
pub async fn delete_timetable(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<MessageResponse> {
    db_services::delete_timetable(state.repository.as_ref(), TimetableId::new(id)).await?;
    Ok(Json(MessageResponse::new("Timetable deleted")))
}

// =============================================================================
// Directory
// =============================================================================

/// GET /api/faculty
pub async fn list_faculty(State(state): State<AppState>) -> HandlerResult<NamesResponse> {
    let directory = db_services::directory(state.repository.as_ref()).await?;
    Ok(Json(NamesResponse {
        names: directory.faculty.into_iter().collect(),
    }))
}

/// GET /api/rooms
pub async fn list_rooms(State(state): State<AppState>) -> HandlerResult<NamesResponse> {
    let directory = db_services::directory(state.repository.as_ref()).await?;
    Ok(Json(NamesResponse {
        names: directory.rooms.into_iter().collect(),
    }))
}
