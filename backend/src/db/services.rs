//! High-level timetable service layer.
//!
//! Repository-agnostic operations holding the timetable invariants. Backends
//! store whatever they are given; every check that ties entries to the grid
//! of their settings happens here, before anything is written.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers / generation orchestrator                │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - entry/grid validation on create and replace          │
//! │  - render from stored settings                          │
//! │  - settings validation                                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                        │
//! └───────────────────┬─────────────────────────────────────┘
//!          ┌──────────┴──────────┐
//!   ┌──────▼───────┐     ┌───────▼───────┐
//!   │ Local (mem)  │     │ File (JSON)   │
//!   └──────────────┘     └───────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use timetable_rust::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let timetables = services::list_timetables(&repo).await?;
//!     println!("Found {} timetables", timetables.len());
//!     Ok(())
//! }
//! ```

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};
use crate::models::{
    ActiveSchedule, Directory, Entry, ScheduleSettings, Timetable, TimetableId, TimetableInfo,
};
use crate::services::render::{render_grid, RenderedGrid};
use crate::services::slot_grid::{compute_slots, validate_settings};
use crate::services::validation::validate_entries;

/// Caller-supplied parts of a new timetable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimetable {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    pub settings: ScheduleSettings,
}

// ==================== Health ====================

pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Timetables ====================

/// Validate and store a new timetable.
///
/// Fails with a configuration error when the settings are unusable (no grid,
/// unknown or repeated working days, break out of range), and with a
/// validation error naming every entry whose day is not a working day or
/// whose slot the settings do not produce.
pub async fn create_timetable<R: FullRepository + ?Sized>(
    repo: &R,
    new: NewTimetable,
) -> RepositoryResult<Timetable> {
    if new.title.trim().is_empty() {
        return Err(RepositoryError::validation_with_context(
            "title must not be blank",
            ErrorContext::new("create_timetable").with_entity("title"),
        ));
    }
    validate_settings(&new.settings)
        .map_err(|e| RepositoryError::from(e).with_operation("create_timetable"))?;
    validate_entries(&new.entries, &new.settings)
        .map_err(|e| RepositoryError::from(e).with_operation("create_timetable"))?;

    let mut timetable = Timetable::new(new.title, new.description, new.entries, new.settings);
    let info = repo.store_timetable(&timetable).await?;
    timetable.id = Some(info.id);

    info!(
        "Stored timetable {} '{}' with {} entries",
        info.id, info.title, info.entry_count
    );
    Ok(timetable)
}

pub async fn get_timetable<R: FullRepository + ?Sized>(
    repo: &R,
    id: TimetableId,
) -> RepositoryResult<Timetable> {
    repo.get_timetable(id)
        .await
        .map_err(|e| e.with_operation("get_timetable"))
}

/// Summaries of all timetables, newest first.
pub async fn list_timetables<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<TimetableInfo>> {
    repo.list_timetables().await
}

/// Delete a timetable. Deleting an id that does not exist succeeds.
pub async fn delete_timetable<R: FullRepository + ?Sized>(
    repo: &R,
    id: TimetableId,
) -> RepositoryResult<()> {
    if repo.delete_timetable(id).await? {
        info!("Deleted timetable {}", id);
    } else {
        debug!("Delete of timetable {} ignored, already absent", id);
    }
    Ok(())
}

/// Replace every entry of a stored timetable, validated against its stored settings.
pub async fn replace_timetable_entries<R: FullRepository + ?Sized>(
    repo: &R,
    id: TimetableId,
    entries: Vec<Entry>,
) -> RepositoryResult<Timetable> {
    let mut timetable = get_timetable(repo, id).await?;
    validate_entries(&entries, &timetable.settings).map_err(|e| {
        RepositoryError::from(e)
            .with_operation("replace_timetable_entries")
            .with_entity("timetable", id)
    })?;

    repo.replace_entries(id, entries.clone()).await?;
    info!("Replaced entries of timetable {} ({} entries)", id, entries.len());
    timetable.entries = entries;
    Ok(timetable)
}

/// Render a stored timetable on the grid rebuilt from its own settings.
pub async fn render_timetable<R: FullRepository + ?Sized>(
    repo: &R,
    id: TimetableId,
) -> RepositoryResult<RenderedGrid> {
    let timetable = get_timetable(repo, id).await?;
    let directory = repo.directory().await?;
    render_grid(&timetable.entries, &timetable.settings, &directory).map_err(|e| {
        RepositoryError::from(e)
            .with_operation("render_timetable")
            .with_entity("timetable", id)
    })
}

// ==================== Active schedule ====================

pub async fn get_active<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Option<ActiveSchedule>> {
    repo.fetch_active().await
}

/// Render the active schedule, or an empty grid of the current settings
/// before anything has been generated.
pub async fn render_active<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<RenderedGrid> {
    let directory = repo.directory().await?;
    let rendered = match repo.fetch_active().await? {
        Some(active) => render_grid(&active.entries, &active.settings, &directory),
        None => render_grid(&[], &repo.get_settings().await?, &directory),
    };
    rendered.map_err(|e| RepositoryError::from(e).with_operation("render_active"))
}

// ==================== Settings ====================

pub async fn get_settings<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<ScheduleSettings> {
    repo.get_settings().await
}

/// Validate and store institution settings.
///
/// Stored timetables keep their own settings; only renders of the active
/// schedule before the next generation and future generations are affected.
pub async fn save_settings<R: FullRepository + ?Sized>(
    repo: &R,
    settings: ScheduleSettings,
) -> RepositoryResult<ScheduleSettings> {
    validate_settings(&settings)
        .map_err(|e| RepositoryError::from(e).with_operation("save_settings"))?;
    repo.save_settings(&settings).await?;
    info!(
        "Saved settings: start {} x{} slots of {} min",
        settings.start_time, settings.slots_per_day, settings.slot_duration_minutes
    );
    Ok(settings)
}

pub async fn reset_settings<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<ScheduleSettings> {
    repo.reset_settings().await
}

/// Slot labels of the current settings.
pub async fn current_slots<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<String>> {
    let settings = repo.get_settings().await?;
    compute_slots(&settings).map_err(|e| RepositoryError::from(e).with_operation("current_slots"))
}

// ==================== Directory ====================

pub async fn directory<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Directory> {
    repo.directory().await
}
