//! Saved timetable CRUD.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Entry, Timetable, TimetableId, TimetableInfo};

/// Document-style store of timetables keyed by id.
///
/// Implementations persist whatever they are given; invariant checks live in
/// the service layer (`db::services`).
#[async_trait]
pub trait TimetableRepository: Send + Sync {
    /// Check if the store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Store a timetable.
    ///
    /// A timetable without an id is inserted under a freshly assigned id; one
    /// with an id overwrites the stored document (last write wins).
    async fn store_timetable(&self, timetable: &Timetable) -> RepositoryResult<TimetableInfo>;

    /// Retrieve a timetable by id.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the timetable doesn't exist
    async fn get_timetable(&self, id: TimetableId) -> RepositoryResult<Timetable>;

    /// List summaries of every timetable, newest created first.
    async fn list_timetables(&self) -> RepositoryResult<Vec<TimetableInfo>>;

    /// Replace the whole entry list of a stored timetable in one step.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the timetable doesn't exist
    async fn replace_entries(&self, id: TimetableId, entries: Vec<Entry>) -> RepositoryResult<()>;

    /// Delete a timetable.
    ///
    /// # Returns
    /// * `Ok(true)` if a timetable was removed, `Ok(false)` if none existed
    async fn delete_timetable(&self, id: TimetableId) -> RepositoryResult<bool>;
}
