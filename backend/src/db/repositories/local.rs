//! In-memory local repository implementation.
//!
//! All data lives in a single `LocalData` value behind a lock, which gives
//! whole-value replacement semantics for free: every mutation happens under
//! one write guard, so readers never see a half-replaced entry set. The same
//! `LocalData` is what the file-backed repository snapshots to disk.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::{
    ActiveSchedule, Directory, Entry, ScheduleSettings, Timetable, TimetableId, TimetableInfo,
};

/// Everything a repository backend stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LocalData {
    timetables: BTreeMap<TimetableId, Timetable>,
    #[serde(default)]
    active: Option<ActiveSchedule>,
    #[serde(default)]
    settings: Option<ScheduleSettings>,
    #[serde(default)]
    directory: Directory,
    next_id: i64,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            timetables: BTreeMap::new(),
            active: None,
            settings: None,
            directory: Directory::default(),
            next_id: 1,
        }
    }
}

impl LocalData {
    pub(crate) fn store(&mut self, timetable: &Timetable) -> TimetableInfo {
        let id = match timetable.id {
            Some(id) => {
                self.next_id = self.next_id.max(id.value() + 1);
                id
            }
            None => {
                let id = TimetableId::new(self.next_id);
                self.next_id += 1;
                id
            }
        };

        let mut stored = timetable.clone();
        stored.id = Some(id);
        let info = stored.summary(id);
        self.timetables.insert(id, stored);
        info
    }

    pub(crate) fn get(&self, id: TimetableId) -> RepositoryResult<Timetable> {
        self.timetables.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found(format!("Timetable {} not found", id))
                .with_entity("timetable", id)
        })
    }

    pub(crate) fn list(&self) -> Vec<TimetableInfo> {
        let mut infos: Vec<TimetableInfo> = self
            .timetables
            .iter()
            .map(|(id, tt)| tt.summary(*id))
            .collect();
        infos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        infos
    }

    pub(crate) fn replace_entries(
        &mut self,
        id: TimetableId,
        entries: Vec<Entry>,
    ) -> RepositoryResult<()> {
        let timetable = self.timetables.get_mut(&id).ok_or_else(|| {
            RepositoryError::not_found(format!("Timetable {} not found", id))
                .with_entity("timetable", id)
        })?;
        timetable.entries = entries;
        Ok(())
    }

    pub(crate) fn delete(&mut self, id: TimetableId) -> bool {
        self.timetables.remove(&id).is_some()
    }

    pub(crate) fn active(&self) -> Option<ActiveSchedule> {
        self.active.clone()
    }

    pub(crate) fn set_active(&mut self, active: ActiveSchedule) {
        self.active = Some(active);
    }

    pub(crate) fn settings_or(&self, defaults: &ScheduleSettings) -> ScheduleSettings {
        self.settings.clone().unwrap_or_else(|| defaults.clone())
    }

    pub(crate) fn set_settings(&mut self, settings: Option<ScheduleSettings>) {
        self.settings = settings;
    }

    pub(crate) fn directory(&self) -> Directory {
        self.directory.clone()
    }

    pub(crate) fn set_directory(&mut self, directory: Directory) {
        self.directory = directory;
    }

    pub(crate) fn len(&self) -> usize {
        self.timetables.len()
    }

    pub(crate) fn contains(&self, id: TimetableId) -> bool {
        self.timetables.contains_key(&id)
    }
}

/// In-memory local repository.
///
/// Suitable for unit tests and local development. Cloning shares the
/// underlying store.
///
/// # Example
/// ```
/// use timetable_rust::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// assert_eq!(repo.timetable_count(), 0);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    defaults: Arc<ScheduleSettings>,
    healthy: Arc<RwLock<bool>>,
}

impl LocalRepository {
    /// Create a new empty local repository with the built-in default settings.
    pub fn new() -> Self {
        Self::with_default_settings(ScheduleSettings::default())
    }

    /// Create a new empty repository whose `get_settings` falls back to `defaults`.
    pub fn with_default_settings(defaults: ScheduleSettings) -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            defaults: Arc::new(defaults),
            healthy: Arc::new(RwLock::new(true)),
        }
    }

    /// Seed the faculty and room registries.
    pub fn set_directory(&self, directory: Directory) {
        self.data.write().set_directory(directory);
    }

    pub fn with_directory(self, directory: Directory) -> Self {
        self.set_directory(directory);
        self
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        *self.healthy.write() = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        *self.data.write() = LocalData::default();
    }

    /// Get the number of timetables stored.
    pub fn timetable_count(&self) -> usize {
        self.data.read().len()
    }

    /// Check if a timetable exists.
    pub fn has_timetable(&self, id: TimetableId) -> bool {
        self.data.read().contains(id)
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !*self.healthy.read() {
            return Err(RepositoryError::connection("Store is not healthy"));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TimetableRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(*self.healthy.read())
    }

    async fn store_timetable(&self, timetable: &Timetable) -> RepositoryResult<TimetableInfo> {
        self.check_health()?;
        Ok(self.data.write().store(timetable))
    }

    async fn get_timetable(&self, id: TimetableId) -> RepositoryResult<Timetable> {
        self.check_health()?;
        self.data.read().get(id)
    }

    async fn list_timetables(&self) -> RepositoryResult<Vec<TimetableInfo>> {
        self.check_health()?;
        Ok(self.data.read().list())
    }

    async fn replace_entries(&self, id: TimetableId, entries: Vec<Entry>) -> RepositoryResult<()> {
        self.check_health()?;
        self.data.write().replace_entries(id, entries)
    }

    async fn delete_timetable(&self, id: TimetableId) -> RepositoryResult<bool> {
        self.check_health()?;
        Ok(self.data.write().delete(id))
    }
}

#[async_trait]
impl ActiveScheduleRepository for LocalRepository {
    async fn fetch_active(&self) -> RepositoryResult<Option<ActiveSchedule>> {
        self.check_health()?;
        Ok(self.data.read().active())
    }

    async fn replace_active(&self, active: ActiveSchedule) -> RepositoryResult<()> {
        self.check_health()?;
        self.data.write().set_active(active);
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for LocalRepository {
    async fn get_settings(&self) -> RepositoryResult<ScheduleSettings> {
        self.check_health()?;
        Ok(self.data.read().settings_or(&self.defaults))
    }

    async fn save_settings(&self, settings: &ScheduleSettings) -> RepositoryResult<()> {
        self.check_health()?;
        self.data.write().set_settings(Some(settings.clone()));
        Ok(())
    }

    async fn reset_settings(&self) -> RepositoryResult<ScheduleSettings> {
        self.check_health()?;
        self.data.write().set_settings(None);
        Ok(self.defaults.as_ref().clone())
    }
}

#[async_trait]
impl DirectoryRepository for LocalRepository {
    async fn directory(&self) -> RepositoryResult<Directory> {
        self.check_health()?;
        Ok(self.data.read().directory())
    }
}
