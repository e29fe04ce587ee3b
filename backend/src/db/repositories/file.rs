//! JSON-file repository implementation.
//!
//! Holds the same `LocalData` as the in-memory backend and writes a pretty
//! JSON snapshot after every mutation. A mutation is applied to a copy, the
//! copy is written to `<path>.tmp` and renamed over the snapshot, and only
//! then swapped in, so a failed write leaves both disk and memory unchanged.

use async_trait::async_trait;
use log::{debug, info};
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};

use super::local::LocalData;
use crate::db::repository::*;
use crate::models::{
    ActiveSchedule, Directory, Entry, ScheduleSettings, Timetable, TimetableId, TimetableInfo,
};

/// Repository persisted to a single JSON document on disk.
pub struct FileRepository {
    path: PathBuf,
    data: RwLock<LocalData>,
    defaults: ScheduleSettings,
}

impl FileRepository {
    /// Open the snapshot at `path`, starting empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>, defaults: ScheduleSettings) -> RepositoryResult<Self> {
        let path = path.into();
        let data = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| {
                RepositoryError::connection(format!(
                    "Failed to read snapshot {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let data: LocalData = serde_json::from_str(&contents)?;
            info!("Loaded {} timetables from {}", data.len(), path.display());
            data
        } else {
            info!("No snapshot at {}, starting empty", path.display());
            LocalData::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
            defaults,
        })
    }

    /// Replace the faculty and room registries, writing the snapshot only
    /// when they change.
    pub fn seed_directory(&self, directory: Directory) -> RepositoryResult<()> {
        if self.data.read().directory() == directory {
            return Ok(());
        }
        info!(
            "Seeding directory with {} faculty and {} rooms",
            directory.faculty.len(),
            directory.rooms.len()
        );
        self.mutate(|data| {
            data.set_directory(directory);
            Ok(())
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, data: &LocalData) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serialized)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Wrote snapshot {}", self.path.display());
        Ok(())
    }

    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut LocalData) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        let mut guard = self.data.write();
        let mut next = guard.clone();
        let out = f(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(out)
    }
}

#[async_trait]
impl TimetableRepository for FileRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self
            .path
            .parent()
            .map(|p| p.as_os_str().is_empty() || p.exists())
            .unwrap_or(true))
    }

    async fn store_timetable(&self, timetable: &Timetable) -> RepositoryResult<TimetableInfo> {
        self.mutate(|data| Ok(data.store(timetable)))
    }

    async fn get_timetable(&self, id: TimetableId) -> RepositoryResult<Timetable> {
        self.data.read().get(id)
    }

    async fn list_timetables(&self) -> RepositoryResult<Vec<TimetableInfo>> {
        Ok(self.data.read().list())
    }

    async fn replace_entries(&self, id: TimetableId, entries: Vec<Entry>) -> RepositoryResult<()> {
        self.mutate(|data| data.replace_entries(id, entries))
    }

    async fn delete_timetable(&self, id: TimetableId) -> RepositoryResult<bool> {
        if !self.data.read().contains(id) {
            return Ok(false);
        }
        self.mutate(|data| Ok(data.delete(id)))
    }
}

#[async_trait]
impl ActiveScheduleRepository for FileRepository {
    async fn fetch_active(&self) -> RepositoryResult<Option<ActiveSchedule>> {
        Ok(self.data.read().active())
    }

    async fn replace_active(&self, active: ActiveSchedule) -> RepositoryResult<()> {
        self.mutate(|data| {
            data.set_active(active);
            Ok(())
        })
    }
}

#[async_trait]
impl SettingsRepository for FileRepository {
    async fn get_settings(&self) -> RepositoryResult<ScheduleSettings> {
        Ok(self.data.read().settings_or(&self.defaults))
    }

    async fn save_settings(&self, settings: &ScheduleSettings) -> RepositoryResult<()> {
        self.mutate(|data| {
            data.set_settings(Some(settings.clone()));
            Ok(())
        })
    }

    async fn reset_settings(&self) -> RepositoryResult<ScheduleSettings> {
        self.mutate(|data| {
            data.set_settings(None);
            Ok(())
        })?;
        Ok(self.defaults.clone())
    }
}

#[async_trait]
impl DirectoryRepository for FileRepository {
    async fn directory(&self) -> RepositoryResult<Directory> {
        Ok(self.data.read().directory())
    }
}
