//! Repository factory for dependency injection.
//!
//! The server builds exactly one repository at startup and hands it to the
//! HTTP state; nothing in the crate reaches for a process-wide instance.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use super::repositories::{FileRepository, LocalRepository};
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::config::{AppConfig, RepositorySettings};
use crate::models::{Directory, ScheduleSettings};

/// Snapshot path used by the file backend when none is configured.
pub const DEFAULT_SNAPSHOT_PATH: &str = "timetables.json";

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
    /// JSON snapshot on disk
    File,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("local", "memory", "file", "json").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "file" | "json" => Ok(Self::File),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```
/// use timetable_rust::db::RepositoryFactory;
///
/// let repo = RepositoryFactory::create_local(Default::default());
/// # let _ = repo;
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `path` - Snapshot path (file backend only)
    /// * `defaults` - Settings returned until the institution saves its own
    /// * `directory` - Faculty and room registries to seed; `None` keeps what
    ///   the backend already holds
    pub fn create(
        repo_type: RepositoryType,
        path: Option<PathBuf>,
        defaults: ScheduleSettings,
        directory: Option<Directory>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => {
                let repo = LocalRepository::with_default_settings(defaults);
                let repo = match directory {
                    Some(directory) => repo.with_directory(directory),
                    None => repo,
                };
                Ok(Arc::new(repo))
            }
            RepositoryType::File => {
                let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH));
                let repo = FileRepository::open(path, defaults)?;
                if let Some(directory) = directory {
                    repo.seed_directory(directory)?;
                }
                Ok(Arc::new(repo))
            }
        }
    }

    /// Create an in-memory local repository.
    pub fn create_local(defaults: ScheduleSettings) -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::with_default_settings(defaults))
    }

    /// Create the repository described by a repository settings section.
    pub fn from_settings(
        settings: &RepositorySettings,
        defaults: ScheduleSettings,
        directory: Option<Directory>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = RepositoryType::from_str(&settings.repo_type).map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        Self::create(repo_type, settings.path.clone(), defaults, directory)
    }

    /// Create the repository described by the application configuration,
    /// seeded with its `[directory]` table.
    pub fn from_config(config: &AppConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        Self::from_settings(
            &config.repository,
            config.default_settings(),
            config.directory.clone(),
        )
    }
}
