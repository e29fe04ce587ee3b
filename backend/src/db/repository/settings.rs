//! Institution settings persistence.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::ScheduleSettings;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Stored settings, or the backend's defaults when none were saved.
    async fn get_settings(&self) -> RepositoryResult<ScheduleSettings>;

    async fn save_settings(&self, settings: &ScheduleSettings) -> RepositoryResult<()>;

    /// Restore and return the defaults.
    async fn reset_settings(&self) -> RepositoryResult<ScheduleSettings>;
}
