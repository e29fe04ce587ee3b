//! The current working entry set.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::ActiveSchedule;

#[async_trait]
pub trait ActiveScheduleRepository: Send + Sync {
    /// The active schedule, or `None` before the first generation.
    async fn fetch_active(&self) -> RepositoryResult<Option<ActiveSchedule>>;

    /// Swap in a new active schedule.
    ///
    /// Readers observe either the previous set or the new one, never a mix.
    async fn replace_active(&self, active: ActiveSchedule) -> RepositoryResult<()>;
}
