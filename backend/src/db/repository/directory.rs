//! Read-only faculty and room registries.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::Directory;

/// Name lookups only; registry maintenance happens elsewhere.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    async fn directory(&self) -> RepositoryResult<Directory>;
}
