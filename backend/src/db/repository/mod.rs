//! Repository trait definitions for timetable persistence.
//!
//! Storage concerns are split across focused traits so a backend can be
//! tested one concern at a time.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`timetable`]: Saved timetables keyed by id
//! - [`active`]: The current working entry set
//! - [`settings`]: Institution schedule settings
//! - [`directory`]: Read-only faculty and room names
//!
//! # Convenience Trait Bound
//!
//! For code that needs every capability, use [`FullRepository`]:
//!
//! ```ignore
//! async fn save_current<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let settings = repo.get_settings().await?;
//!     let active = repo.fetch_active().await?;
//!     // ...
//!     Ok(())
//! }
//! ```

pub mod active;
pub mod directory;
pub mod error;
pub mod settings;
pub mod timetable;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use active::ActiveScheduleRepository;
pub use directory::DirectoryRepository;
pub use settings::SettingsRepository;
pub use timetable::TimetableRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type implementing all four traits.
pub trait FullRepository:
    TimetableRepository + ActiveScheduleRepository + SettingsRepository + DirectoryRepository
{
}

impl<T> FullRepository for T where
    T: TimetableRepository + ActiveScheduleRepository + SettingsRepository + DirectoryRepository
{
}
