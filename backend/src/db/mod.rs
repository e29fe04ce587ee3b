//! Persistence for timetables, the active schedule, and institution settings.
//!
//! Storage is reached through the Repository pattern so backends can be
//! swapped without touching the service layer or the HTTP handlers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, generation orchestrator)  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Timetable invariants     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!          ┌──────────┴──────────┐
//!   ┌──────▼───────┐     ┌───────▼───────┐
//!   │ Local (mem)  │     │ File (JSON)   │
//!   └──────────────┘     └───────────────┘
//! ```
//!
//! The module includes:
//! - `services`: high-level operations (use these in your application)
//! - `repository`: trait definitions and error types
//! - `repositories::local`: in-memory implementation for tests and development
//! - `repositories::file`: JSON snapshot on disk
//! - `factory`: builds the configured backend at startup
//!
//! # Recommended Usage
//!
//! ```ignore
//! use timetable_rust::config::AppConfig;
//! use timetable_rust::db::{services, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let repo = RepositoryFactory::from_config(&config)?;
//!     let timetables = services::list_timetables(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```
//!
//! There is no process-wide repository: the server builds one at startup and
//! passes it down through the HTTP state.

pub mod factory;
pub mod repositories;
pub mod repository;
pub mod services;

pub use services::{
    create_timetable, delete_timetable, get_timetable, health_check, list_timetables,
    render_active, render_timetable, replace_timetable_entries, NewTimetable,
};

pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::{FileRepository, LocalRepository};
pub use repository::{
    ActiveScheduleRepository, DirectoryRepository, ErrorContext, FullRepository, RepositoryError,
    RepositoryResult, SettingsRepository, TimetableRepository,
};
