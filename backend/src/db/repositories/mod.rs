//! Repository implementations.
//!
//! - `local`: In-memory implementation for unit testing and local development
//! - `file`: Same data model persisted as a JSON snapshot on disk
pub mod file;
pub mod local;

pub use file::FileRepository;
pub use local::LocalRepository;
