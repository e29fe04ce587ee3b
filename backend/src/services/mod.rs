//! Timetable domain services.
//!
//! Pure grid computation (`slot_grid`, `entry_index`, `render`, `validation`)
//! sits beside the pieces that talk to the outside world (`solver`) and the
//! orchestration that ties them to the repository (`generation`).

pub mod entry_index;
pub mod generation;
pub mod generation_tracker;
pub mod render;
pub mod slot_grid;
pub mod solver;
pub mod validation;

pub use entry_index::{CellConflict, EntryIndex, OrphanReason, OrphanedEntryWarning};
pub use generation::{
    GenerationError, GenerationOrchestrator, GenerationOutcome, GenerationRequest,
};
pub use generation_tracker::{GenerationRecord, GenerationState, GenerationTracker};
pub use render::{render_grid, RenderedGrid};
pub use slot_grid::{compute_slots, validate_settings, GridError};
pub use solver::{HttpSolverClient, SolverClient, SolverError, SolverRequest};
pub use validation::{FieldViolation, SubjectRequest};
