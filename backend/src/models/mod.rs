pub mod directory;
pub mod entry;
pub mod macros;
pub mod settings;
pub mod timetable;

pub use directory::*;
pub use entry::*;
pub use settings::*;
pub use timetable::*;
