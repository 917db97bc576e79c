pub mod directory;
pub mod generator;

pub use directory::Directory;
pub use generator::{align_to_half_hour, normalize_start_date, ScheduleGenerator, SchedulePolicy};
