pub mod assigner;
pub mod engine;

pub use crate::domain::model::{AssignmentOutcome, EnrichedRoom, Id, Record, Room, Student};
pub use crate::domain::ports::{RecordReader, RoomWriter};
pub use crate::utils::error::Result;
