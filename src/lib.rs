pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::readers::{CsvReader, JsonReader, ReaderRegistry};
pub use crate::adapters::writers::{JsonWriter, WriteOptions, WriterRegistry, XmlWriter};
pub use crate::config::{toml_config::TomlConfig, Settings};
pub use crate::core::assigner::{OrphanPolicy, RoomAssigner};
pub use crate::core::engine::{AssignmentEngine, RunReport, Stage};
pub use crate::domain::model::{AssignmentOutcome, EnrichedRoom, Id, Record, Room, Student};
pub use crate::domain::ports::{RecordReader, RoomWriter};
pub use crate::utils::error::{EtlError, Result};
