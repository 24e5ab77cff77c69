pub mod toml_config;

use crate::adapters::readers::ReaderRegistry;
use crate::adapters::writers::{WriteOptions, WriterRegistry};
use crate::core::assigner::{OrphanPolicy, RoomAssigner};
use crate::core::engine::AssignmentEngine;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, Validate};
use self::toml_config::{TomlConfig, MAX_INDENT};

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

/// Fully resolved run settings (file values with command line overrides applied).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub orphan_policy: OrphanPolicy,
    pub write: WriteOptions,
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let defaults = WriteOptions::default();
        Self {
            orphan_policy: config.assignment.orphan_policy.unwrap_or_default(),
            write: WriteOptions {
                pretty: config.output.pretty.unwrap_or(defaults.pretty),
                indent: config.output.indent.unwrap_or(defaults.indent),
                include_student_room: config
                    .output
                    .include_student_room
                    .unwrap_or(defaults.include_student_room),
            },
        }
    }

    pub fn engine(&self) -> AssignmentEngine {
        AssignmentEngine::new(
            ReaderRegistry::with_defaults(),
            WriterRegistry::with_options(self.write.clone()),
            RoomAssigner::new(self.orphan_policy),
        )
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_range("output.indent", self.write.indent, 0, MAX_INDENT)
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "room-assign")]
#[command(about = "Assign students to rooms and export the result as JSON or XML")]
pub struct CliConfig {
    /// Path to the students file
    #[arg(long)]
    pub students: String,

    /// Path to the rooms file
    #[arg(long)]
    pub rooms: String,

    /// Path to the output file. Provide a .json or .xml extension
    #[arg(long)]
    pub output_file: String,

    /// Optional TOML settings file
    #[arg(long)]
    pub config: Option<String>,

    /// How to treat students whose room does not exist
    #[arg(long, value_enum)]
    pub orphans: Option<OrphanPolicy>,

    /// Keep each student's room id in the output
    #[arg(long)]
    pub include_student_room: bool,

    /// Write compact output instead of indented output
    #[arg(long)]
    pub compact: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 讀取設定檔後套用命令列覆蓋值
    pub fn settings(&self) -> Result<Settings> {
        let file_config = match &self.config {
            Some(path) => {
                let config = TomlConfig::from_file(path)?;
                config.validate()?;
                config
            }
            None => TomlConfig::default(),
        };

        let mut settings = Settings::from_toml(&file_config);
        if let Some(policy) = self.orphans {
            settings.orphan_policy = policy;
        }
        if self.include_student_room {
            settings.write.include_student_room = true;
        }
        if self.compact {
            settings.write.pretty = false;
        }

        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("students", &self.students)?;
        validate_path("rooms", &self.rooms)?;
        validate_path("output_file", &self.output_file)?;
        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }
        Ok(())
    }
}
