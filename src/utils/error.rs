use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported output format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Failed to write {}: {message}", path.display())]
    Serialization { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("Duplicate room id: {id}")]
    DuplicateRoom { id: String },

    #[error("Student {student} references unknown room {room}")]
    OrphanStudent { student: String, room: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Output,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::NotFound { .. } | EtlError::Parse { .. } => ErrorCategory::Input,
            EtlError::UnsupportedFormat { .. } | EtlError::Serialization { .. } => {
                ErrorCategory::Output
            }
            EtlError::Config { .. } | EtlError::Validation { .. } => ErrorCategory::Configuration,
            EtlError::DuplicateRoom { .. } | EtlError::OrphanStudent { .. } => ErrorCategory::Data,
            EtlError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Data | ErrorCategory::Output => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 失敗時一律回傳非零退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::NotFound { path } => {
                format!("Cannot find input file '{}'", path.display())
            }
            EtlError::Parse { path, .. } => {
                format!("Input file '{}' is not valid", path.display())
            }
            EtlError::UnsupportedFormat { extension } if extension.is_empty() => {
                "Output file has no extension".to_string()
            }
            EtlError::UnsupportedFormat { extension } => {
                format!("Output format '{}' is not supported", extension)
            }
            EtlError::Serialization { path, .. } => {
                format!("Could not write output file '{}'", path.display())
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::NotFound { .. } => "Check the --students and --rooms paths",
            EtlError::Parse { .. } => {
                "Make sure the file holds an array of objects with id, name (and room for students)"
            }
            EtlError::UnsupportedFormat { .. } => "Use an output file ending in .json or .xml",
            EtlError::Serialization { .. } => {
                "Check that the output directory exists and is writable"
            }
            EtlError::Config { .. } | EtlError::Validation { .. } => {
                "Review the command line flags and the TOML config file"
            }
            EtlError::DuplicateRoom { .. } => "Give every room a unique id",
            EtlError::OrphanStudent { .. } => {
                "Fix the student's room reference or rerun with --orphans drop"
            }
            EtlError::Io(_) => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
