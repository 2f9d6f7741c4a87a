use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Required {what} not found: {}", path.display())]
    MissingFileError { what: &'static str, path: PathBuf },

    #[error("Environment variable '{key}' is not set")]
    MissingEnvError { key: String },

    #[error("Configuration key '{key}' is missing")]
    MissingConfigError { key: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Error: Could not load database adaptor {engine}!")]
    UnsupportedDbEngineError { engine: String },

    #[error("Error: Could not load model {route}!")]
    UnknownModelError { route: String },

    #[error("Error: Could not load library {route}!")]
    UnknownLibraryError { route: String },

    #[error("Error: Could not call action {route}!")]
    UnknownActionError { route: String },

    #[error("Service not found: {key}")]
    ServiceNotFoundError { key: String },

    #[error("Service '{key}' is not a {expected}")]
    ServiceMismatchError { key: String, expected: &'static str },

    #[error("Command \"{name}\" not found")]
    UnknownCommandError { name: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Environment file error: {0}")]
    DotenvError(#[from] dotenvy::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Pattern error: {0}")]
    PatternError(#[from] regex::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Environment,
    Configuration,
    Service,
    Database,
    Command,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl CartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CartError::MissingFileError { .. }
            | CartError::MissingEnvError { .. }
            | CartError::DotenvError(_) => ErrorCategory::Environment,
            CartError::MissingConfigError { .. }
            | CartError::InvalidConfigValueError { .. }
            | CartError::TomlError(_)
            | CartError::PatternError(_) => ErrorCategory::Configuration,
            CartError::UnknownModelError { .. }
            | CartError::UnknownLibraryError { .. }
            | CartError::UnknownActionError { .. }
            | CartError::ServiceNotFoundError { .. }
            | CartError::ServiceMismatchError { .. } => ErrorCategory::Service,
            CartError::UnsupportedDbEngineError { .. } | CartError::DatabaseError(_) => {
                ErrorCategory::Database
            }
            CartError::UnknownCommandError { .. } => ErrorCategory::Command,
            CartError::IoError(_) | CartError::SerializationError(_) | CartError::CsvError(_) => {
                ErrorCategory::Io
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Command => ErrorSeverity::Medium,
            ErrorCategory::Service | ErrorCategory::Io => ErrorSeverity::High,
            ErrorCategory::Environment
            | ErrorCategory::Configuration
            | ErrorCategory::Database => ErrorSeverity::Critical,
        }
    }

    /// 給使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            CartError::MissingFileError { what, path } => {
                format!("Cannot start: {} is missing at {}", what, path.display())
            }
            CartError::ServiceNotFoundError { key } => {
                format!("The '{}' service is not available; did the bootstrap run?", key)
            }
            CartError::UnknownCommandError { name } => format!("Unknown command: {}", name),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CartError::MissingFileError { .. } => {
                "Check --base-dir points at the store root and that the file exists"
            }
            CartError::MissingEnvError { .. } | CartError::DotenvError(_) => {
                "Add the variable to the .env file or export it in the shell"
            }
            CartError::MissingConfigError { .. }
            | CartError::InvalidConfigValueError { .. }
            | CartError::TomlError(_)
            | CartError::PatternError(_) => "Fix the config layer under the config directory",
            CartError::UnsupportedDbEngineError { .. } => {
                "Set db_engine to one of: sqlite, memory"
            }
            CartError::DatabaseError(_) => "Verify db_database points at a readable database",
            CartError::UnknownCommandError { .. } => "Run `cart help` to list commands",
            CartError::UnknownModelError { .. }
            | CartError::UnknownLibraryError { .. }
            | CartError::UnknownActionError { .. } => {
                "Remove the route from the autoload/event config or correct its spelling"
            }
            CartError::ServiceNotFoundError { .. } | CartError::ServiceMismatchError { .. } => {
                "Make sure the command declares that it needs the framework"
            }
            CartError::IoError(_) | CartError::SerializationError(_) | CartError::CsvError(_) => {
                "Check file permissions and free disk space"
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
