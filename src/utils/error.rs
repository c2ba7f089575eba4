use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    #[error("Stage already exists for event {event}: {stage}")]
    StageAlreadyExists { event: String, stage: String },

    #[error("Tournament incomplete: {detail}")]
    IncompleteTournament { unfinished: usize, detail: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    State,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EngineError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        EngineError::InvalidState {
            message: message.into(),
        }
    }

    pub fn not_found(kind: &str, id: impl ToString) -> Self {
        EngineError::NotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EngineError::InvalidInput { .. } | EngineError::NotFound { .. } => {
                ErrorCategory::Input
            }
            EngineError::InvalidState { .. }
            | EngineError::StageAlreadyExists { .. }
            | EngineError::IncompleteTournament { .. } => ErrorCategory::State,
            EngineError::ConfigError { .. }
            | EngineError::ConfigValidationError { .. }
            | EngineError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EngineError::IoError(_)
            | EngineError::SerializationError(_)
            | EngineError::CsvError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // the caller can wait for more results and try again
            ErrorCategory::State => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EngineError::IncompleteTournament { unfinished, .. } if *unfinished > 0 => format!(
                "Ratings cannot be finalized yet: {} match(es) still have no result",
                unfinished
            ),
            EngineError::StageAlreadyExists { stage, .. } => {
                format!("The {} stage has already been created for this event", stage)
            }
            EngineError::NotFound { kind, id } => format!("Could not find {} '{}'", kind, id),
            EngineError::IoError(e) => format!("File operation failed: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EngineError::InvalidInput { .. } => "Check the roster and the submitted scores",
            EngineError::InvalidState { .. } => {
                "Record the outstanding results before advancing the event"
            }
            EngineError::StageAlreadyExists { .. } => {
                "Load the existing stage instead of creating it again"
            }
            EngineError::IncompleteTournament { .. } => {
                "Record every group and knockout result, then finalize again"
            }
            EngineError::NotFound { .. } => "Verify the event, fixture and entrant identifiers",
            EngineError::ConfigError { .. }
            | EngineError::ConfigValidationError { .. }
            | EngineError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and run the command again"
            }
            EngineError::IoError(_) => "Check that the path exists and is writable",
            EngineError::SerializationError(_) => "Make sure the file contains valid JSON",
            EngineError::CsvError(_) => "Check the output directory and disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
