use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlarmError {
    #[error("Missing required parameter: {field}")]
    MissingRequiredParameter { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidParameter {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid Action parameter: {action}")]
    UnsupportedAction { action: String },

    #[error("Unable to read OpenAPI spec from {location}: {message}")]
    SpecUnavailable { location: String, message: String },

    #[error("OpenAPI spec could not be parsed: {0}")]
    UnparsableSpec(#[from] serde_yaml::Error),

    #[error("OpenAPI spec is not a mapping document")]
    SpecNotAMapping,

    #[error("Unable to resolve API Gateway name for {api_id}: {message}")]
    ApiResolution { api_id: String, message: String },

    #[error("Invalid alarm definition {logical_id}: {reason}")]
    InvalidAlarmDefinition { logical_id: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Settings file error: {0}")]
    TomlError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Spec,
    Generation,
    Io,
}

impl AlarmError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AlarmError::MissingRequiredParameter { .. }
            | AlarmError::InvalidParameter { .. }
            | AlarmError::UnsupportedAction { .. }
            | AlarmError::TomlError(_) => ErrorCategory::Configuration,
            AlarmError::SpecUnavailable { .. }
            | AlarmError::UnparsableSpec(_)
            | AlarmError::SpecNotAMapping
            | AlarmError::ApiResolution { .. } => ErrorCategory::Spec,
            AlarmError::InvalidAlarmDefinition { .. } | AlarmError::SerializationError(_) => {
                ErrorCategory::Generation
            }
            AlarmError::IoError(_) => ErrorCategory::Io,
        }
    }

    /// 給使用者的修復建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the macro parameters or CLI arguments",
            ErrorCategory::Spec => "Check that the OpenAPI document exists and is valid YAML/JSON",
            ErrorCategory::Generation => "Check the monitoring group layout of the OpenAPI spec",
            ErrorCategory::Io => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, AlarmError>;
