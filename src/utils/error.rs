use thiserror::Error;

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Where in the run an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Transport,
    Decode,
    FileIo,
}

impl DumpError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DumpError::ApiError(_) => ErrorCategory::Transport,
            DumpError::IoError(_) => ErrorCategory::FileIo,
            DumpError::SerializationError(_) => ErrorCategory::Decode,
            DumpError::MissingConfigError { .. }
            | DumpError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Text printed to the user on stdout before exiting.
    pub fn user_friendly_message(&self) -> String {
        match self {
            DumpError::MissingConfigError { field } if field == "api_key" => {
                "Please define `GOOGLE_API_KEY` environment variable".to_string()
            }
            DumpError::MissingConfigError { field } if field == "place_ids" => {
                "Please provide at least one place id via arguments".to_string()
            }
            DumpError::MissingConfigError { field } => {
                format!("Missing required setting `{}`", field)
            }
            DumpError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid `{}`: {}", field, reason)
            }
            DumpError::ApiError(e) => format!("Could not reach the places API: {}", e),
            DumpError::IoError(e) => format!("Could not write the output file: {}", e),
            DumpError::SerializationError(e) => {
                format!("The places API returned an unreadable response: {}", e)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Set GOOGLE_API_KEY and pass one or more place ids as arguments"
            }
            ErrorCategory::Transport => "Check network connectivity and the details endpoint",
            ErrorCategory::Decode => "Check that the place id and API key are valid",
            ErrorCategory::FileIo => "Check permissions on the working directory",
        }
    }
}

pub type Result<T> = std::result::Result<T, DumpError>;
