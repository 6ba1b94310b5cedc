use thiserror::Error;

#[derive(Error, Debug)]
pub enum SommelierError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Catalog request failed: {message}")]
    CatalogError { message: String },

    #[error("Generation request failed: {message}")]
    GenerationError { message: String },

    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Question is empty")]
    EmptyQuestion,
}

impl SommelierError {
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::CatalogError {
            message: message.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationError {
            message: message.into(),
        }
    }

    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::MissingConfigError { .. }
                | Self::InvalidConfigValueError { .. }
                | Self::ConfigValidationError { .. }
        )
    }

    /// Short message suitable for the terminal or an inline page notice.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            Self::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            Self::EmptyQuestion => "Please enter a question first.".to_string(),
            Self::InvalidInput { field, reason } => format!("{}: {}", field, reason),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MissingConfigError { .. } => {
                "Set GOOGLE_API_KEY in the environment or pass --api-key"
            }
            Self::InvalidConfigValueError { .. } | Self::ConfigValidationError { .. } => {
                "Check the command line flags or the TOML configuration file"
            }
            Self::EmptyQuestion | Self::InvalidInput { .. } => "Correct the form and submit again",
            Self::ApiError(_)
            | Self::GenerationError { .. }
            | Self::SerializationError(_) => "Please check your API key and try again.",
            Self::CatalogError { .. } => "Please try again later.",
            Self::IoError(_) => "Check file permissions and paths",
        }
    }
}

pub type Result<T> = std::result::Result<T, SommelierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_classified() {
        let missing = SommelierError::MissingConfigError {
            field: "generation.api_key".to_string(),
        };
        assert!(missing.is_config_error());
        assert!(missing.user_friendly_message().contains("generation.api_key"));
        assert!(missing.recovery_suggestion().contains("GOOGLE_API_KEY"));

        assert!(!SommelierError::EmptyQuestion.is_config_error());
    }

    #[test]
    fn test_generation_errors_share_one_hint() {
        let err = SommelierError::generation("API returned 403 Forbidden");
        assert_eq!(
            err.recovery_suggestion(),
            "Please check your API key and try again."
        );
        assert_eq!(
            err.to_string(),
            "Generation request failed: API returned 403 Forbidden"
        );
    }
}
