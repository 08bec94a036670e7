use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("Projection could not be computed: {0}")]
    Computation(String),

    #[error("Failed to export projections: {0}")]
    Export(String),
}

impl ProjectionError {
    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        ProjectionError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// The offending input field, for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            ProjectionError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<core_types::CoreError> for ProjectionError {
    fn from(err: core_types::CoreError) -> Self {
        match err {
            core_types::CoreError::InvalidInput(field, reason) => {
                ProjectionError::Validation { field, reason }
            }
        }
    }
}

impl From<configuration::error::ConfigError> for ProjectionError {
    fn from(err: configuration::error::ConfigError) -> Self {
        ProjectionError::validation("settings", err.to_string())
    }
}
