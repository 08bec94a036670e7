use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),
}

impl CoreError {
    /// The name of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            CoreError::InvalidInput(field, _) => field,
        }
    }
}
