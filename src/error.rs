use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("{field} {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Invalid request payload: {0}")]
    InvalidPayload(String),
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Failed to serialize report: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Failed to format report: {0}")]
    Format(#[from] std::fmt::Error),
}
