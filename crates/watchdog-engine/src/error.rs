//! Error types for container engine access

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to connect to container engine: {0}")]
    ConnectionError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Container engine rejected request ({status_code}): {message}")]
    Api { status_code: u16, message: String },

    #[error("Container engine transport error: {0}")]
    Transport(String),
}

impl EngineError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Errors reported by the engine itself, as opposed to failures reaching it
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Api { .. })
    }
}

impl From<bollard::errors::Error> for EngineError {
    fn from(err: bollard::errors::Error) -> Self {
        match err {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404,
                message,
            } => Self::NotFound(message),
            bollard::errors::Error::DockerResponseServerError {
                status_code,
                message,
            } => Self::Api {
                status_code,
                message,
            },
            other => Self::Transport(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
