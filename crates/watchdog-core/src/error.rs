//! Error types for watchdog-core

use thiserror::Error;
use watchdog_engine::EngineError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] watchdog_config::ConfigError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CoreError {
    /// True when the engine reported the resource as absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Engine(e) if e.is_not_found())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
