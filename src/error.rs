//! Error types for reflow

use crate::builder::BuildError;
use crate::collaborators::NewsError;
use crate::effects::{HandlerError, MachineError};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    #[error("Machine error: {0}")]
    Machine(#[from] MachineError),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("News provider error: {0}")]
    News(#[from] NewsError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
