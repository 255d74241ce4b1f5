use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ModtreeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("malformed edge record on line {line}: {record:?}")]
    MalformedRecord { line: usize, record: String },
    #[error("no dependency edges between hierarchical modules found in input")]
    EmptyGraph,
    #[error("root module '{0}' not found in dependency graph")]
    MissingRoot(String),
    #[error("command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },
    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ModtreeError>;
