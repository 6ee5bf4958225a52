//! Unified error types for the miner launcher.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the miner launcher.
#[derive(Error, Debug)]
pub enum LauncherError {
    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Streamer selection error.
    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),

    /// Mining backend error.
    #[error("miner error: {0}")]
    Miner(#[from] MinerError),
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment could not be deserialized.
    #[error("failed to read environment: {0}")]
    Env(#[from] envy::Error),

    /// `CURRENT_USER` is missing or blank.
    #[error("CURRENT_USER must be set to a non-empty account name")]
    MissingCurrentUser,

    /// Ban list file could not be read.
    #[error("failed to read ban list {path}: {source}")]
    BanListIo {
        /// Path of the ban list.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Ban list file is not a valid channel -> accounts mapping.
    #[error("failed to parse ban list {path}: {source}")]
    BanListParse {
        /// Path of the ban list.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Streamer selection errors.
#[derive(Error, Debug)]
pub enum SelectionError {
    /// No account to select streamers for.
    #[error("current user is empty, cannot select streamers")]
    MissingCurrentUser,

    /// Channel list could not be read.
    #[error("failed to read channel list {path}: {source}")]
    ChannelSource {
        /// Path of the channel list.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Mining backend errors.
#[derive(Error, Debug)]
pub enum MinerError {
    /// `MINER_COMMAND` is blank.
    #[error("miner command is empty")]
    InvalidCommand,

    /// Engine process could not be started.
    #[error("failed to spawn miner `{program}`: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Launch plan could not be serialized.
    #[error("failed to serialize launch plan: {0}")]
    Serialize(#[from] serde_json::Error),

    /// IO error while talking to the engine process.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Engine process exited unsuccessfully.
    #[error("miner exited with status {code:?}")]
    Exited {
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, LauncherError>;
