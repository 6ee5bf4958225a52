//! Launcher for a Twitch channel-points mining engine.
//!
//! The engine itself (Twitch API, predictions, chat presence, the points
//! loop) runs out of process. This crate decides what it should mine:
//!
//! ```text
//! channels.txt ──► parse ──► ban rules ──► drop own channel ──► order ──► mine
//!                     (or: followers list, ASC/DESC) ───────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`selection`]: Channel-list parsing and filtering
//! - [`miner`]: Engine settings and backends
//! - [`launcher`]: Startup sequence
//! - [`utils`]: Utility functions

pub mod config;
pub mod error;
pub mod launcher;
pub mod miner;
pub mod selection;
pub mod utils;

pub use config::Config;
pub use error::{LauncherError, Result};
pub use launcher::Launcher;
