//! Mining engine integration.
//!
//! This module handles:
//! - Settings objects handed to the engine
//! - The backend interface (analytics + mine)
//! - Process backend that runs the real engine
//! - Dry-run and recording backends

pub mod dry_run;
pub mod mock;
pub mod process;
pub mod settings;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::MinerError;
use crate::selection::Selection;

pub use dry_run::DryRunBackend;
pub use mock::{BackendCall, RecordingBackend};
pub use process::{LaunchPlan, ProcessBackend};
pub use settings::{ColorPalette, MinerSettings, StreamerSettings};

/// Analytics web server parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Page refresh interval in minutes.
    pub refresh: u64,
    /// Days of history to show.
    pub days_ago: u64,
}

impl AnalyticsSettings {
    /// Analytics parameters from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.analytics_host.clone(),
            port: config.port,
            refresh: config.analytics_refresh_minutes,
            days_ago: config.analytics_days_ago,
        }
    }
}

/// What to mine and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinePlan {
    pub settings: MinerSettings,
    pub selection: Selection,
}

/// The two entry points of a mining engine.
#[allow(async_fn_in_trait)]
pub trait MiningBackend {
    /// Start the analytics endpoint.
    async fn start_analytics(&mut self, analytics: &AnalyticsSettings) -> Result<(), MinerError>;

    /// Mine until the engine stops.
    async fn mine(&mut self, plan: &MinePlan) -> Result<(), MinerError>;
}
