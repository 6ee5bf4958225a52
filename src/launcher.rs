//! One launcher run: analytics, streamer selection, then mining.

use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::Result;
use crate::miner::{AnalyticsSettings, MinePlan, MinerSettings, MiningBackend};
use crate::selection::{BanRules, ChannelSource, Selection, SelectionRequest, StreamerSelector};

/// Drives a [`MiningBackend`] from loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Launcher {
    selector: StreamerSelector,
}

impl Launcher {
    /// Create a launcher with the given ban rules.
    pub fn new(bans: BanRules) -> Self {
        Self {
            selector: StreamerSelector::new(bans),
        }
    }

    /// Build the mine plan without calling any backend.
    pub fn plan(&self, config: &Config, source: &dyn ChannelSource) -> Result<MinePlan> {
        config.validate()?;
        debug!(ban_rules = self.selector.bans().len(), "Planning launch");
        let settings = MinerSettings::from_config(config);
        let selection = self
            .selector
            .select(SelectionRequest::from_config(config), source)?;

        if let Selection::Explicit(channels) = &selection {
            if channels.is_empty() {
                warn!("Channel list is empty after filtering, the miner has nothing to watch");
            }
        }

        Ok(MinePlan {
            settings,
            selection,
        })
    }

    /// Start analytics, select streamers and mine.
    ///
    /// Nothing reaches the backend when the account is missing. An unreadable
    /// channel list fails after analytics is started and before mining.
    #[instrument(skip_all, fields(user = %config.username()))]
    pub async fn launch<B: MiningBackend>(
        &self,
        config: &Config,
        source: &dyn ChannelSource,
        backend: &mut B,
    ) -> Result<Selection> {
        config.validate()?;

        let analytics = AnalyticsSettings::from_config(config);
        backend.start_analytics(&analytics).await?;

        let plan = self.plan(config, source)?;
        info!("Handing streamer selection to the miner");
        backend.mine(&plan).await?;

        Ok(plan.selection)
    }
}
