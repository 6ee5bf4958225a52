//! Backend that only logs what would be launched.

use tracing::{debug, info};

use super::{AnalyticsSettings, MinePlan, MiningBackend};
use crate::error::MinerError;
use crate::selection::Selection;

/// Logs analytics and mining requests without running anything.
#[derive(Debug, Clone, Default)]
pub struct DryRunBackend;

impl DryRunBackend {
    /// Create a dry-run backend.
    pub fn new() -> Self {
        Self
    }
}

impl MiningBackend for DryRunBackend {
    async fn start_analytics(&mut self, analytics: &AnalyticsSettings) -> Result<(), MinerError> {
        info!(
            host = %analytics.host,
            port = analytics.port,
            refresh = analytics.refresh,
            days_ago = analytics.days_ago,
            "[DRY RUN] Would start analytics server"
        );
        Ok(())
    }

    async fn mine(&mut self, plan: &MinePlan) -> Result<(), MinerError> {
        match &plan.selection {
            Selection::Followers(order) => {
                info!(user = %plan.settings.username, order = %order, "[DRY RUN] Would mine followed channels");
            }
            Selection::Explicit(channels) => {
                info!(
                    user = %plan.settings.username,
                    count = channels.len(),
                    "[DRY RUN] Would mine channels"
                );
                for (i, channel) in channels.iter().enumerate() {
                    info!("  {}. {}", i + 1, channel);
                }
            }
        }

        let json = serde_json::to_string(plan)?;
        debug!(plan = %json, "[DRY RUN] Launch plan");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::settings::{LoggerSettings, MinerSettings, StreamerSettings};
    use crate::selection::ChannelName;

    #[tokio::test]
    async fn dry_run_accepts_both_selection_modes() {
        let mut backend = DryRunBackend::new();
        let settings = MinerSettings {
            username: "alice".to_string(),
            claim_drops_startup: false,
            priority: Vec::new(),
            enable_analytics: false,
            logger: LoggerSettings::default(),
            streamer: StreamerSettings::default(),
        };

        let explicit = MinePlan {
            settings: settings.clone(),
            selection: Selection::Explicit(vec![ChannelName::new("bob").unwrap()]),
        };
        tokio_test::assert_ok!(backend.mine(&explicit).await);

        let followers = MinePlan {
            settings,
            selection: Selection::Followers(crate::selection::FollowersOrder::Desc),
        };
        tokio_test::assert_ok!(backend.mine(&followers).await);
    }
}
