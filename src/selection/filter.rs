//! Streamer selection: which channels the miner watches, and in which order.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info, instrument};

use super::bans::BanRules;
use super::channel::{parse_channel_lines, ChannelName};
use super::source::ChannelSource;
use crate::config::Config;
use crate::error::SelectionError;

/// Order in which the engine walks the followed channels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum FollowersOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl FollowersOrder {
    /// Order for the given descending flag.
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            FollowersOrder::Desc
        } else {
            FollowersOrder::Asc
        }
    }
}

/// Outcome of streamer selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum Selection {
    /// Let the engine mine every followed channel.
    Followers(FollowersOrder),
    /// Mine exactly these channels, in this order.
    Explicit(Vec<ChannelName>),
}

impl Selection {
    /// Explicit channels, if any.
    pub fn channels(&self) -> Option<&[ChannelName]> {
        match self {
            Selection::Followers(_) => None,
            Selection::Explicit(list) => Some(list),
        }
    }
}

/// Inputs to one selection run.
#[derive(Debug, Clone, Copy)]
pub struct SelectionRequest<'a> {
    /// Delegate the channel list to the engine's followers.
    pub use_followers_list: bool,
    /// Requested sort order.
    pub use_descending_order: bool,
    /// Account the miner runs as.
    pub current_user: &'a str,
}

impl<'a> SelectionRequest<'a> {
    /// Build a request from loaded configuration.
    pub fn from_config(config: &'a Config) -> Self {
        Self {
            use_followers_list: config.use_followers_list,
            use_descending_order: config.use_descending_order,
            current_user: &config.current_user,
        }
    }
}

/// Applies ban rules and self-exclusion to a channel list.
#[derive(Debug, Clone, Default)]
pub struct StreamerSelector {
    bans: BanRules,
}

impl StreamerSelector {
    /// Create a selector with the given ban rules.
    pub fn new(bans: BanRules) -> Self {
        Self { bans }
    }

    /// Ban rules in effect.
    pub fn bans(&self) -> &BanRules {
        &self.bans
    }

    /// Run selection. `source` is read only in explicit-list mode.
    ///
    /// When descending order is not requested the filtered list is reversed,
    /// so the last line of the file is mined first.
    #[instrument(skip(self, request, source), fields(user = %request.current_user))]
    pub fn select(
        &self,
        request: SelectionRequest<'_>,
        source: &dyn ChannelSource,
    ) -> Result<Selection, SelectionError> {
        if request.current_user.trim().is_empty() {
            return Err(SelectionError::MissingCurrentUser);
        }

        if request.use_followers_list {
            let order = FollowersOrder::from_descending(request.use_descending_order);
            info!(order = %order, "Using followers list");
            return Ok(Selection::Followers(order));
        }

        let parsed = parse_channel_lines(source.read_lines()?);
        let parsed_count = parsed.len();
        let mut channels = self.filter(parsed, request.current_user);

        if !request.use_descending_order {
            channels.reverse();
        }

        info!(
            parsed = parsed_count,
            selected = channels.len(),
            "Selected streamers from channel list"
        );
        Ok(Selection::Explicit(channels))
    }

    /// Drop banned channels and the account's own channel. Order is kept.
    pub fn filter(&self, mut channels: Vec<ChannelName>, current_user: &str) -> Vec<ChannelName> {
        let user = current_user.trim().to_lowercase();

        for channel in self.bans.channels() {
            if !channels.contains(channel) {
                continue;
            }

            if self.bans.is_banned(channel, &user) {
                debug!(channel = %channel, "Channel banned for this account, dropping");
                channels.retain(|c| c != channel);
            }
        }

        let before = channels.len();
        channels.retain(|c| !c.matches(&user));
        if channels.len() != before {
            debug!("Dropped own channel from list");
        }

        channels
    }
}
