//! Streamer selection for the miner.
//!
//! This module handles:
//! - Channel-list parsing (comments, blanks, case)
//! - Ban rules per channel
//! - Self-exclusion and ordering
//! - Followers-mode directives

pub mod bans;
pub mod channel;
pub mod filter;
pub mod source;

pub use bans::BanRules;
pub use channel::{parse_channel_line, parse_channel_lines, ChannelName};
pub use filter::{FollowersOrder, Selection, SelectionRequest, StreamerSelector};
pub use source::{ChannelSource, FileChannelSource};
