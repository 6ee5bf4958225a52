//! Settings handed to the mining engine.
//!
//! These mirror the engine's own configuration objects closely enough to be
//! serialized into a launch plan; the engine owns their semantics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use crate::config::Config;

/// Prediction strategy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    /// Bet on the outcome with the most users.
    MostVoted,
    /// Bet on the outcome with the highest odds.
    HighOdds,
    /// Bet on the outcome with the highest percentage.
    Percentage,
    /// Bet on the outcome backed by the most points.
    SmartMoney,
    /// Switch between most-voted and high-odds on the gap.
    #[default]
    Smart,
}

/// When the bet is placed relative to the prediction window.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DelayMode {
    /// `delay` seconds after the window opens.
    FromStart,
    /// `delay` seconds before the window closes.
    #[default]
    FromEnd,
    /// `delay` as a fraction of the window.
    Percentage,
}

/// Outcome statistic a filter condition looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKey {
    PercentageUsers,
    OddsPercentage,
    Odds,
    TopPoints,
    TotalUsers,
    TotalPoints,
    DecisionUsers,
    DecisionPoints,
}

/// Comparison used by a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Condition {
    Gt,
    Lt,
    Gte,
    Lte,
}

/// Skip the bet unless `by` compares to `value` with `where`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Statistic to compare.
    pub by: OutcomeKey,
    /// Comparison.
    #[serde(rename = "where")]
    pub where_: Condition,
    /// Threshold.
    pub value: f64,
}

/// Bet placement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetSettings {
    pub strategy: Strategy,
    /// Share of the channel points to bet.
    pub percentage: u32,
    /// Outcome gap for the smart strategy.
    pub percentage_gap: u32,
    /// Upper bound of a single bet.
    pub max_points: u64,
    /// Bet slightly below the highest bet instead of above it.
    pub stealth_mode: bool,
    pub delay_mode: DelayMode,
    pub delay: f64,
    /// Only bet with at least this many points.
    pub minimum_points: u64,
    pub filter_condition: Option<FilterCondition>,
}

impl Default for BetSettings {
    fn default() -> Self {
        Self {
            strategy: Strategy::SmartMoney,
            percentage: 15,
            percentage_gap: 20,
            max_points: 25_000,
            stealth_mode: true,
            delay_mode: DelayMode::FromEnd,
            delay: 6.0,
            minimum_points: 4_000,
            filter_condition: Some(FilterCondition {
                by: OutcomeKey::OddsPercentage,
                where_: Condition::Gte,
                value: 70.0,
            }),
        }
    }
}

/// When the miner joins a channel's IRC chat.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatPresence {
    #[default]
    Always,
    Never,
    Online,
    Offline,
}

/// Per-streamer behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamerSettings {
    pub make_predictions: bool,
    pub follow_raid: bool,
    pub claim_drops: bool,
    pub watch_streak: bool,
    pub chat: ChatPresence,
    pub bet: BetSettings,
}

impl Default for StreamerSettings {
    fn default() -> Self {
        Self {
            make_predictions: true,
            follow_raid: true,
            claim_drops: true,
            watch_streak: true,
            chat: ChatPresence::Always,
            bet: BetSettings::default(),
        }
    }
}

/// Ordering rules the engine applies when choosing whom to watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Order,
    Streak,
    Drops,
    Subscribed,
    PointsAscending,
    PointsDescending,
}

/// Engine events that can be forwarded to a notification channel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Event {
    StreamerOnline,
    StreamerOffline,
    GainForRaid,
    GainForClaim,
    GainForWatch,
    GainForWatchStreak,
    BetWin,
    BetLose,
    BetRefund,
    BetFilters,
    BetGeneral,
    BetFailed,
    BetStart,
    BonusClaim,
    MomentClaim,
    JoinRaid,
    DropClaim,
    DropStatus,
    ChatMention,
}

/// Discord webhook notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscordSettings {
    pub webhook_api: String,
    pub events: Vec<Event>,
}

impl DiscordSettings {
    /// Events forwarded by default.
    pub const DEFAULT_EVENTS: [Event; 8] = [
        Event::StreamerOnline,
        Event::StreamerOffline,
        Event::BetWin,
        Event::BetRefund,
        Event::BetStart,
        Event::BetFailed,
        Event::BetLose,
        Event::ChatMention,
    ];

    /// Notifications for the default events to `webhook`.
    pub fn new(webhook: &Url) -> Self {
        Self {
            webhook_api: webhook.to_string(),
            events: Self::DEFAULT_EVENTS.to_vec(),
        }
    }
}

/// Console colors understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Reset,
}

/// Per-event console colors for common messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorPalette(BTreeMap<Event, Color>);

impl ColorPalette {
    /// Palette with no overrides.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Set the color of `event`.
    pub fn with(mut self, event: Event, color: Color) -> Self {
        self.0.insert(event, color);
        self
    }

    /// Set a color from engine names, in any case.
    pub fn set(&mut self, event: &str, color: &str) -> Result<(), strum::ParseError> {
        let event = event.trim().parse::<Event>()?;
        let color = color.trim().parse::<Color>()?;
        self.0.insert(event, color);
        Ok(())
    }

    pub fn get(&self, event: Event) -> Option<Color> {
        self.0.get(&event).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::empty()
            .with(Event::StreamerOnline, Color::Green)
            .with(Event::StreamerOffline, Color::Red)
            .with(Event::BetWin, Color::Magenta)
    }
}

/// Engine log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// Engine logging and notification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Write logs to a file.
    pub save: bool,
    pub console_level: LogLevel,
    pub file_level: LogLevel,
    pub emoji: bool,
    pub less: bool,
    pub colored: bool,
    pub color_palette: ColorPalette,
    pub discord: Option<DiscordSettings>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            save: true,
            console_level: LogLevel::Info,
            file_level: LogLevel::Debug,
            emoji: true,
            less: false,
            colored: true,
            color_palette: ColorPalette::default(),
            discord: None,
        }
    }
}

/// Everything the engine needs besides the streamer selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinerSettings {
    pub username: String,
    /// Claim inventory drops on startup.
    pub claim_drops_startup: bool,
    pub priority: Vec<Priority>,
    pub enable_analytics: bool,
    pub logger: LoggerSettings,
    pub streamer: StreamerSettings,
}

impl MinerSettings {
    /// Settings for the configured account.
    pub fn from_config(config: &Config) -> Self {
        let streamer = StreamerSettings {
            make_predictions: config.do_predictions,
            ..StreamerSettings::default()
        };

        let logger = LoggerSettings {
            discord: config.discord_webhook.as_ref().map(DiscordSettings::new),
            ..LoggerSettings::default()
        };

        Self {
            username: config.username().to_string(),
            claim_drops_startup: true,
            priority: vec![Priority::Streak, Priority::Drops, Priority::Order],
            enable_analytics: true,
            logger,
            streamer,
        }
    }
}
