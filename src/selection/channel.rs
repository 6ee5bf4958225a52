//! Channel identifiers and channel-list parsing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowercase, trimmed Twitch login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelName(String);

impl ChannelName {
    /// Normalize a raw name. Returns `None` for blank input.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_lowercase()))
        }
    }

    /// The normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a raw account name.
    pub fn matches(&self, account: &str) -> bool {
        self.0 == account.trim().to_lowercase()
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse a single channel-list line.
///
/// Everything from the first `#` is a comment. Lines that are blank after
/// stripping the comment yield `None`.
pub fn parse_channel_line(line: &str) -> Option<ChannelName> {
    let content = match line.split_once('#') {
        Some((before, _)) => before,
        None => line,
    };
    ChannelName::new(content)
}

/// Parse channel-list lines, preserving file order.
pub fn parse_channel_lines<I, S>(lines: I) -> Vec<ChannelName>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_channel_line(line.as_ref()))
        .collect()
}
