//! Channel ban rules: accounts that must never be sent to a channel.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{debug, info};

use super::channel::ChannelName;
use crate::error::ConfigError;

/// Mapping from channel to the accounts forbidden from watching it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BanRules {
    rules: HashMap<ChannelName, HashSet<String>>,
}

impl BanRules {
    /// Empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules shipped with the launcher.
    pub fn builtin() -> Self {
        let mut rules = Self::new();
        rules.insert("caseoh_", ["ken_miles9067", "formeraidensassistant"]);
        rules
    }

    /// Add accounts to a channel's ban set. Blank names are ignored.
    pub fn insert<I, S>(&mut self, channel: &str, accounts: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(channel) = ChannelName::new(channel) else {
            return;
        };

        let banned = self.rules.entry(channel).or_default();
        banned.extend(
            accounts
                .into_iter()
                .map(|a| a.as_ref().trim().to_lowercase())
                .filter(|a| !a.is_empty()),
        );
    }

    /// Parse rules from a JSON object of `channel -> [account, ...]`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(json)?;
        let mut rules = Self::new();
        for (channel, accounts) in &raw {
            rules.insert(channel, accounts);
        }
        Ok(rules)
    }

    /// Load rules from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::BanListIo {
            path: path.to_path_buf(),
            source,
        })?;
        let rules = Self::from_json(&json).map_err(|source| ConfigError::BanListParse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), channels = rules.len(), "Loaded ban list");
        Ok(rules)
    }

    /// Load from `path` if given, otherwise use the built-in rules.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("No ban list configured, using built-in rules");
                Ok(Self::builtin())
            }
        }
    }

    /// Whether `account` may not be sent to `channel`.
    pub fn is_banned(&self, channel: &ChannelName, account: &str) -> bool {
        let account = account.trim().to_lowercase();
        self.rules
            .get(channel)
            .is_some_and(|banned| banned.contains(&account))
    }

    /// Channels with at least one rule.
    pub fn channels(&self) -> impl Iterator<Item = &ChannelName> {
        self.rules.keys()
    }

    /// Number of channels with rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn channel(name: &str) -> ChannelName {
        ChannelName::new(name).unwrap()
    }

    #[test]
    fn builtin_bans_caseoh_for_known_accounts() {
        let rules = BanRules::builtin();
        assert!(rules.is_banned(&channel("caseoh_"), "Ken_Miles9067"));
        assert!(rules.is_banned(&channel("caseoh_"), "formeraidensassistant"));
        assert!(!rules.is_banned(&channel("caseoh_"), "alice"));
        assert!(!rules.is_banned(&channel("bob"), "ken_miles9067"));
    }

    #[test]
    fn entries_are_normalized() {
        let mut rules = BanRules::new();
        rules.insert(" CaseOh_ ", ["ALICE", "  "]);
        assert_eq!(rules.len(), 1);
        assert!(rules.is_banned(&channel("caseoh_"), "alice"));
        assert!(!rules.is_banned(&channel("caseoh_"), ""));
    }

    #[test]
    fn blank_channel_is_ignored() {
        let mut rules = BanRules::new();
        rules.insert("   ", ["alice"]);
        assert!(rules.is_empty());
    }

    #[test]
    fn parses_json_mapping() {
        let rules = BanRules::from_json(r#"{"caseoh_": ["alice"], "Bob": ["carol", "dave"]}"#)
            .unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules.is_banned(&channel("bob"), "dave"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(BanRules::from_json(r#"["caseoh_"]"#).is_err());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"caseoh_": ["alice"]}}"#).unwrap();

        let rules = BanRules::load(file.path()).unwrap();
        assert!(rules.is_banned(&channel("caseoh_"), "alice"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = BanRules::load(Path::new("/nonexistent/bans.json")).unwrap_err();
        assert!(matches!(err, ConfigError::BanListIo { .. }));
    }

    #[test]
    fn load_or_builtin_without_path_uses_builtin() {
        assert_eq!(BanRules::load_or_builtin(None).unwrap(), BanRules::builtin());
    }
}
