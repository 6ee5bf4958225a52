//! End-to-end launcher tests against a recording backend.
//!
//! Channel lists are written to temporary files and read through the same
//! file source the binary uses.

use std::io::Write;

use channel_miner::config::Config;
use channel_miner::error::{ConfigError, LauncherError};
use channel_miner::miner::{BackendCall, RecordingBackend};
use channel_miner::selection::{BanRules, FileChannelSource, FollowersOrder, Selection};
use channel_miner::Launcher;
use pretty_assertions::assert_eq;

fn config(pairs: &[(&str, &str)]) -> Config {
    Config::from_vars(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    )
    .expect("config from vars")
}

fn channel_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write channels");
    file
}

fn mined_names(backend: &RecordingBackend) -> Vec<String> {
    let plan = backend.mined().expect("mine was called");
    plan.selection
        .channels()
        .expect("explicit selection")
        .iter()
        .map(|c| c.to_string())
        .collect()
}

#[tokio::test]
async fn explicit_list_from_file_is_filtered_and_reversed() {
    let file = channel_file(
        "# favourites\n\
         CaseOh_\n\
         StreamerA   # always on\n\
         \n\
         ken_miles9067\n\
         streamerC\n",
    );
    let cfg = config(&[
        ("CURRENT_USER", "Ken_Miles9067"),
        ("USE_FOLLOWERS_LIST", "false"),
        ("USE_DESCENDING_ORDER", "false"),
    ]);
    let mut backend = RecordingBackend::new();

    Launcher::new(BanRules::builtin())
        .launch(&cfg, &FileChannelSource::new(file.path()), &mut backend)
        .await
        .expect("launch");

    assert_eq!(mined_names(&backend), vec!["streamerc", "streamera"]);
}

#[tokio::test]
async fn descending_order_keeps_file_order() {
    let file = channel_file("a\nb\nc\n");
    let cfg = config(&[
        ("CURRENT_USER", "me"),
        ("USE_FOLLOWERS_LIST", "no"),
        ("USE_DESCENDING_ORDER", "yes"),
    ]);
    let mut backend = RecordingBackend::new();

    Launcher::default()
        .launch(&cfg, &FileChannelSource::new(file.path()), &mut backend)
        .await
        .expect("launch");

    assert_eq!(mined_names(&backend), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn followers_mode_skips_missing_channel_file() {
    let cfg = config(&[
        ("CURRENT_USER", "alice"),
        ("USE_FOLLOWERS_LIST", "TRUE"),
        ("USE_DESCENDING_ORDER", "1"),
        ("PORT", "4600"),
        ("DISCORD_WEBHOOK", "https://discord.com/api/webhooks/1/abc"),
    ]);
    let mut backend = RecordingBackend::new();

    let selection = Launcher::default()
        .launch(
            &cfg,
            &FileChannelSource::new("/nonexistent/channels.txt"),
            &mut backend,
        )
        .await
        .expect("launch");

    assert_eq!(selection, Selection::Followers(FollowersOrder::Desc));

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    match &calls[0] {
        BackendCall::StartAnalytics(analytics) => {
            assert_eq!(analytics.host, "127.0.0.1");
            assert_eq!(analytics.port, 4600);
            assert_eq!(analytics.refresh, 5);
            assert_eq!(analytics.days_ago, 7);
        }
        other => panic!("expected analytics first, got {other:?}"),
    }

    let plan = backend.mined().expect("mine was called");
    assert_eq!(plan.settings.username, "alice");
    assert!(plan.settings.logger.discord.is_some());
}

#[tokio::test]
async fn ban_list_file_replaces_builtin_rules() {
    let bans = channel_file(r#"{"streamera": ["alice"]}"#);
    let file = channel_file("caseoh_\nstreamera\n");
    let cfg = config(&[
        ("CURRENT_USER", "alice"),
        ("USE_FOLLOWERS_LIST", "false"),
        ("USE_DESCENDING_ORDER", "true"),
    ]);
    let rules = BanRules::load(bans.path()).expect("ban list");
    let mut backend = RecordingBackend::new();

    Launcher::new(rules)
        .launch(&cfg, &FileChannelSource::new(file.path()), &mut backend)
        .await
        .expect("launch");

    assert_eq!(mined_names(&backend), vec!["caseoh_"]);
}

#[tokio::test]
async fn blank_user_fails_before_any_backend_call() {
    let cfg = config(&[("CURRENT_USER", "   ")]);
    let mut backend = RecordingBackend::new();

    let err = Launcher::default()
        .launch(
            &cfg,
            &FileChannelSource::new("/nonexistent/channels.txt"),
            &mut backend,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LauncherError::Config(ConfigError::MissingCurrentUser)
    ));
    assert!(backend.calls().is_empty());
}
