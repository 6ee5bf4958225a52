//! Channel-points miner launcher entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use channel_miner::config::Config;
use channel_miner::miner::{DryRunBackend, ProcessBackend};
use channel_miner::selection::{BanRules, FileChannelSource, Selection};
use channel_miner::Launcher;

/// Twitch channel-points miner launcher.
#[derive(Parser, Debug)]
#[command(name = "channel-miner")]
#[command(about = "Selects streamers and launches the channel-points miner")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    overrides: Overrides,
}

/// Settings that take precedence over the environment.
#[derive(clap::Args, Debug, Clone)]
struct Overrides {
    /// Log what would be launched instead of running the miner.
    #[arg(long, global = true)]
    dry_run: bool,

    /// Channel list file.
    #[arg(short, long, global = true)]
    channels: Option<PathBuf>,

    /// Analytics server port.
    #[arg(short, long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Launch the miner (default).
    Run,

    /// Check configuration validity.
    CheckConfig,

    /// Print the streamers the miner would be given.
    ListStreamers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("channel_miner=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::Run) | None => cmd_run(args.overrides).await,
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::ListStreamers) => cmd_list_streamers(args.overrides),
    }
}

fn load_config(overrides: &Overrides) -> anyhow::Result<Config> {
    // Load configuration
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Override with CLI args if provided
    if let Some(channels) = &overrides.channels {
        config.channels_file = channels.clone();
    }
    if let Some(port) = overrides.port {
        config.port = port;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("CHANNEL MINER - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Load ban list
    print!("Loading ban list... ");
    let bans = match BanRules::load_or_builtin(config.ban_list_path.as_deref()) {
        Ok(bans) => {
            println!("OK");
            bans
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Ban list invalid"));
        }
    };

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  User: {}", config.username());
    println!("  Predictions: {}", if config.do_predictions { "Enabled" } else { "Disabled" });
    println!(
        "  Streamers: {}",
        if config.use_followers_list {
            "Followers list".to_string()
        } else {
            format!("File {}", config.channels_file.display())
        }
    );
    println!("  Descending Order: {}", config.use_descending_order);
    println!("  Banned Channels: {}", bans.len());
    println!("  Analytics: http://{}:{}", config.analytics_host, config.port);
    println!(
        "  Discord: {}",
        if config.discord_webhook.is_some() { "Enabled" } else { "Disabled" }
    );
    match &config.miner_command {
        Some(cmd) if !config.is_dry_run() => println!("  Miner Command: {}", cmd),
        _ => println!("  Miner Command: not set (dry run)"),
    }
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print the streamer selection without launching anything.
fn cmd_list_streamers(overrides: Overrides) -> anyhow::Result<()> {
    let config = load_config(&overrides)?;
    let bans = BanRules::load_or_builtin(config.ban_list_path.as_deref())?;
    let source = FileChannelSource::new(&config.channels_file);

    let plan = Launcher::new(bans).plan(&config, &source)?;

    match plan.selection {
        Selection::Followers(order) => {
            println!("Followers of {} ({})", config.username(), order);
        }
        Selection::Explicit(channels) => {
            println!(
                "{} streamers for {} from {}:",
                channels.len(),
                config.username(),
                source.path().display()
            );
            for (i, channel) in channels.iter().enumerate() {
                println!("  {:>3}. {}", i + 1, channel);
            }
        }
    }

    Ok(())
}

/// Launch the miner.
async fn cmd_run(overrides: Overrides) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = load_config(&overrides)?;
    let bans = BanRules::load_or_builtin(config.ban_list_path.as_deref())?;
    let source = FileChannelSource::new(&config.channels_file);

    // Create launcher
    let launcher = Launcher::new(bans);

    let dry_run = overrides.dry_run || config.is_dry_run();

    info!("Configuration loaded successfully");
    info!("User: {}", config.username());
    info!("Mode: {}", if dry_run { "DRY RUN" } else { "LIVE" });

    // Launch through the engine command, or only log the plan
    match config.miner_command.as_deref() {
        Some(command) if !dry_run => {
            let mut backend = ProcessBackend::new(command)?;
            launcher.launch(&config, &source, &mut backend).await?;
        }
        _ => {
            let mut backend = DryRunBackend::new();
            launcher.launch(&config, &source, &mut backend).await?;
        }
    }

    info!("Miner stopped");
    Ok(())
}
