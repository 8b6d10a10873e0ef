mod lock_commands;
mod watchlist_commands;

use std::{path::PathBuf, sync::Arc};

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    spawnlock_config::SpawnlockConfig,
    spawnlock_gateway::{InboundMessage, SpawnGuard},
    spawnlock_locks::{
        TracingAudit,
        gate::{NoopGate, NoopNotice},
    },
};

#[derive(Parser)]
#[command(name = "spawnlock", about = "Spawnlock — spawn-channel moderation toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file path (overrides discovery).
    #[arg(long, global = true, env = "SPAWNLOCK_CONFIG")]
    config: Option<PathBuf>,

    /// Custom data directory (overrides the config value).
    #[arg(long, global = true, env = "SPAWNLOCK_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Counters and configuration summary.
    Status,
    /// Watchlist management.
    Watchlist {
        #[command(subcommand)]
        action: watchlist_commands::WatchlistAction,
    },
    /// Locked-channel inventory and release.
    Locks {
        #[command(subcommand)]
        action: lock_commands::LockAction,
    },
    /// Run one message through detection and the lock machine, offline.
    Simulate {
        /// Spawn channel name (a bare number).
        channel: String,
        /// Message content.
        content: Vec<String>,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate the discovered (or given) config file.
    Check,
    /// Write a default config file to the user-global location.
    Init,
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<SpawnlockConfig> {
    let mut config = match &cli.config {
        Some(path) => spawnlock_config::load_config(path)?,
        None => spawnlock_config::discover_and_load(),
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = Some(dir.clone());
    }
    Ok(config)
}

async fn load_guard(config: SpawnlockConfig) -> anyhow::Result<SpawnGuard> {
    SpawnGuard::load(
        config,
        Arc::new(NoopGate),
        Arc::new(NoopNotice),
        Arc::new(TracingAudit),
    )
    .await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    match &cli.command {
        Commands::Status => {
            let guard = load_guard(load_config(&cli)?).await?;
            let settings = guard.settings().snapshot().await;
            let reply = spawnlock_commands::status::status(
                guard.watchlist(),
                guard.locks().registry(),
                guard.config().detector.spawn_channel_max,
                spawnlock_commands::status::SettingsSummary {
                    log_channel_set: settings.log_channel.is_some(),
                    mention_role_count: settings.mention_roles.len(),
                },
            )
            .await;
            println!("{}", reply.text);
        },
        Commands::Watchlist { action } => {
            let guard = load_guard(load_config(&cli)?).await?;
            watchlist_commands::run(&guard, action).await;
        },
        Commands::Locks { action } => {
            let guard = load_guard(load_config(&cli)?).await?;
            lock_commands::run(&guard, action).await;
        },
        Commands::Simulate { channel, content } => {
            let guard = load_guard(load_config(&cli)?).await?;
            simulate(&guard, channel, &content.join(" ")).await?;
        },
        Commands::Config { action } => match action {
            ConfigAction::Check => {
                let config = load_config(&cli)?;
                println!(
                    "config ok (spawn channels 1..{}, cooldown {}s, session ttl {}s)",
                    config.detector.spawn_channel_max,
                    config.locks.cooldown_secs,
                    config.pagination.session_ttl_secs,
                );
            },
            ConfigAction::Init => {
                let path = spawnlock_config::save_config(&SpawnlockConfig::default())?;
                println!("wrote {}", path.display());
            },
        },
    }
    Ok(())
}

/// Feed one synthetic message through the full detection pipeline with no-op
/// platform collaborators, and describe what would have happened.
async fn simulate(guard: &SpawnGuard, channel: &str, content: &str) -> anyhow::Result<()> {
    let author_id = guard.config().detector.namer_id.clone();
    let msg = InboundMessage {
        channel_id: channel.to_string(),
        channel_name: channel.to_string(),
        author_id,
        content: content.to_string(),
    };
    info!(channel, content, "simulating spawn message");

    match guard.handle_spawn_message(&msg).await {
        Ok(outcome) => println!("{outcome:?}"),
        Err(e) => println!("lock attempt failed: {e}"),
    }
    Ok(())
}
