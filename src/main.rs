use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};

use fixture_notifier::config::{AppConfig, Secrets};
use fixture_notifier::data::sofascore::SofaScoreSource;
use fixture_notifier::delivery::webhook::WebhookChannel;
use fixture_notifier::monitoring::health::HealthState;
use fixture_notifier::monitoring::logger;
use fixture_notifier::monitoring::server::{spawn_command_server, ServerState};
use fixture_notifier::scheduler::runner::{shutdown_signal, spawn_daily_digest, spawn_kickoff_watch};
use fixture_notifier::scheduler::Notifier;

#[derive(Debug, Parser)]
#[command(name = "fixture-notifier", version, about = "Posts fixture digests and kickoff alerts for one team")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config/default.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the digest, kickoff watch and command server until interrupted.
    Run,
    /// Print the current on-demand reply and exit.
    Next,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, secrets) = AppConfig::load(&cli.config)?;

    logger::init_logging(&config.monitoring)?;

    let notifier = Arc::new(build_notifier(&config, secrets)?);

    match cli.command.unwrap_or(Command::Run) {
        Command::Next => {
            let reply = notifier.on_demand(Utc::now()).await;
            println!("{}", reply.text);
            Ok(())
        }
        Command::Run => run(config, notifier).await,
    }
}

fn build_notifier(config: &AppConfig, secrets: Secrets) -> Result<Notifier> {
    let source = Arc::new(SofaScoreSource::new(&config.upstream)?);
    let channel = Arc::new(WebhookChannel::new(
        secrets.webhooks,
        config.delivery.username.clone(),
    )?);

    if channel.resolve(&config.delivery.channel).is_none() {
        tracing::warn!(
            channel = %config.delivery.channel,
            "No webhook configured for channel — notifications will be dropped"
        );
    }

    Ok(Notifier::new(config, source, channel, HealthState::new()))
}

/// Run the periodic triggers and the command server until shutdown.
async fn run(config: AppConfig, notifier: Arc<Notifier>) -> Result<()> {
    tracing::info!(
        team_id = config.team.id,
        team = %config.team.name,
        timezone = %config.schedule.timezone,
        digest_time = %config.schedule.daily_digest_time,
        channel = %config.delivery.channel,
        "Fixture notifier starting"
    );

    let mut shutdown = shutdown_signal();

    let digest_handle = spawn_daily_digest(
        notifier.clone(),
        config.schedule.timezone,
        config.schedule.daily_digest_time,
        shutdown.clone(),
    );
    let watch_handle = spawn_kickoff_watch(
        notifier.clone(),
        config.schedule.kickoff_watch_offset_seconds,
        shutdown.clone(),
    );
    let server_handle = config.command.enabled.then(|| {
        spawn_command_server(
            ServerState::new(notifier.clone()),
            &config.command.bind,
            config.command.port,
        )
    });

    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            break;
        }
    }
    tracing::info!("Shutting down");

    if let Some(handle) = server_handle {
        handle.abort();
    }
    let _ = tokio::join!(digest_handle, watch_handle);

    Ok(())
}
