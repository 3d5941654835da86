use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::dispatching::ShutdownToken;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;

use kipubot::chart::{ChartRenderer, TextSummaryRenderer};
use kipubot::cli::{Cli, Commands};
use kipubot::core::{config, init_logger, log_startup_configuration, BotConfig};
use kipubot::files::TelegramFileClient;
use kipubot::ingest::Ingestor;
use kipubot::sheet::parse_records_from_path;
use kipubot::storage::SpreadsheetStore;
use kipubot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::logging::log_file_path())?;

    match cli.command {
        Some(Commands::Parse { file, verbose }) => run_parse(&file, verbose),
        Some(Commands::Run) | None => run_bot().await,
    }
}

/// Parses a local export with the bot's own parser and prints the summary
fn run_parse(file: &Path, verbose: bool) -> Result<()> {
    let parsed = parse_records_from_path(file)?;

    if verbose {
        for record in &parsed.records {
            println!(
                "{}\t{}\t{}\t{}",
                record.date.format("%Y-%m-%d %H:%M"),
                record.name,
                record.message,
                record.amount
            );
        }
    }

    println!("{} records, {} rows skipped", parsed.records.len(), parsed.skipped_rows);
    println!("{}", TextSummaryRenderer.render(&parsed.records)?.text);
    Ok(())
}

async fn run_bot() -> Result<()> {
    let bot_config = match BotConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("❌ {}", e);
            log::error!("Quitting.");
            std::process::exit(1);
        }
    };

    log::info!("Starting bot...");
    log_startup_configuration(&bot_config);

    let bot = create_bot(&bot_config)?;

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}. Continuing anyway.", e);
    }

    let store = Arc::new(SpreadsheetStore::new(
        bot_config.storage_dir.clone(),
        bot_config.cleanup_delay,
    ));
    let file_client = Arc::new(TelegramFileClient::new(&bot_config)?);
    let ingestor = Ingestor::new(file_client, store);
    let handler_deps = HandlerDeps::new(ingestor, Arc::new(TextSummaryRenderer));

    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    let mut dispatcher = Dispatcher::builder(bot, schema(handler_deps))
        .default_handler(|upd| async move {
            log::debug!("Unhandled update: {:?}", upd.kind);
        })
        .build();

    spawn_signal_listener(dispatcher.shutdown_token());

    log::info!("📡 Ready to receive updates!");

    dispatcher
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}

/// Requests a graceful dispatcher stop on every SIGINT / SIGTERM.
///
/// In-flight handlers run to completion; the dispatcher only stops pulling
/// new updates.
fn spawn_signal_listener(token: ShutdownToken) {
    tokio::spawn(async move {
        loop {
            let name = match wait_for_signal().await {
                Ok(name) => name,
                Err(e) => {
                    log::error!("Failed to listen for shutdown signals: {}", e);
                    return;
                }
            };

            log::info!("Received {}, shutting down gracefully...", name);
            match token.shutdown() {
                Ok(done) => {
                    done.await;
                    return;
                }
                Err(_) => log::warn!("Dispatcher is not running yet, ignoring {}", name),
            }
        }
    });
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => Ok("SIGINT"),
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl-C")
}
