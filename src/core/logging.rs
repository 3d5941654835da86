//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Startup configuration summary with the bot token masked

use anyhow::Result;
use simplelog::*;
use std::fs::OpenOptions;

use crate::core::config::BotConfig;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file (appended to)
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to open the log file or a logger is already set
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", log_file_path, e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Masks a bot token for logs: keeps the numeric bot id, hides the secret.
///
/// `123456:ABCDEF` becomes `123456:***`; tokens without a colon become `***`.
pub fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((id, _)) if !id.is_empty() => format!("{}:***", id),
        _ => "***".to_string(),
    }
}

/// Logs effective configuration at application startup
pub fn log_startup_configuration(config: &BotConfig) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("⚙️  Configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("BOT_TOKEN: {}", mask_token(&config.token));
    log::info!("Bot API host: {}", config.api_host);
    log::info!("Storage dir: {}", config.storage_dir.display());
    log::info!("Cleanup delay: {}s", config.cleanup_delay.as_secs());
    log::info!("Request timeout: {}s", config.request_timeout.as_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token_keeps_bot_id() {
        assert_eq!(mask_token("123456:ABC-DEF1234ghIkl"), "123456:***");
    }

    #[test]
    fn test_mask_token_without_colon() {
        assert_eq!(mask_token("garbage"), "***");
        assert_eq!(mask_token(":secret"), "***");
    }
}
