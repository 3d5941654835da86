use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default Telegram Bot API host
pub const DEFAULT_API_HOST: &str = "https://api.telegram.org";

/// Spreadsheet MIME type accepted by the ingestion flow (xlsx)
pub const EXCEL_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Storage configuration
pub mod storage {
    use super::Duration;

    /// Root directory for per-chat spreadsheet files
    pub const DEFAULT_DIR: &str = "data";

    /// File name of the persisted spreadsheet inside a chat directory
    pub const FILE_NAME: &str = "data.xlsx";

    /// Delay before a persisted spreadsheet is deleted (in seconds)
    pub const CLEANUP_DELAY_SECS: u64 = 300; // 5 minutes

    /// Cleanup delay duration
    pub fn cleanup_delay() -> Duration {
        Duration::from_secs(CLEANUP_DELAY_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for getFile and file downloads (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Logging configuration
pub mod logging {
    /// Default log file path
    pub const DEFAULT_LOG_FILE: &str = "kipubot.log";

    /// Log file path, read from LOG_FILE_PATH environment variable
    pub fn log_file_path() -> String {
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BOT_TOKEN is not set. Export BOT_TOKEN (or TELOXIDE_TOKEN) or put it into .env")]
    MissingToken,
}

/// Runtime configuration of the bot, read once at startup
#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    /// Bot API host without trailing slash, e.g. `https://api.telegram.org`
    pub api_host: String,
    pub storage_dir: PathBuf,
    pub cleanup_delay: Duration,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &crate::core::logging::mask_token(&self.token))
            .field("api_host", &self.api_host)
            .field("storage_dir", &self.storage_dir)
            .field("cleanup_delay", &self.cleanup_delay)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl BotConfig {
    /// Reads configuration from process environment
    ///
    /// # Errors
    /// Returns `ConfigError::MissingToken` if neither BOT_TOKEN nor TELOXIDE_TOKEN is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("BOT_TOKEN")
            .or_else(|| lookup("TELOXIDE_TOKEN"))
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let api_host = lookup("BOT_API_URL")
            .filter(|u| !u.trim().is_empty())
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_HOST.to_string());

        let storage_dir = lookup("STORAGE_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(storage::DEFAULT_DIR));

        let cleanup_delay = parse_secs(&lookup, "CLEANUP_DELAY_SECS").unwrap_or_else(storage::cleanup_delay);
        let request_timeout = parse_secs(&lookup, "REQUEST_TIMEOUT_SECS").unwrap_or_else(network::timeout);

        Ok(Self {
            token,
            api_host,
            storage_dir,
            cleanup_delay,
            request_timeout,
        })
    }

    /// Control API base: `{host}/bot{token}`
    pub fn api_base_url(&self) -> String {
        format!("{}/bot{}", self.api_host, self.token)
    }

    /// File download base: `{host}/file/bot{token}`
    pub fn file_base_url(&self) -> String {
        format!("{}/file/bot{}", self.api_host, self.token)
    }
}

fn parse_secs<F>(lookup: &F, key: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(e) => {
            log::warn!("Ignoring invalid {}={:?}: {}. Using default.", key, raw, e);
            None
        }
    }
}
