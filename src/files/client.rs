use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;

use crate::core::config::BotConfig;
use crate::core::error::{AppResult, FetchError};

/// File descriptor returned by getFile
///
/// `file_path` is only valid for a limited time on Telegram's side, so it is
/// never cached beyond one ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub file_id: String,
    pub file_size: Option<u64>,
    pub file_path: String,
}

/// Source of remote files, implemented over HTTP in production and faked in tests
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Exchanges a Telegram `file_id` for a downloadable path
    async fn resolve(&self, file_id: &str) -> Result<ResolvedFile, FetchError>;

    /// Downloads the raw bytes behind a resolved path
    async fn download(&self, file_path: &str) -> Result<Bytes, FetchError>;
}

#[derive(Debug, Deserialize)]
struct GetFileResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<GetFileResult>,
}

#[derive(Debug, Deserialize)]
struct GetFileResult {
    file_id: String,
    #[serde(default)]
    file_size: Option<u64>,
    #[serde(default)]
    file_path: Option<String>,
}

/// reqwest-backed client for getFile and file downloads
#[derive(Debug, Clone)]
pub struct TelegramFileClient {
    client: Client,
    api_base: String,
    file_base: String,
}

impl TelegramFileClient {
    /// Creates a client with the configured timeout and base URLs
    pub fn new(config: &BotConfig) -> AppResult<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(client, config.api_base_url(), config.file_base_url()))
    }

    /// Creates a client from explicit base URLs (`{host}/bot{token}`, `{host}/file/bot{token}`)
    pub fn with_client(client: Client, api_base: impl Into<String>, file_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            file_base: file_base.into(),
        }
    }
}

#[async_trait]
impl FileSource for TelegramFileClient {
    async fn resolve(&self, file_id: &str) -> Result<ResolvedFile, FetchError> {
        let url = format!("{}/getFile", self.api_base);
        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "file_id": file_id }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        let body = resp.bytes().await?;
        let parsed: GetFileResponse =
            serde_json::from_slice(&body).map_err(|e| FetchError::Malformed(format!("getFile body: {}", e)))?;

        if !parsed.ok {
            return Err(FetchError::Malformed(format!(
                "getFile returned ok=false: {}",
                parsed.description.unwrap_or_default()
            )));
        }

        let result = parsed
            .result
            .ok_or_else(|| FetchError::Malformed("getFile: missing result".to_string()))?;
        let file_path = result
            .file_path
            .filter(|p| !p.is_empty())
            .ok_or_else(|| FetchError::Malformed("getFile: missing file_path".to_string()))?;

        Ok(ResolvedFile {
            file_id: result.file_id,
            file_size: result.file_size,
            file_path,
        })
    }

    async fn download(&self, file_path: &str) -> Result<Bytes, FetchError> {
        let url = format!("{}/{}", self.file_base, file_path.trim_start_matches('/'));
        let resp = self.client.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        Ok(resp.bytes().await?)
    }
}
