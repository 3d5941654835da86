//! Bot initialization
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Command registration in the Telegram UI

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config::{BotConfig, DEFAULT_API_HOST};

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Komennot:")]
pub enum Command {
    #[command(description = "ohjeet")]
    Start,
    #[command(description = "yhteenveto lähetetystä Excel-tiedostosta")]
    Kuvaaja,
    #[command(description = "sama kuin /kuvaaja")]
    Graph,
}

/// Creates a Bot instance with custom or default API URL
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Invalid BOT_API_URL or HTTP client construction failed
pub fn create_bot(config: &BotConfig) -> anyhow::Result<Bot> {
    let client = ClientBuilder::new().timeout(config.request_timeout).build()?;
    let bot = Bot::with_client(config.token.clone(), client);

    if config.api_host != DEFAULT_API_HOST {
        log::info!("Using custom Bot API URL: {}", config.api_host);
        let url = url::Url::parse(&config.api_host).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
        return Ok(bot.set_api_url(url));
    }

    Ok(bot)
}

/// Sets up bot commands in Telegram UI
///
/// # Returns
/// * `Ok(())` - Commands set successfully
/// * `Err(RequestError)` - Failed to set commands
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_descriptions() {
        let command_list = Command::descriptions().to_string();

        assert!(command_list.contains("Komennot"));
        assert!(command_list.contains("/start"));
        assert!(command_list.contains("/kuvaaja"));
        assert!(command_list.contains("/graph"));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/kuvaaja", "kipubot").unwrap(), Command::Kuvaaja);
        assert_eq!(Command::parse("/graph@kipubot", "kipubot").unwrap(), Command::Graph);
        assert!(Command::parse("/moro", "kipubot").is_err());
    }
}
