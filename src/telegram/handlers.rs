//! Telegram bot handler tree configuration
//!
//! This module provides the main dispatcher schema for the Telegram bot.
//! Handlers only translate between teloxide types and the ingestion/command
//! logic, which lives outside this module and is tested on its own.

use std::sync::Arc;

use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use crate::chart::ChartRenderer;
use crate::ingest::{DocumentRef, Ingestor};
use crate::telegram::bot::Command;
use crate::telegram::{commands, messages};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub ingestor: Ingestor,
    pub renderer: Arc<dyn ChartRenderer>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(ingestor: Ingestor, renderer: Arc<dyn ChartRenderer>) -> Self {
        Self { ingestor, renderer }
    }
}

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Commands are matched first; any other message carrying a document goes to
/// the ingestion flow. Everything else is ignored.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_documents = deps;

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(document_handler(deps_documents))
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move { handle_command(&bot, &msg, cmd, &deps).await }
        },
    ))
}

fn document_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_map(|msg: Message| msg.document().map(DocumentRef::from_document))
        .endpoint(move |bot: Bot, msg: Message, doc: DocumentRef| {
            let deps = deps.clone();
            async move { handle_document(&bot, &msg, &doc, &deps).await }
        })
}

async fn handle_command(bot: &Bot, msg: &Message, cmd: Command, deps: &HandlerDeps) -> Result<(), HandlerError> {
    log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);

    match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, messages::START).await?;
        }
        Command::Kuvaaja | Command::Graph => {
            let reply =
                commands::chart_reply(deps.ingestor.store(), deps.renderer.as_ref(), msg.chat.id).await;
            bot.send_message(msg.chat.id, reply).await?;
        }
    }

    Ok(())
}

async fn handle_document(bot: &Bot, msg: &Message, doc: &DocumentRef, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let chat_id = msg.chat.id;
    let outcome = deps.ingestor.ingest(chat_id, doc).await;

    let sent = bot.send_message(chat_id, outcome.reply_text()).await;

    // The file is on disk whether or not the confirmation got through
    deps.ingestor.schedule_cleanup_for(chat_id, &outcome);

    sent?;
    Ok(())
}
