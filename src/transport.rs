//! Transport module: the messaging capability the order dialogue talks to.
//!
//! The dialogue only sees [`IncomingEvent`]s and calls [`Transport`] methods;
//! [`TelegramTransport`] maps both onto the Telegram Bot API through teloxide.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, MessageId};
use tracing::debug;

use crate::bot::ui_builder::{bot_commands, to_reply_markup};
use crate::errors::TransportError;
use crate::localization::{LocalizationManager, SUPPORTED_LANGUAGES};

/// What a user sent, stripped down to what the dialogue needs
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Text(String),
    Contact { phone_number: String },
    Other,
}

/// An incoming user event
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingEvent {
    pub user_id: i64,
    pub chat_id: i64,
    pub username: Option<String>,
    pub language_code: Option<String>,
    pub kind: EventKind,
}

/// Reply keyboard attached to an outgoing message
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyKeyboard {
    /// Persistent menu shown while no order is in progress
    Menu { order_label: String },
    /// Shown while waiting for the user's phone number
    Contact {
        share_label: String,
        cancel_label: String,
    },
    /// Hide any keyboard currently shown
    Remove,
}

/// Outbound messaging capability
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a text message, optionally replacing the reply keyboard
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&ReplyKeyboard>,
    ) -> Result<(), TransportError>;

    /// Forward a message with content protection, so it cannot be saved or
    /// forwarded further by the recipient
    async fn forward_protected(
        &self,
        chat_id: i64,
        from_chat_id: i64,
        message_id: i32,
    ) -> Result<(), TransportError>;
}

/// [`Transport`] backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Publish the command list in the Telegram menu for every supported language
    pub async fn register_commands(&self, l10n: &LocalizationManager) -> Result<(), TransportError> {
        let default_commands: Vec<BotCommand> = bot_commands(l10n, l10n.default_language());
        self.bot.set_my_commands(default_commands).await?;

        for lang in SUPPORTED_LANGUAGES {
            self.bot
                .set_my_commands(bot_commands(l10n, lang))
                .language_code(lang.to_string())
                .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&ReplyKeyboard>,
    ) -> Result<(), TransportError> {
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(to_reply_markup(keyboard));
        }

        request.await?;
        Ok(())
    }

    async fn forward_protected(
        &self,
        chat_id: i64,
        from_chat_id: i64,
        message_id: i32,
    ) -> Result<(), TransportError> {
        debug!(chat_id, from_chat_id, message_id, "Forwarding channel message");
        self.bot
            .forward_message(ChatId(chat_id), ChatId(from_chat_id), MessageId(message_id))
            .protect_content(true)
            .await?;
        Ok(())
    }
}
