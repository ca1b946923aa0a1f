//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use crate::transport::{EventKind, IncomingEvent};

use super::dialogue_manager::OrderFlow;

/// Convert a Telegram message into an [`IncomingEvent`].
///
/// Returns `None` for messages without a sender, such as channel posts.
pub fn event_from_message(msg: &Message) -> Option<IncomingEvent> {
    let user = msg.from.as_ref()?;

    let kind = if let Some(contact) = msg.contact() {
        EventKind::Contact {
            phone_number: contact.phone_number.clone(),
        }
    } else if let Some(text) = msg.text() {
        EventKind::Text(text.to_string())
    } else {
        EventKind::Other
    };

    Some(IncomingEvent {
        user_id: user.id.0 as i64,
        chat_id: msg.chat.id.0,
        username: user.username.clone(),
        language_code: user.language_code.clone(),
        kind,
    })
}

pub async fn message_handler(msg: Message, flow: Arc<OrderFlow>) -> Result<()> {
    match event_from_message(&msg) {
        Some(event) => {
            debug!(user_id = %event.user_id, chat_id = %event.chat_id, "Received message from user");
            flow.handle_event(event).await
        }
        None => {
            debug!(chat_id = msg.chat.id.0, "Ignoring message without a sender");
            Ok(())
        }
    }
}
