//! Shared test helpers: an in-memory transport that records every outbound call.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use order_intake_bot::bot::{FlowSettings, OrderFlow};
use order_intake_bot::config::DeliveryConfig;
use order_intake_bot::errors::TransportError;
use order_intake_bot::localization::LocalizationManager;
use order_intake_bot::transport::{EventKind, IncomingEvent, ReplyKeyboard, Transport};

pub const CHANNEL_ID: i64 = -1001234567890;
pub const PROMO_MESSAGE_ID: i32 = 2;
pub const ADMIN_ID: i64 = 999;
pub const BOT_USERNAME: &str = "OrderBot";

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat_id: i64,
        text: String,
        keyboard: Option<ReplyKeyboard>,
    },
    Forward {
        chat_id: i64,
        from_chat_id: i64,
        message_id: i32,
    },
}

#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    attempts: Mutex<HashMap<i64, u32>>,
    failures_left: Mutex<HashMap<i64, u32>>,
    fail_forward: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the next `count` sends to `chat_id` fail
    pub fn fail_sends_to(&self, chat_id: i64, count: u32) {
        self.failures_left.lock().unwrap().insert(chat_id, count);
    }

    pub fn fail_forwards(&self) {
        self.fail_forward.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    /// Texts successfully delivered to `chat_id`, in order
    pub fn texts_to(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Text { chat_id: c, text, .. } if c == chat_id => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Keyboard attached to the last text delivered to `chat_id`
    pub fn last_keyboard_to(&self, chat_id: i64) -> Option<ReplyKeyboard> {
        self.sent().into_iter().rev().find_map(|sent| match sent {
            Sent::Text {
                chat_id: c,
                keyboard,
                ..
            } if c == chat_id => Some(keyboard),
            _ => None,
        })?
    }

    pub fn attempts_to(&self, chat_id: i64) -> u32 {
        self.attempts
            .lock()
            .unwrap()
            .get(&chat_id)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&ReplyKeyboard>,
    ) -> Result<(), TransportError> {
        // Suspend like a network call would, so concurrent events can interleave
        tokio::task::yield_now().await;
        *self.attempts.lock().unwrap().entry(chat_id).or_default() += 1;

        if let Some(left) = self.failures_left.lock().unwrap().get_mut(&chat_id) {
            if *left > 0 {
                *left -= 1;
                return Err(TransportError::Api("Forbidden: bot was blocked".to_string()));
            }
        }

        self.sent.lock().unwrap().push(Sent::Text {
            chat_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn forward_protected(
        &self,
        chat_id: i64,
        from_chat_id: i64,
        message_id: i32,
    ) -> Result<(), TransportError> {
        if self.fail_forward.load(Ordering::SeqCst) {
            return Err(TransportError::Api(
                "Bad Request: message to forward not found".to_string(),
            ));
        }

        self.sent.lock().unwrap().push(Sent::Forward {
            chat_id,
            from_chat_id,
            message_id,
        });
        Ok(())
    }
}

pub fn no_delay() -> DeliveryConfig {
    DeliveryConfig {
        max_retries: 2,
        base_retry_delay_ms: 0,
        max_retry_delay_ms: 0,
    }
}

pub fn setup_flow(transport: Arc<RecordingTransport>) -> OrderFlow {
    let l10n = Arc::new(LocalizationManager::new().expect("Failed to create localization manager"));
    let settings = FlowSettings {
        channel_id: CHANNEL_ID,
        promo_message_id: PROMO_MESSAGE_ID,
        admin_id: ADMIN_ID,
        bot_username: BOT_USERNAME.to_string(),
        delivery: no_delay(),
    };
    OrderFlow::new(transport, l10n, settings)
}

pub fn event(user_id: i64, kind: EventKind) -> IncomingEvent {
    IncomingEvent {
        user_id,
        chat_id: user_id,
        username: Some("anna_k".to_string()),
        language_code: Some("en".to_string()),
        kind,
    }
}

pub fn text(user_id: i64, text: &str) -> IncomingEvent {
    event(user_id, EventKind::Text(text.to_string()))
}

pub fn contact(user_id: i64, phone_number: &str) -> IncomingEvent {
    event(
        user_id,
        EventKind::Contact {
            phone_number: phone_number.to_string(),
        },
    )
}
