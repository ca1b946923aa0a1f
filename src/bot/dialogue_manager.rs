//! Dialogue Manager module for handling order dialogue state transitions

use anyhow::Result;
use std::sync::Arc;
use teloxide::types::ChatId;
use tracing::{debug, error, info};

use crate::config::{BotConfig, DeliveryConfig};
use crate::dialogue::{
    current_state, set_state, validate_name, OrderDialogue, OrderDialogueState, OrderStorage,
};
use crate::localization::LocalizationManager;
use crate::order::Order;
use crate::transport::{IncomingEvent, ReplyKeyboard, Transport};

use super::notifier::notify_admin;
use super::router::{route, ButtonLabels, Route};
use super::ui_builder::{contact_keyboard, menu_keyboard};

/// Settings the dialogue needs from the bot configuration
#[derive(Debug, Clone)]
pub struct FlowSettings {
    pub channel_id: i64,
    pub promo_message_id: i32,
    pub admin_id: i64,
    pub bot_username: String,
    pub delivery: DeliveryConfig,
}

impl FlowSettings {
    pub fn from_config(config: &BotConfig, bot_username: impl Into<String>) -> Self {
        Self {
            channel_id: config.channel_id,
            promo_message_id: config.promo_message_id,
            admin_id: config.admin_id,
            bot_username: bot_username.into(),
            delivery: config.delivery.clone(),
        }
    }
}

/// The order dialogue state machine.
///
/// Owns the dialogue storage of every user and talks to the outside world only
/// through the injected [`Transport`]. Events of one user must arrive in order;
/// the teloxide dispatcher guarantees this by handling each chat sequentially.
/// Idle users have no stored dialogue.
pub struct OrderFlow {
    transport: Arc<dyn Transport>,
    l10n: Arc<LocalizationManager>,
    storage: Arc<OrderStorage>,
    labels: ButtonLabels,
    settings: FlowSettings,
}

impl OrderFlow {
    pub fn new(
        transport: Arc<dyn Transport>,
        l10n: Arc<LocalizationManager>,
        settings: FlowSettings,
    ) -> Self {
        let labels = ButtonLabels::from_localization(&l10n);
        Self {
            transport,
            l10n,
            storage: OrderStorage::new(),
            labels,
            settings,
        }
    }

    /// Dialogue storage shared by all users
    pub fn storage(&self) -> Arc<OrderStorage> {
        Arc::clone(&self.storage)
    }

    fn dialogue(&self, user_id: i64) -> OrderDialogue {
        OrderDialogue::new(self.storage(), ChatId(user_id))
    }

    /// Current state of a user's dialogue
    pub async fn state(&self, user_id: i64) -> Result<OrderDialogueState> {
        current_state(&self.dialogue(user_id)).await
    }

    /// Handle one incoming event
    pub async fn handle_event(&self, event: IncomingEvent) -> Result<()> {
        let dialogue = self.dialogue(event.user_id);
        let state = current_state(&dialogue).await?;
        let route = route(
            &state,
            &event.kind,
            &self.labels,
            &self.settings.bot_username,
        );
        debug!(user_id = %event.user_id, state = ?state, route = ?route, "Dispatching event");

        match route {
            Route::Start => self.handle_start(&dialogue, &event).await,
            Route::Cancel => self.handle_cancel(&dialogue, &event).await,
            Route::BeginOrder => self.handle_begin_order(&dialogue, &event).await,
            Route::SubmitName(text) => self.handle_name_input(&dialogue, &event, &text).await,
            Route::SubmitContact {
                pending_name,
                user_id,
                phone_number,
            } => {
                let order = Order::new(pending_name, user_id, phone_number, event.username.clone());
                self.handle_contact(&dialogue, &event, order).await
            }
            Route::Unknown => self.handle_unknown(&state, &event).await,
        }
    }

    fn t(&self, key: &str, event: &IncomingEvent) -> String {
        self.l10n.t(key, event.language_code.as_deref())
    }

    fn menu(&self, event: &IncomingEvent) -> ReplyKeyboard {
        menu_keyboard(&self.l10n, event.language_code.as_deref())
    }

    async fn reply(
        &self,
        event: &IncomingEvent,
        text: &str,
        keyboard: Option<&ReplyKeyboard>,
    ) -> Result<()> {
        self.transport.send_text(event.chat_id, text, keyboard).await?;
        Ok(())
    }

    /// Reset the session, forward the promotional post and greet the user
    async fn handle_start(&self, dialogue: &OrderDialogue, event: &IncomingEvent) -> Result<()> {
        set_state(dialogue, OrderDialogueState::Idle).await?;
        let menu = self.menu(event);

        if let Err(e) = self
            .transport
            .forward_protected(
                event.chat_id,
                self.settings.channel_id,
                self.settings.promo_message_id,
            )
            .await
        {
            error!(user_id = %event.user_id, error = %e, "Channel forwarding failed");
            self.reply(event, &self.t("promo-unavailable", event), Some(&menu))
                .await?;
        }

        self.reply(event, &self.t("welcome", event), Some(&menu)).await
    }

    async fn handle_begin_order(
        &self,
        dialogue: &OrderDialogue,
        event: &IncomingEvent,
    ) -> Result<()> {
        set_state(dialogue, OrderDialogueState::WaitingForName).await?;
        info!(user_id = %event.user_id, "Order started");

        self.reply(event, &self.t("ask-name", event), Some(&ReplyKeyboard::Remove))
            .await?;
        self.reply(event, &self.t("cancel-hint", event), None).await
    }

    async fn handle_name_input(
        &self,
        dialogue: &OrderDialogue,
        event: &IncomingEvent,
        text: &str,
    ) -> Result<()> {
        match validate_name(text) {
            Ok(name) => {
                set_state(
                    dialogue,
                    OrderDialogueState::WaitingForContact {
                        pending_name: name.clone(),
                        user_id: event.user_id,
                    },
                )
                .await?;

                let prompt = self.l10n.t_args(
                    "ask-contact",
                    &[("name", &name)],
                    event.language_code.as_deref(),
                );
                let keyboard = contact_keyboard(&self.l10n, event.language_code.as_deref());
                self.reply(event, &prompt, Some(&keyboard)).await
            }
            Err(reason) => {
                debug!(user_id = %event.user_id, reason = %reason, "Name rejected");
                self.reply(event, &self.t("invalid-name", event), None).await
            }
        }
    }

    /// Submit the order to the administrator; the session ends either way
    async fn handle_contact(
        &self,
        dialogue: &OrderDialogue,
        event: &IncomingEvent,
        order: Order,
    ) -> Result<()> {
        set_state(dialogue, OrderDialogueState::Idle).await?;
        let menu = self.menu(event);

        match notify_admin(
            self.transport.as_ref(),
            self.settings.admin_id,
            &order,
            &self.l10n,
            &self.settings.delivery,
        )
        .await
        {
            Ok(()) => {
                let name = order.name.as_deref().unwrap_or_default();
                let confirmation = self.l10n.t_args(
                    "order-sent",
                    &[("name", name)],
                    event.language_code.as_deref(),
                );
                self.reply(event, &confirmation, Some(&menu)).await
            }
            Err(e) => {
                error!(user_id = %event.user_id, error = %e, "Failed to notify administrator");
                self.reply(event, &self.t("order-failed", event), Some(&menu))
                    .await
            }
        }
    }

    async fn handle_cancel(&self, dialogue: &OrderDialogue, event: &IncomingEvent) -> Result<()> {
        set_state(dialogue, OrderDialogueState::Idle).await?;
        info!(user_id = %event.user_id, "Order cancelled");

        let menu = self.menu(event);
        self.reply(event, &self.t("cancelled", event), Some(&menu)).await
    }

    async fn handle_unknown(&self, state: &OrderDialogueState, event: &IncomingEvent) -> Result<()> {
        let key = match state {
            OrderDialogueState::WaitingForName => "only-name",
            OrderDialogueState::WaitingForContact { .. } => "contact-expected",
            OrderDialogueState::Idle => "unknown-command",
        };
        self.reply(event, &self.t(key, event), None).await
    }
}
