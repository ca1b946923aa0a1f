//! Dispatch table mapping (dialogue state, incoming event) to a route.
//!
//! Rules are evaluated in a fixed priority order:
//! 1. `/start`
//! 2. `/cancel` or the cancel button (case-insensitive)
//! 3. `/order` or the order button
//! 4. a name while waiting for the name
//! 5. a shared contact while waiting for the contact
//! 6. anything else is unknown

use teloxide::utils::command::BotCommands;

use crate::dialogue::OrderDialogueState;
use crate::localization::LocalizationManager;
use crate::transport::EventKind;

/// Commands understood by the bot
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    Start,
    Order,
    Cancel,
}

/// Where an event is dispatched
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Start,
    Cancel,
    BeginOrder,
    SubmitName(String),
    SubmitContact {
        pending_name: String,
        user_id: i64,
        phone_number: String,
    },
    Unknown,
}

/// Keyboard button texts recognized as commands, in every supported language
#[derive(Debug, Clone, Default)]
pub struct ButtonLabels {
    order: Vec<String>,
    cancel: Vec<String>,
}

impl ButtonLabels {
    pub fn new(order: Vec<String>, cancel: Vec<String>) -> Self {
        Self { order, cancel }
    }

    pub fn from_localization(l10n: &LocalizationManager) -> Self {
        Self::new(
            l10n.all_variants("order-button"),
            l10n.all_variants("cancel-button"),
        )
    }

    fn is_order(&self, text: &str) -> bool {
        let text = text.trim();
        self.order.iter().any(|label| label == text)
    }

    fn is_cancel(&self, text: &str) -> bool {
        let text = text.trim().to_lowercase();
        self.cancel.iter().any(|label| label.to_lowercase() == text)
    }
}

/// Parse a slash command, ignoring any trailing argument.
///
/// Commands are matched exactly, except `/cancel` which is accepted in any letter case.
pub fn parse_command(text: &str, bot_username: &str) -> Option<Command> {
    let token = text.split_whitespace().next()?;
    if !token.starts_with('/') {
        return None;
    }
    match Command::parse(token, bot_username) {
        Ok(command) => Some(command),
        Err(_) => match Command::parse(&token.to_lowercase(), &bot_username.to_lowercase()) {
            Ok(Command::Cancel) => Some(Command::Cancel),
            _ => None,
        },
    }
}

fn is_command_like(text: &str) -> bool {
    text.trim_start().starts_with('/')
}

/// Pick the route for `event` given the user's current state
pub fn route(
    state: &OrderDialogueState,
    event: &EventKind,
    labels: &ButtonLabels,
    bot_username: &str,
) -> Route {
    if let EventKind::Text(text) = event {
        match parse_command(text, bot_username) {
            Some(Command::Start) => return Route::Start,
            Some(Command::Cancel) => return Route::Cancel,
            Some(Command::Order) => return Route::BeginOrder,
            None => {}
        }

        if labels.is_cancel(text) {
            return Route::Cancel;
        }
        if labels.is_order(text) {
            return Route::BeginOrder;
        }
    }

    match (state, event) {
        (OrderDialogueState::WaitingForName, EventKind::Text(text)) if !is_command_like(text) => {
            Route::SubmitName(text.clone())
        }
        (
            OrderDialogueState::WaitingForContact {
                pending_name,
                user_id,
            },
            EventKind::Contact { phone_number },
        ) => Route::SubmitContact {
            pending_name: pending_name.clone(),
            user_id: *user_id,
            phone_number: phone_number.clone(),
        },
        _ => Route::Unknown,
    }
}
