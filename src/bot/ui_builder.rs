//! UI Builder module for creating keyboards and formatting messages

use std::collections::HashMap;

use teloxide::types::{
    BotCommand, ButtonRequest, KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup,
};

use crate::localization::LocalizationManager;
use crate::order::Order;
use crate::transport::ReplyKeyboard;

/// Idle menu keyboard with the order button
pub fn menu_keyboard(l10n: &LocalizationManager, language_code: Option<&str>) -> ReplyKeyboard {
    ReplyKeyboard::Menu {
        order_label: l10n.t("order-button", language_code),
    }
}

/// Keyboard asking the user to share their contact
pub fn contact_keyboard(l10n: &LocalizationManager, language_code: Option<&str>) -> ReplyKeyboard {
    ReplyKeyboard::Contact {
        share_label: l10n.t("share-contact-button", language_code),
        cancel_label: l10n.t("cancel-button", language_code),
    }
}

/// Render a keyboard into Telegram reply markup
pub fn to_reply_markup(keyboard: &ReplyKeyboard) -> ReplyMarkup {
    match keyboard {
        ReplyKeyboard::Menu { order_label } => {
            KeyboardMarkup::new(vec![vec![KeyboardButton::new(order_label.clone())]])
                .resize_keyboard()
                .persistent()
                .into()
        }
        ReplyKeyboard::Contact {
            share_label,
            cancel_label,
        } => KeyboardMarkup::new(vec![vec![
            KeyboardButton::new(share_label.clone()).request(ButtonRequest::Contact),
            KeyboardButton::new(cancel_label.clone()),
        ]])
        .resize_keyboard()
        .into(),
        ReplyKeyboard::Remove => KeyboardRemove::new().into(),
    }
}

/// Commands published in the Telegram command menu
pub fn bot_commands(l10n: &LocalizationManager, language: &str) -> Vec<BotCommand> {
    ["start", "order", "cancel"]
        .into_iter()
        .map(|command| {
            let description =
                l10n.get_message_in_language(&format!("command-{command}"), language, None);
            BotCommand::new(command, description)
        })
        .collect()
}

/// Format an order as the administrator notification.
///
/// Fields are always in the same order: header, name, user id, phone, username.
pub fn format_order_notification(order: &Order, l10n: &LocalizationManager, language: &str) -> String {
    let unknown = l10n.get_message_in_language("admin-unknown", language, None);

    let name = order
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| unknown.clone());
    let user_id = order
        .user_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| unknown.clone());
    let username = order
        .username
        .as_ref()
        .map(|u| format!("@{u}"))
        .unwrap_or_else(|| unknown.clone());

    let field = |key: &str, arg: &str, value: &str| {
        let args: HashMap<&str, &str> = [(arg, value)].into_iter().collect();
        l10n.get_message_in_language(key, language, Some(&args))
    };

    [
        l10n.get_message_in_language("admin-new-order", language, None),
        field("admin-name", "name", &name),
        field("admin-user-id", "user_id", &user_id),
        field("admin-phone", "phone", &order.phone_number),
        field("admin-username", "username", &username),
    ]
    .join("\n")
}
