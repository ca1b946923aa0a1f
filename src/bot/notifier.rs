//! Administrator notifier: delivers order notifications with bounded retries

use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::DeliveryConfig;
use crate::errors::TransportError;
use crate::localization::LocalizationManager;
use crate::order::Order;
use crate::transport::Transport;

use super::ui_builder::format_order_notification;

/// Delay before retry number `attempt` (zero-based): exponential backoff
/// capped at `max_retry_delay_ms`, plus up to 25% random jitter within the cap
pub fn retry_delay(attempt: u32, config: &DeliveryConfig) -> Duration {
    let backoff = config
        .base_retry_delay_ms
        .saturating_mul(1u64 << attempt.min(16))
        .min(config.max_retry_delay_ms);

    let jitter = if backoff >= 4 {
        rand::thread_rng().gen_range(0..=backoff / 4)
    } else {
        0
    };

    Duration::from_millis(backoff.saturating_add(jitter).min(config.max_retry_delay_ms))
}

/// Send `text` to `chat_id`, retrying failed attempts up to `max_retries` times
pub async fn deliver_with_retry(
    transport: &dyn Transport,
    chat_id: i64,
    text: &str,
    config: &DeliveryConfig,
) -> Result<(), TransportError> {
    let mut attempt = 0;
    loop {
        match transport.send_text(chat_id, text, None).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < config.max_retries => {
                let delay = retry_delay(attempt, config);
                warn!(
                    chat_id,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Notification delivery failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Notify the administrator about a new order
pub async fn notify_admin(
    transport: &dyn Transport,
    admin_id: i64,
    order: &Order,
    l10n: &LocalizationManager,
    config: &DeliveryConfig,
) -> Result<(), TransportError> {
    let text = format_order_notification(order, l10n, l10n.default_language());
    deliver_with_retry(transport, admin_id, &text, config).await?;

    info!(
        admin_id,
        user_id = ?order.user_id,
        received_at = %order.received_at,
        "Order delivered to administrator"
    );
    Ok(())
}
