use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use order_intake_bot::bot::{message_handler, FlowSettings, OrderFlow};
use order_intake_bot::config::BotConfig;
use order_intake_bot::localization::LocalizationManager;
use order_intake_bot::transport::{TelegramTransport, Transport};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting order intake bot");

    let config = BotConfig::from_env()?;

    let l10n = match &config.locales_dir {
        Some(dir) => LocalizationManager::with_overrides(&config.default_language, dir)?,
        None => LocalizationManager::with_default_language(&config.default_language)?,
    };
    let l10n = Arc::new(l10n);

    let bot = Bot::new(config.bot_token.clone());
    let me = bot.get_me().await?;
    info!(username = %me.username(), "Bot authenticated");

    let telegram = TelegramTransport::new(bot.clone());
    if let Err(e) = telegram.register_commands(&l10n).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    let transport: Arc<dyn Transport> = Arc::new(telegram);
    let settings = FlowSettings::from_config(&config, me.username());
    let flow = Arc::new(OrderFlow::new(transport, l10n, settings));

    info!(admin_id = config.admin_id, channel_id = config.channel_id, "Bot initialized, starting dispatcher");

    let handler = dptree::entry().branch(Update::filter_message().endpoint(message_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![flow])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
