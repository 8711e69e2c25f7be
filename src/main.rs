//! tmibot - single-channel chat bot client for the Twitch Messaging
//! Interface.

use tmibot::{Bot, Config};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        nick = %config.bot.nick,
        channel = %config.bot.channel,
        server = %config.server.host,
        "Starting tmibot"
    );

    let bot = Bot::with_address(config.profile(), config.server.host.clone(), config.server.port);

    bot.subscribe(|msg| {
        info!(channel = %msg.channel, sender = %msg.sender, "{}", msg.text);
    });

    bot.start()?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, shutting down");
            bot.stop();
        }
        result = bot.wait_until_closed() => {
            result?;
            return Ok(());
        }
    }

    // Give the session task a chance to wind down after stop().
    let _ = bot.wait_until_closed().await;

    Ok(())
}
