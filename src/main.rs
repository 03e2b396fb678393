mod config;
mod country;
mod format;
mod health;
mod notifier;
mod otp;
mod panel;
mod poll;
#[cfg(test)]
mod test_http;

use anyhow::Result;
use dotenvy::dotenv;
use reqwest::Client as HttpClient;
use tracing::{error, info};

use crate::notifier::Notifier;
use crate::panel::PanelClient;
use crate::poll::{ConsoleSink, PollLoop};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = match config::load_cfg() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e:#}");
            std::process::exit(1);
        }
    };

    let http = HttpClient::new();
    let panel = PanelClient::new(http.clone(), cfg.panel.clone(), cfg.session_id.clone());

    // The poll loop owns its state on one background task.
    if cfg.dry_run {
        info!("DRY_RUN enabled; notifications are printed, not sent");
        let poll = PollLoop::new(panel, ConsoleSink, cfg.seen_capacity, cfg.poll_interval);
        tokio::spawn(poll.run());
    } else {
        let notifier = Notifier::new(
            http,
            cfg.telegram_api.clone(),
            cfg.bot_token.clone(),
            cfg.chat_id.clone(),
            cfg.buttons.clone(),
        );
        let poll = PollLoop::new(panel, notifier, cfg.seen_capacity, cfg.poll_interval);
        tokio::spawn(poll.run());
    }

    info!("OTP bot started");
    health::serve(cfg.port).await
}
