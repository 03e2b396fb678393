//! Telegram Bot API delivery of formatted notifications.

use anyhow::{Result, anyhow};
use reqwest::Client as HttpClient;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

use crate::config::ButtonCfg;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Bot API payload
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SendMessagePayload<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
    reply_markup: InlineKeyboardMarkup<'a>,
}

#[derive(Serialize)]
struct InlineKeyboardMarkup<'a> {
    inline_keyboard: Vec<Vec<InlineKeyboardButton<'a>>>,
}

#[derive(Serialize)]
struct InlineKeyboardButton<'a> {
    text: &'static str,
    url: &'a str,
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

pub struct Notifier {
    http: HttpClient,
    bot_token: String,
    chat_id: String,
    buttons: ButtonCfg,
    /// Bot API origin, e.g. `https://api.telegram.org`.
    api_base: String,
}

impl Notifier {
    pub fn new(
        http: HttpClient,
        api_base: String,
        bot_token: String,
        chat_id: String,
        buttons: ButtonCfg,
    ) -> Self {
        Self {
            http,
            bot_token,
            chat_id,
            buttons,
            api_base,
        }
    }

    fn payload<'a>(&'a self, text: &'a str) -> SendMessagePayload<'a> {
        SendMessagePayload {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
            reply_markup: InlineKeyboardMarkup {
                inline_keyboard: vec![vec![
                    InlineKeyboardButton {
                        text: "Main Channel",
                        url: &self.buttons.channel_url,
                    },
                    InlineKeyboardButton {
                        text: "Number Group",
                        url: &self.buttons.group_url,
                    },
                ]],
            },
        }
    }

    /// Send one message to the configured chat.
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let resp = self
            .http
            .post(&url)
            .timeout(SEND_TIMEOUT)
            .json(&self.payload(text))
            .send()
            .await
            .map_err(|e| anyhow!("sendMessage request failed: {}", e.without_url()))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let raw = resp.text().await.unwrap_or_default();
            return Err(anyhow!("sendMessage failed: {status} body={raw}"));
        }
        info!("Message sent to Telegram");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_uses_html_and_two_link_buttons() {
        let n = Notifier::new(
            HttpClient::new(),
            crate::config::DEFAULT_TELEGRAM_API.into(),
            "123:abc".into(),
            "-10042".into(),
            ButtonCfg::default(),
        );
        let v = serde_json::to_value(n.payload("<b>hi</b>")).unwrap();
        assert_eq!(v["chat_id"], "-10042");
        assert_eq!(v["text"], "<b>hi</b>");
        assert_eq!(v["parse_mode"], "HTML");

        let row = &v["reply_markup"]["inline_keyboard"][0];
        assert_eq!(row.as_array().unwrap().len(), 2);
        assert_eq!(row[0]["text"], "Main Channel");
        assert_eq!(row[0]["url"], crate::config::DEFAULT_CHANNEL_URL);
        assert_eq!(row[1]["text"], "Number Group");
        assert_eq!(row[1]["url"], crate::config::DEFAULT_GROUP_URL);
    }

    // ── HTTP path ──

    use crate::test_http::spawn_stub;
    use axum::Router;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use std::sync::{Arc, Mutex};

    type Captured = Arc<Mutex<Vec<String>>>;

    async fn stub_bot_api(status: StatusCode, reply: &'static str) -> (Notifier, Captured) {
        let captured: Captured = Arc::default();
        let router = Router::new()
            .route(
                "/bottest-token/sendMessage",
                post(move |State(seen): State<Captured>, body: String| async move {
                    seen.lock().unwrap().push(body);
                    (status, reply)
                }),
            )
            .with_state(captured.clone());
        let base = spawn_stub(router).await;
        let notifier = Notifier::new(
            HttpClient::new(),
            base,
            "test-token".into(),
            "-10042".into(),
            ButtonCfg::default(),
        );
        (notifier, captured)
    }

    #[tokio::test]
    async fn rejected_send_carries_status_and_body() {
        let (notifier, _) = stub_bot_api(
            StatusCode::BAD_REQUEST,
            r#"{"ok":false,"description":"Bad Request: can't parse entities"}"#,
        )
        .await;
        let err = notifier.send_message("<b>broken").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("400"), "{msg}");
        assert!(msg.contains("can't parse entities"), "{msg}");
    }

    #[tokio::test]
    async fn accepted_send_posts_json_payload() {
        let (notifier, captured) = stub_bot_api(StatusCode::OK, r#"{"ok":true}"#).await;
        notifier.send_message("🔑 <code>5531</code>").await.unwrap();

        let bodies = captured.lock().unwrap().clone();
        assert_eq!(bodies.len(), 1);
        let v: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
        assert_eq!(v["chat_id"], "-10042");
        assert_eq!(v["text"], "🔑 <code>5531</code>");
        assert_eq!(v["parse_mode"], "HTML");
        assert_eq!(v["reply_markup"]["inline_keyboard"][0][1]["text"], "Number Group");
    }
}
