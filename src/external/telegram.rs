use crate::config::TelegramConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct SendStickerRequest<'a> {
    chat_id: i64,
    sticker: &'a str,
}

/// Outbound prize delivery through the Telegram Bot API. Calls carry a
/// bounded timeout; the caller decides whether a failure matters (spin
/// delivery treats it as best effort).
#[derive(Clone)]
pub struct TelegramService {
    client: Client,
    config: TelegramConfig,
}

impl TelegramService {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub async fn send_sticker(&self, chat_id: i64, sticker: &str) -> AppResult<()> {
        let url = format!(
            "{}/bot{}/sendSticker",
            self.config.api_base, self.config.bot_token
        );

        let response = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(self.config.send_timeout_secs))
            .json(&SendStickerRequest { chat_id, sticker })
            .send()
            .await?;

        if response.status().is_success() {
            log::info!("Prize sticker delivered to {chat_id}");
            Ok(())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "sendSticker failed: {error_text}"
            )))
        }
    }
}
