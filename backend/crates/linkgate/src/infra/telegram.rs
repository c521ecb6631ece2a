//! Telegram Bot API Channel
//!
//! Delivers the confirmation message with `sendMessage`. The bot key is part
//! of the request path, so transport errors are stripped of their URL before
//! they reach an error value or a log line.

use serde::Serialize;
use url::Url;

use crate::domain::ports::MessageChannel;
use crate::domain::value_objects::DeliveryCredentials;
use crate::error::{GateError, GateResult};

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Telegram message channel
#[derive(Clone)]
pub struct TelegramChannel {
    client: reqwest::Client,
    api_base: String,
}

impl TelegramChannel {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
        }
    }

    fn endpoint(&self, delivery: &DeliveryCredentials) -> GateResult<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| GateError::Dispatch(format!("invalid Bot API base: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| GateError::Dispatch("Bot API base cannot hold a path".to_string()))?
            .pop_if_empty()
            .push(&format!("bot{}", delivery.bot_credential().expose()))
            .push("sendMessage");
        Ok(url)
    }
}

impl MessageChannel for TelegramChannel {
    async fn send_html(&self, delivery: &DeliveryCredentials, html: &str) -> GateResult<()> {
        let url = self.endpoint(delivery)?;
        let form = SendMessage {
            chat_id: delivery.chat_target(),
            text: html,
            parse_mode: "HTML",
        };

        let response = self
            .client
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(|e| GateError::Dispatch(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GateError::Dispatch(format!(
                "Bot API answered {}",
                status.as_u16()
            )));
        }

        tracing::debug!(status = status.as_u16(), "Bot API accepted message");
        Ok(())
    }
}
