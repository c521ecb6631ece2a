//! Notifier Use Case
//!
//! Builds the confirmation link and message for a token and hands it to the
//! messaging channel.

use std::sync::Arc;

use crate::domain::ports::MessageChannel;
use crate::domain::services::{confirmation_link, render_message};
use crate::domain::value_objects::{ChallengeToken, DeliveryCredentials};
use crate::error::GateResult;

/// Notifier Use Case
pub struct Notifier<M>
where
    M: MessageChannel,
{
    channel: Arc<M>,
    public_base_url: String,
}

impl<M> Notifier<M>
where
    M: MessageChannel,
{
    pub fn new(channel: Arc<M>, public_base_url: impl Into<String>) -> Self {
        Self {
            channel,
            public_base_url: public_base_url.into(),
        }
    }

    /// Send the confirmation link; `Ok` means the channel accepted it, not
    /// that the user has seen it
    pub async fn send(
        &self,
        delivery: &DeliveryCredentials,
        token: &ChallengeToken,
    ) -> GateResult<()> {
        let link = confirmation_link(&self.public_base_url, token);
        let html = render_message(&link);

        self.channel.send_html(delivery, &html).await?;

        tracing::info!(token_fp = %token.fingerprint(), "Authentication link sent");
        Ok(())
    }
}
