use snafu::ResultExt;

use crate::{
    error, normalize, webhook, Delivery, Dispatcher, Notification, Payload, Renderer, Result,
    Settings,
};

/// Entry point invoked once per queue message.
///
/// Holds only read-only state, so one instance can serve concurrent
/// invocations.
#[derive(Clone, Debug)]
pub struct Trigger {
    settings: Settings,
    renderer: Renderer,
    http: reqwest::Client,
}

impl Trigger {
    /// Creates a trigger for `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(settings: Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(webhook::REQUEST_TIMEOUT)
            .build()
            .context(error::CreateHttpClientSnafu)?;
        let renderer = Renderer::new(settings.template_dir.clone());
        tracing::info!(
            template_dir = %renderer.template_dir().display(),
            "Loading email templates"
        );

        Ok(Self { settings, renderer, http })
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings { &self.settings }

    /// Decodes a raw message body and turns it into a [`Notification`]
    /// without dispatching it.
    ///
    /// # Errors
    ///
    /// Returns decoding, validation and template errors.
    pub fn prepare(&self, body: &[u8]) -> Result<Notification> {
        let message = std::str::from_utf8(body).context(error::DecodeMessageSnafu)?;
        let payload: Payload = serde_json::from_str(message).context(error::ParseMessageSnafu)?;

        normalize(&payload, &self.settings, &self.renderer)
    }

    /// Handles one queue message: decode, normalize, dispatch.
    ///
    /// # Errors
    ///
    /// Every error propagates so the queue runtime can apply its own retry
    /// policy. Webhook delivery failures are not errors; see [`Delivery`].
    pub async fn handle(&self, body: &[u8]) -> Result<Delivery> {
        let notification = self.prepare(body)?;

        tracing::debug!(
            to = %notification.recipients(),
            sender = %notification.sender(),
            subject = %notification.subject(),
            "Notification prepared"
        );

        let dispatcher = Dispatcher::from_settings(&self.settings, &self.http)?;
        dispatcher.send(&notification).await
    }
}
