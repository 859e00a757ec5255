//! # Notification Crate
//!
//! Turns queued email requests into rendered HTML messages and delivers them
//! through one of two transports.
//!
//! ## Pipeline
//!
//! 1. [`Trigger`] decodes a raw queue message into a [`Payload`].
//! 2. [`normalize`] validates the payload, picks the sender, renders the body
//!    with [`Renderer`] and produces an immutable [`Notification`].
//! 3. [`Dispatcher`] selects the SMTP relay or the webhook from [`Settings`]
//!    and performs exactly one delivery attempt.
//!
//! SMTP failures are returned as errors. Webhook failures are logged and
//! reported as a [`Delivery`] outcome instead, so the caller sees a completed
//! invocation.

pub mod dispatcher;
mod error;
pub mod payload;
pub mod smtp;
pub mod template;
pub mod trigger;
pub mod webhook;

#[cfg(test)]
mod testing;

use std::path::PathBuf;

use async_trait::async_trait;
use snafu::ensure;

pub use self::{
    dispatcher::{Delivery, Dispatcher},
    error::Error,
    payload::{normalize, normalize_recipients, Payload},
    template::Renderer,
    trigger::Trigger,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Name of the template every notification body is rendered from.
pub const EMAIL_TEMPLATE: &str = "email.html";

/// Directory templates are loaded from unless configured otherwise.
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// A fully assembled email, ready for a single delivery attempt.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    subject: String,
    body: String,
    recipients: String,
    sender: String,
}

impl Notification {
    /// Creates a notification.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRecipients`] or [`Error::MissingSender`] when
    /// the respective value is empty.
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        recipients: impl Into<String>,
        sender: impl Into<String>,
    ) -> Result<Self> {
        let recipients = recipients.into();
        let sender = sender.into();
        ensure!(!recipients.is_empty(), error::MissingRecipientsSnafu);
        ensure!(!sender.is_empty(), error::MissingSenderSnafu);

        Ok(Self { subject: subject.into(), body: body.into(), recipients, sender })
    }

    #[must_use]
    pub fn subject(&self) -> &str { &self.subject }

    #[must_use]
    pub fn body(&self) -> &str { &self.body }

    /// Comma separated recipient list, one space after every comma.
    #[must_use]
    pub fn recipients(&self) -> &str { &self.recipients }

    #[must_use]
    pub fn sender(&self) -> &str { &self.sender }
}

/// Process wide settings, read once at start and never mutated.
///
/// Transport settings stay raw here. They are checked for completeness only
/// when [`Dispatcher::from_settings`] selects the transport they belong to.
#[derive(Clone, Debug)]
pub struct Settings {
    pub default_sender: Option<String>,

    pub template_dir: PathBuf,

    pub smtp: smtp::Settings,

    pub webhook: webhook::Settings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_sender: None,
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            smtp: smtp::Settings::default(),
            webhook: webhook::Settings::default(),
        }
    }
}

impl Settings {
    /// The configured default sender, ignoring empty values.
    #[must_use]
    pub fn default_sender(&self) -> Option<&str> { non_empty(self.default_sender.as_ref()) }
}

/// A delivery mechanism capable of sending a [`Notification`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one delivery attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the attempt failed in a way the transport
    /// propagates.
    async fn deliver(&self, notification: &Notification) -> Result<Delivery>;
}

/// Unset and empty settings are treated alike.
pub(crate) fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|value| !value.is_empty())
}
