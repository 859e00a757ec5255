//! Validation and normalization of queue payloads.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use snafu::OptionExt;

use crate::{error, Notification, Renderer, Result, Settings, EMAIL_TEMPLATE};

static COMMA_WITHOUT_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\S)").expect("pattern is valid"));

/// An email request as it arrives on the queue.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Payload {
    pub recipients: Option<String>,

    pub sender: Option<String>,

    pub subject: Option<String>,

    pub header: Option<String>,

    pub caption: Option<String>,

    pub columns: Option<Vec<String>>,

    pub rows: Option<Vec<Vec<String>>>,

    pub footer: Option<String>,
}

/// Values handed to the email template.
#[derive(Debug, Serialize)]
struct EmailContent<'a> {
    header: &'a str,
    caption: &'a str,
    columns: &'a [String],
    rows: &'a [Vec<String>],
    footer: &'a str,
}

impl<'a> From<&'a Payload> for EmailContent<'a> {
    fn from(payload: &'a Payload) -> Self {
        Self {
            header: payload.header.as_deref().unwrap_or_default(),
            caption: payload.caption.as_deref().unwrap_or_default(),
            columns: payload.columns.as_deref().unwrap_or_default(),
            rows: payload.rows.as_deref().unwrap_or_default(),
            footer: payload.footer.as_deref().unwrap_or_default(),
        }
    }
}

/// Turns a payload into a [`Notification`].
///
/// Recipients are checked before anything is rendered. A payload without a
/// sender falls back to [`Settings::default_sender`].
///
/// # Errors
///
/// - [`Error::MissingRecipients`](crate::Error::MissingRecipients) if the
///   payload has no recipients
/// - [`Error::MissingSender`](crate::Error::MissingSender) if neither the
///   payload nor the settings provide a sender
/// - any template error from [`Renderer::render`]
pub fn normalize(
    payload: &Payload,
    settings: &Settings,
    renderer: &Renderer,
) -> Result<Notification> {
    let recipients = payload
        .recipients
        .as_deref()
        .filter(|recipients| !recipients.is_empty())
        .context(error::MissingRecipientsSnafu)?;

    let sender = match payload.sender.as_deref().filter(|sender| !sender.is_empty()) {
        Some(sender) => sender,
        None => settings.default_sender().context(error::MissingSenderSnafu)?,
    };

    let body = renderer.render(EMAIL_TEMPLATE, EmailContent::from(payload))?;

    Notification::new(
        payload.subject.as_deref().unwrap_or_default(),
        body,
        normalize_recipients(recipients),
        sender,
    )
}

/// Inserts a single space after every comma directly followed by a
/// non-whitespace character.
///
/// Commas already followed by whitespace, Unicode whitespace included, are
/// left alone and runs of spaces are kept. Addresses themselves are not inspected.
#[must_use]
pub fn normalize_recipients(recipients: &str) -> String {
    COMMA_WITHOUT_SPACE.replace_all(recipients, ", ${1}").into_owned()
}
