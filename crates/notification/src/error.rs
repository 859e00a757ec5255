use std::path::PathBuf;

use snafu::Snafu;

/// Errors that can occur in the notification crate.
///
/// Webhook network failures and non-success statuses are not represented
/// here: they are reported as [`Delivery`](crate::Delivery) outcomes.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// The queue message body is not valid UTF-8.
    #[snafu(display("Queue message is not valid UTF-8, error: {source}"))]
    DecodeMessage { source: std::str::Utf8Error },

    /// The queue message body is not a JSON payload of the expected shape.
    #[snafu(display("Could not parse queue message as JSON, error: {source}"))]
    ParseMessage { source: serde_json::Error },

    /// The payload carries no recipients.
    #[snafu(display("No recipients"))]
    MissingRecipients,

    /// The payload carries no sender and no default sender is configured.
    #[snafu(display("No sender"))]
    MissingSender,

    #[snafu(display("Template `{name}` was not found in {}", template_dir.display()))]
    TemplateNotFound { name: String, template_dir: PathBuf },

    #[snafu(display("Template `{name}` could not be parsed, error: {source}"))]
    TemplateSyntax { name: String, source: minijinja::Error },

    #[snafu(display("Failed to render template `{name}`, error: {source}"))]
    RenderTemplate { name: String, source: minijinja::Error },

    /// The SMTP transport is selected but some of its settings are missing.
    #[snafu(display("SMTP transport is not fully configured, missing: {}", missing.join(", ")))]
    IncompleteSmtpConfig { missing: Vec<&'static str> },

    /// The webhook transport is selected but some of its settings are missing.
    #[snafu(display("Webhook transport is not fully configured, missing: {}", missing.join(", ")))]
    IncompleteWebhookConfig { missing: Vec<&'static str> },

    /// Neither an SMTP host nor a webhook URL is configured.
    #[snafu(display("No transport configured, set an SMTP host or a webhook URL"))]
    NoTransportConfigured,

    #[snafu(display("Failed to create HTTP client, error: {source}"))]
    CreateHttpClient { source: reqwest::Error },

    #[snafu(display("Failed to create SMTP transport for {host}, error: {source}"))]
    CreateSmtpTransport { host: String, source: lettre::transport::smtp::Error },

    #[snafu(display("Invalid email address `{address}`, error: {source}"))]
    InvalidAddress { address: String, source: lettre::address::AddressError },

    /// Failed to build email.
    #[snafu(display("Failed to build email message, error: {source}"))]
    BuildEmail { source: lettre::error::Error },

    /// The SMTP relay refused or failed the session.
    #[snafu(display("Failed to send email via SMTP relay {host}, error: {source}"))]
    SendSmtp { host: String, source: lettre::transport::smtp::Error },
}
