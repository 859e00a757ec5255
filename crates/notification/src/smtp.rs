//! Delivery through an authenticated SMTP relay.
//!
//! Failures here are returned to the caller, unlike the webhook transport.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use snafu::ResultExt;

use crate::{error, non_empty, Delivery, Error, Notification, Result, Transport};

/// Submission port used when none is configured.
pub const DEFAULT_PORT: u16 = 587;

/// Upper bound for every read and write on the relay connection.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the relay connection is secured.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Tls {
    /// Plain connection upgraded with `STARTTLS` before authenticating.
    #[default]
    Starttls,

    /// TLS from the first byte.
    Implicit,

    /// No encryption at all; only meant for local relays.
    Disabled,
}

/// Raw SMTP settings; a host selects this transport.
#[derive(Clone, Debug)]
pub struct Settings {
    pub host: Option<String>,

    pub port: Option<u16>,

    pub username: Option<String>,

    pub password: Option<String>,

    pub tls: Tls,

    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            username: None,
            password: None,
            tls: Tls::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Settings {
    /// Whether these settings select the SMTP transport.
    #[must_use]
    pub fn is_selected(&self) -> bool { non_empty(self.host.as_ref()).is_some() }

    /// Checks the settings for completeness, defaulting the port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteSmtpConfig`] naming every missing value.
    pub fn to_config(&self) -> Result<Config> {
        match (
            non_empty(self.host.as_ref()),
            non_empty(self.username.as_ref()),
            non_empty(self.password.as_ref()),
        ) {
            (Some(host), Some(username), Some(password)) => Ok(Config {
                host: host.to_string(),
                port: self.port.unwrap_or(DEFAULT_PORT),
                username: username.to_string(),
                password: password.to_string(),
                tls: self.tls,
                timeout: self.timeout,
            }),
            (host, username, password) => {
                let missing: Vec<&'static str> =
                    [("host", host), ("username", username), ("password", password)]
                        .into_iter()
                        .filter_map(|(name, value)| value.is_none().then_some(name))
                        .collect();
                error::IncompleteSmtpConfigSnafu { missing }.fail()
            }
        }
    }
}

/// Complete SMTP configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,

    pub port: u16,

    pub username: String,

    pub password: String,

    pub tls: Tls,

    pub timeout: Duration,
}

/// SMTP relay client. Every delivery opens and closes its own connection.
pub struct Client {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl Client {
    /// Creates a client for the relay described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if TLS parameters cannot be created for the host.
    pub fn new(config: Config) -> Result<Self> {
        let Config { host, port, username, password, tls, timeout } = config;

        tracing::info!(%host, port, ?tls, "Using SMTP relay");

        let builder = match tls {
            Tls::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
                .context(error::CreateSmtpTransportSnafu { host: host.clone() })?,
            Tls::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
                .context(error::CreateSmtpTransportSnafu { host: host.clone() })?,
            Tls::Disabled => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&host),
        };

        let transport = builder
            .port(port)
            .credentials(Credentials::new(username, password))
            .timeout(Some(timeout))
            .build();

        Ok(Self { transport, host })
    }

    #[must_use]
    pub fn host(&self) -> &str { &self.host }
}

#[async_trait]
impl Transport for Client {
    async fn deliver(&self, notification: &Notification) -> Result<Delivery> {
        let message = build_message(notification).inspect_err(|err| {
            tracing::error!(to = %notification.recipients(), error = %err, "Failed to build email");
        })?;

        match self.transport.send(message).await {
            Ok(response) => {
                let reply = response.first_line().unwrap_or_default().to_string();
                tracing::info!(
                    host = %self.host,
                    to = %notification.recipients(),
                    "Email sent: {reply}"
                );
                Ok(Delivery::Accepted { response: reply })
            }
            Err(source) => {
                tracing::error!(
                    host = %self.host,
                    error = %source,
                    "Failed to send email via SMTP relay"
                );
                Err(Error::SendSmtp { host: self.host.clone(), source })
            }
        }
    }
}

/// Splits a normalized recipient list into individual addresses.
#[must_use]
pub fn split_recipients(recipients: &str) -> Vec<&str> {
    recipients.split(',').map(str::trim).filter(|address| !address.is_empty()).collect()
}

/// Builds a `multipart/alternative` message with a single HTML part.
///
/// # Errors
///
/// Returns an error if an address cannot be parsed or the message cannot be
/// assembled.
fn build_message(notification: &Notification) -> Result<Message> {
    let builder = Message::builder()
        .from(parse_mailbox(notification.sender())?)
        .subject(notification.subject());

    let builder = split_recipients(notification.recipients())
        .into_iter()
        .try_fold(builder, |builder, address| {
            Ok::<_, Error>(builder.to(parse_mailbox(address)?))
        })?;

    builder
        .multipart(
            MultiPart::alternative().singlepart(SinglePart::html(notification.body().to_string())),
        )
        .context(error::BuildEmailSnafu)
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address.parse().context(error::InvalidAddressSnafu { address })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    fn notification() -> Notification {
        Notification::new("Report", "<p>body</p>", "a@x.com, b@x.com", "sender@x.com").unwrap()
    }

    #[test]
    fn test_split_recipients() {
        assert_eq!(split_recipients("a@x.com, b@x.com"), vec!["a@x.com", "b@x.com"]);
        assert_eq!(split_recipients("a@x.com"), vec!["a@x.com"]);
        assert_eq!(split_recipients("a@x.com, ,b@x.com"), vec!["a@x.com", "b@x.com"]);
    }

    #[test]
    fn test_settings_selection_and_defaults() {
        let settings = Settings {
            host: Some("smtp.example.com".to_string()),
            username: Some("user".to_string()),
            password: Some("pass".to_string()),
            ..Settings::default()
        };

        assert!(settings.is_selected());
        assert!(!Settings::default().is_selected());

        let config = settings.to_config().unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.tls, Tls::Starttls);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_incomplete_settings_name_missing_values() {
        let settings =
            Settings { host: Some("smtp.example.com".to_string()), ..Settings::default() };

        let result = settings.to_config();

        assert!(matches!(
            result,
            Err(Error::IncompleteSmtpConfig { ref missing }) if missing == &["username", "password"]
        ));
    }

    #[test]
    fn test_build_message() {
        let message = build_message(&notification()).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("multipart/alternative"));
        assert!(formatted.contains("text/html"));
        assert!(formatted.contains("<p>body</p>"));
        assert!(formatted.contains("sender@x.com"));
        assert!(formatted.contains("a@x.com"));
        assert!(formatted.contains("b@x.com"));
        assert!(formatted.contains("Subject: Report"));

        let envelope = message.envelope();
        assert_eq!(envelope.to().len(), 2);
    }

    #[test]
    fn test_build_message_invalid_sender() {
        let notification =
            Notification::new("Report", "<p>body</p>", "a@x.com", "invalid-email").unwrap();

        let result = build_message(&notification);

        assert!(matches!(
            result,
            Err(Error::InvalidAddress { ref address, .. }) if address == "invalid-email"
        ));
    }

    #[tokio::test]
    async fn test_authentication_failure_propagates() {
        let address = testing::spawn_smtp_rejecting_auth().await;
        let config = testing::smtp_settings(address).to_config().unwrap();
        let client = Client::new(config).unwrap();

        let result = client.deliver(&notification()).await;

        assert!(matches!(result, Err(Error::SendSmtp { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_relay_propagates() {
        let address = testing::closed_address().await;
        let config = testing::smtp_settings(address).to_config().unwrap();
        let client = Client::new(config).unwrap();

        let result = client.deliver(&notification()).await;

        assert!(matches!(result, Err(Error::SendSmtp { .. })));
    }
}
