use std::fmt::{self, Display, Formatter};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{error, smtp, webhook, Notification, Result, Settings, Transport};

/// What happened to a delivery attempt that did not return an error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Delivery {
    /// The transport took the message.
    Accepted { response: String },

    /// The webhook answered with a status other than `201 Created`.
    Rejected { status: StatusCode, body: String },

    /// The webhook could not be reached or its response could not be read.
    Unreachable { reason: String },
}

impl Delivery {
    #[must_use]
    pub const fn is_accepted(&self) -> bool { matches!(self, Self::Accepted { .. }) }
}

impl Display for Delivery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted { response } => write!(f, "accepted: {response}"),
            Self::Rejected { status, body } => write!(f, "rejected with {status}: {body}"),
            Self::Unreachable { reason } => write!(f, "unreachable: {reason}"),
        }
    }
}

/// The transport chosen for a delivery.
///
/// An SMTP host takes priority over a webhook URL. Only the settings of the
/// chosen transport are checked for completeness.
pub enum Dispatcher {
    Smtp(smtp::Client),
    Webhook(webhook::Client),
}

impl Dispatcher {
    /// Selects and configures the transport described by `settings`.
    ///
    /// # Errors
    ///
    /// - [`Error::IncompleteSmtpConfig`](crate::Error::IncompleteSmtpConfig)
    ///   or [`Error::IncompleteWebhookConfig`](crate::Error::IncompleteWebhookConfig)
    ///   when the selected transport lacks settings
    /// - [`Error::NoTransportConfigured`](crate::Error::NoTransportConfigured)
    ///   when neither transport is selected
    pub fn from_settings(settings: &Settings, http: &reqwest::Client) -> Result<Self> {
        if settings.smtp.is_selected() {
            let config = settings.smtp.to_config()?;
            Ok(Self::Smtp(smtp::Client::new(config)?))
        } else if settings.webhook.is_selected() {
            let config = settings.webhook.to_config()?;
            Ok(Self::Webhook(webhook::Client::new(http.clone(), config)))
        } else {
            error::NoTransportConfiguredSnafu.fail()
        }
    }

    #[must_use]
    pub const fn transport_name(&self) -> &'static str {
        match self {
            Self::Smtp(_) => "smtp",
            Self::Webhook(_) => "webhook",
        }
    }

    /// Relay host or webhook URL of the selected transport.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Smtp(client) => client.host(),
            Self::Webhook(client) => client.url(),
        }
    }

    /// Performs the single delivery attempt for `notification`.
    ///
    /// # Errors
    ///
    /// Returns the SMTP transport's failures. Webhook failures are reported
    /// through [`Delivery`].
    pub async fn send(&self, notification: &Notification) -> Result<Delivery> {
        tracing::debug!(
            transport = self.transport_name(),
            endpoint = self.endpoint(),
            "Dispatching notification"
        );
        self.deliver(notification).await
    }
}

#[async_trait]
impl Transport for Dispatcher {
    async fn deliver(&self, notification: &Notification) -> Result<Delivery> {
        match self {
            Self::Smtp(client) => client.deliver(notification).await,
            Self::Webhook(client) => client.deliver(notification).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{testing, Error};

    fn notification() -> Notification {
        Notification::new("Report", "<p>body</p>", "a@x.com", "sender@x.com").unwrap()
    }

    #[test]
    fn test_no_transport_configured() {
        let result = Dispatcher::from_settings(&testing::settings(), &reqwest::Client::new());

        assert!(matches!(result, Err(Error::NoTransportConfigured)));
    }

    #[test]
    fn test_smtp_takes_priority_over_webhook() {
        let settings = Settings {
            smtp: smtp::Settings {
                host: Some("127.0.0.1".to_string()),
                username: Some("user".to_string()),
                password: Some("pass".to_string()),
                tls: smtp::Tls::Disabled,
                ..smtp::Settings::default()
            },
            webhook: webhook::Settings {
                url: Some("http://127.0.0.1/mail".to_string()),
                username: Some("user".to_string()),
                password: Some("pass".to_string()),
            },
            ..testing::settings()
        };

        let dispatcher = Dispatcher::from_settings(&settings, &reqwest::Client::new()).unwrap();

        assert_eq!(dispatcher.transport_name(), "smtp");
        assert_eq!(dispatcher.endpoint(), "127.0.0.1");
    }

    #[test]
    fn test_incomplete_smtp_is_not_replaced_by_webhook() {
        let settings = Settings {
            smtp: smtp::Settings {
                host: Some("smtp.example.com".to_string()),
                ..smtp::Settings::default()
            },
            webhook: webhook::Settings {
                url: Some("http://127.0.0.1/mail".to_string()),
                username: Some("user".to_string()),
                password: Some("pass".to_string()),
            },
            ..testing::settings()
        };

        let result = Dispatcher::from_settings(&settings, &reqwest::Client::new());

        assert!(matches!(result, Err(Error::IncompleteSmtpConfig { .. })));
    }

    #[test]
    fn test_incomplete_webhook() {
        let settings = Settings {
            webhook: webhook::Settings {
                url: Some("http://127.0.0.1/mail".to_string()),
                ..webhook::Settings::default()
            },
            ..testing::settings()
        };

        let result = Dispatcher::from_settings(&settings, &reqwest::Client::new());

        assert!(matches!(
            result,
            Err(Error::IncompleteWebhookConfig { ref missing }) if missing == &["username", "password"]
        ));
    }

    #[tokio::test]
    async fn test_webhook_success() {
        let webhook = testing::spawn_webhook(StatusCode::CREATED, "{\"id\":1}").await;
        let settings = Settings { webhook: webhook.settings(), ..testing::settings() };

        let dispatcher = Dispatcher::from_settings(&settings, &reqwest::Client::new()).unwrap();
        let delivery = dispatcher.send(&notification()).await.unwrap();

        assert_eq!(dispatcher.transport_name(), "webhook");
        assert_eq!(dispatcher.endpoint(), webhook.url);
        assert!(delivery.is_accepted());
        assert_eq!(delivery.to_string(), "accepted: {\"id\":1}");
    }

    #[tokio::test]
    async fn test_webhook_failure_returns_normally() {
        let webhook = testing::spawn_webhook(StatusCode::INTERNAL_SERVER_ERROR, "down").await;
        let settings = Settings { webhook: webhook.settings(), ..testing::settings() };

        let dispatcher = Dispatcher::from_settings(&settings, &reqwest::Client::new()).unwrap();
        let delivery = dispatcher.send(&notification()).await.unwrap();

        assert!(!delivery.is_accepted());
        assert_eq!(webhook.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_smtp_failure_propagates() {
        let address = testing::spawn_smtp_rejecting_auth().await;
        let settings = Settings { smtp: testing::smtp_settings(address), ..testing::settings() };

        let dispatcher = Dispatcher::from_settings(&settings, &reqwest::Client::new()).unwrap();
        let result = dispatcher.send(&notification()).await;

        assert!(matches!(result, Err(Error::SendSmtp { .. })));
    }
}
