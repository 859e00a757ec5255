//! Delivery through an HTTP webhook protected by basic authentication.
//!
//! The webhook is expected to answer `201 Created`. Anything else, including
//! network failures, is logged and reported as a [`Delivery`] outcome rather
//! than an error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;

use crate::{error, non_empty, Delivery, Notification, Result, Transport};

/// Upper bound for a single webhook request, connection included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw webhook settings; a URL selects this transport.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    pub url: Option<String>,

    pub username: Option<String>,

    pub password: Option<String>,
}

impl Settings {
    /// Whether these settings select the webhook transport.
    #[must_use]
    pub fn is_selected(&self) -> bool { non_empty(self.url.as_ref()).is_some() }

    /// Checks the settings for completeness.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteWebhookConfig`](crate::Error::IncompleteWebhookConfig)
    /// naming every missing value.
    pub fn to_config(&self) -> Result<Config> {
        match (
            non_empty(self.url.as_ref()),
            non_empty(self.username.as_ref()),
            non_empty(self.password.as_ref()),
        ) {
            (Some(url), Some(username), Some(password)) => Ok(Config {
                url: url.to_string(),
                username: username.to_string(),
                password: password.to_string(),
            }),
            (url, username, password) => {
                let missing: Vec<&'static str> =
                    [("url", url), ("username", username), ("password", password)]
                        .into_iter()
                        .filter_map(|(name, value)| value.is_none().then_some(name))
                        .collect();
                error::IncompleteWebhookConfigSnafu { missing }.fail()
            }
        }
    }
}

/// Complete webhook configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub url: String,

    pub username: String,

    pub password: String,
}

#[derive(Debug, Serialize)]
struct WebhookRequest<'a> {
    subject: &'a str,
    body: &'a str,
    to: &'a str,
    sender: &'a str,
}

/// Webhook client, cheap to clone.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    config: Config,
}

impl Client {
    #[must_use]
    pub const fn new(http: reqwest::Client, config: Config) -> Self { Self { http, config } }

    #[must_use]
    pub fn url(&self) -> &str { &self.config.url }
}

#[async_trait]
impl Transport for Client {
    async fn deliver(&self, notification: &Notification) -> Result<Delivery> {
        let request = WebhookRequest {
            subject: notification.subject(),
            body: notification.body(),
            to: notification.recipients(),
            sender: notification.sender(),
        };

        let sent = self
            .http
            .post(&self.config.url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(url = %self.config.url, error = %err, "Failed to reach webhook");
                return Ok(Delivery::Unreachable { reason: err.to_string() });
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(
                    url = %self.config.url,
                    %status,
                    error = %err,
                    "Failed to read webhook response"
                );
                return Ok(Delivery::Unreachable { reason: err.to_string() });
            }
        };

        if status == StatusCode::CREATED {
            tracing::info!(to = %notification.recipients(), "Email sent: {body}");
            Ok(Delivery::Accepted { response: body })
        } else {
            tracing::error!(to = %notification.recipients(), "Error {}: {body}", status.as_u16());
            Ok(Delivery::Rejected { status, body })
        }
    }
}
