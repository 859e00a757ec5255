use std::{path::PathBuf, time::Duration};

use notification::{smtp, webhook};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MailerConfig {
    /// Sender used when a message does not name one
    #[serde(default)]
    pub default_sender: Option<String>,

    #[serde(default = "MailerConfig::default_template_dir")]
    pub template_dir: PathBuf,

    #[serde(default)]
    pub smtp: SmtpConfig,

    #[serde(default)]
    pub webhook: WebhookConfig,
}

impl MailerConfig {
    #[inline]
    pub fn default_template_dir() -> PathBuf { PathBuf::from(notification::DEFAULT_TEMPLATE_DIR) }
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            default_sender: None,
            template_dir: Self::default_template_dir(),
            smtp: SmtpConfig::default(),
            webhook: WebhookConfig::default(),
        }
    }
}

impl From<MailerConfig> for notification::Settings {
    fn from(MailerConfig { default_sender, template_dir, smtp, webhook }: MailerConfig) -> Self {
        Self { default_sender, template_dir, smtp: smtp.into(), webhook: webhook.into() }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    /// Upgrade with `STARTTLS` before authenticating
    #[default]
    Starttls,

    /// TLS from the first byte, usually on port 465
    Implicit,

    /// Plain text, for local relays only
    Disabled,
}

impl From<SmtpTls> for smtp::Tls {
    fn from(tls: SmtpTls) -> Self {
        match tls {
            SmtpTls::Starttls => Self::Starttls,
            SmtpTls::Implicit => Self::Implicit,
            SmtpTls::Disabled => Self::Disabled,
        }
    }
}

/// SMTP relay; setting `host` selects this transport over the webhook.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SmtpConfig {
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub tls: SmtpTls,

    #[serde(default = "SmtpConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SmtpConfig {
    #[inline]
    pub const fn default_timeout_secs() -> u64 { smtp::DEFAULT_TIMEOUT.as_secs() }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            username: None,
            password: None,
            tls: SmtpTls::default(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl From<SmtpConfig> for smtp::Settings {
    fn from(SmtpConfig { host, port, username, password, tls, timeout_secs }: SmtpConfig) -> Self {
        Self {
            host,
            port,
            username,
            password,
            tls: tls.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl From<WebhookConfig> for webhook::Settings {
    fn from(WebhookConfig { url, username, password }: WebhookConfig) -> Self {
        Self { url, username, password }
    }
}
