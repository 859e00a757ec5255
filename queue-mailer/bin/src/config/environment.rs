use std::path::PathBuf;

use clap::Args;
use snafu::ResultExt;

use super::{error, Config, Error};

/// Well-known environment variables of the Functions app.
///
/// Every value set here wins over the configuration file. Empty values are
/// treated as unset.
#[derive(Args, Clone, Debug, Default)]
pub struct EnvironmentOverrides {
    #[arg(long = "source-queue", env = "SOURCE_QUEUE", help = "Queue consumed by the handler")]
    pub source_queue: Option<String>,

    #[arg(
        long = "default-sender",
        env = "DEFAULT_SENDER",
        help = "Sender used when a message does not name one"
    )]
    pub default_sender: Option<String>,

    #[arg(long = "template-dir", env = "TEMPLATE_DIR", help = "Directory of email templates")]
    pub template_dir: Option<PathBuf>,

    #[arg(long = "smtp-host", env = "SMTP_HOST", help = "SMTP relay host, selects SMTP delivery")]
    pub smtp_host: Option<String>,

    #[arg(long = "smtp-port", env = "SMTP_PORT", help = "SMTP relay port")]
    pub smtp_port: Option<String>,

    #[arg(long = "smtp-user", env = "SMTP_USER", help = "SMTP user name")]
    pub smtp_user: Option<String>,

    #[arg(long = "smtp-pass", env = "SMTP_PASS", hide_env_values = true, help = "SMTP password")]
    pub smtp_pass: Option<String>,

    #[arg(long = "webhook-url", env = "WEBHOOK_URL", help = "Webhook endpoint")]
    pub webhook_url: Option<String>,

    #[arg(long = "webhook-user", env = "WEBHOOK_USER", help = "Webhook basic auth user")]
    pub webhook_user: Option<String>,

    #[arg(
        long = "webhook-pass",
        env = "WEBHOOK_PASS",
        hide_env_values = true,
        help = "Webhook basic auth password"
    )]
    pub webhook_pass: Option<String>,

    #[arg(
        long = "handler-port",
        env = "FUNCTIONS_CUSTOMHANDLER_PORT",
        help = "Port the custom handler listens on"
    )]
    pub handler_port: Option<String>,
}

impl EnvironmentOverrides {
    /// Writes every non-empty value into `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a port is not a number.
    pub fn apply(self, config: &mut Config) -> Result<(), Error> {
        let Self {
            source_queue,
            default_sender,
            template_dir,
            smtp_host,
            smtp_port,
            smtp_user,
            smtp_pass,
            webhook_url,
            webhook_user,
            webhook_pass,
            handler_port,
        } = self;

        let mailer = &mut config.mailer;

        override_with(&mut config.queue, source_queue);
        override_with(&mut mailer.default_sender, default_sender);
        override_with(&mut mailer.smtp.host, smtp_host);
        override_with(&mut mailer.smtp.username, smtp_user);
        override_with(&mut mailer.smtp.password, smtp_pass);
        override_with(&mut mailer.webhook.url, webhook_url);
        override_with(&mut mailer.webhook.username, webhook_user);
        override_with(&mut mailer.webhook.password, webhook_pass);

        if let Some(template_dir) = template_dir.filter(|dir| !dir.as_os_str().is_empty()) {
            mailer.template_dir = template_dir;
        }
        if let Some(port) = non_empty(smtp_port) {
            mailer.smtp.port = Some(parse_port("SMTP_PORT", port)?);
        }
        if let Some(port) = non_empty(handler_port) {
            config.handler.port = parse_port("FUNCTIONS_CUSTOMHANDLER_PORT", port)?;
        }

        Ok(())
    }
}

fn override_with(target: &mut Option<String>, value: Option<String>) {
    if let Some(value) = non_empty(value) {
        *target = Some(value);
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_port(variable: &'static str, value: String) -> Result<u16, Error> {
    let port = value.trim().parse::<u16>();
    port.context(error::InvalidPortSnafu { variable, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win_over_file() {
        let mut config = Config::default();
        config.mailer.webhook.url = Some("http://file/mail".to_string());
        config.mailer.default_sender = Some("file@x.com".to_string());

        EnvironmentOverrides {
            source_queue: Some("emails".to_string()),
            webhook_url: Some("http://env/mail".to_string()),
            smtp_port: Some("2525".to_string()),
            handler_port: Some("7071".to_string()),
            ..EnvironmentOverrides::default()
        }
        .apply(&mut config)
        .unwrap();

        assert_eq!(config.queue.as_deref(), Some("emails"));
        assert_eq!(config.mailer.webhook.url.as_deref(), Some("http://env/mail"));
        assert_eq!(config.mailer.default_sender.as_deref(), Some("file@x.com"));
        assert_eq!(config.mailer.smtp.port, Some(2525));
        assert_eq!(config.handler.port, 7071);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let mut config = Config::default();
        config.mailer.smtp.host = Some("smtp.example.com".to_string());

        EnvironmentOverrides {
            smtp_host: Some(String::new()),
            smtp_port: Some(" ".to_string()),
            template_dir: Some(PathBuf::new()),
            ..EnvironmentOverrides::default()
        }
        .apply(&mut config)
        .unwrap();

        assert_eq!(config.mailer.smtp.host.as_deref(), Some("smtp.example.com"));
        assert_eq!(config.mailer.smtp.port, None);
        assert_eq!(config.mailer.template_dir, PathBuf::from("templates"));
    }

    #[test]
    fn test_invalid_port() {
        let result = EnvironmentOverrides {
            smtp_port: Some("smtp".to_string()),
            ..EnvironmentOverrides::default()
        }
        .apply(&mut Config::default());

        assert!(matches!(result, Err(Error::InvalidPort { variable: "SMTP_PORT", .. })));
    }
}
