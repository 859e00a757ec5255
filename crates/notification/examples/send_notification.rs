//! Example: render a sample report and deliver it with the transport
//! selected from the environment.
//!
//! # Usage
//!
//! ```bash
//! export DEFAULT_SENDER="reports@yourdomain.com"
//! export WEBHOOK_URL="https://hooks.yourdomain.com/mail"
//! export WEBHOOK_USER="mailer"
//! export WEBHOOK_PASS="secret"
//! cargo run --example send_notification -- user@example.com
//! ```

use notification::{smtp, webhook, Settings, Trigger};
use serde_json::json;

fn env(name: &str) -> Option<String> { std::env::var(name).ok() }

#[tokio::main]
async fn main() -> Result<(), notification::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let recipients = std::env::args().nth(1).unwrap_or_else(|| "user@example.com".to_string());

    let settings = Settings {
        default_sender: env("DEFAULT_SENDER"),
        template_dir: [env!("CARGO_MANIFEST_DIR"), "..", "..", "templates"].iter().collect(),
        smtp: smtp::Settings {
            host: env("SMTP_HOST"),
            port: env("SMTP_PORT").and_then(|port| port.parse().ok()),
            username: env("SMTP_USER"),
            password: env("SMTP_PASS"),
            ..smtp::Settings::default()
        },
        webhook: webhook::Settings {
            url: env("WEBHOOK_URL"),
            username: env("WEBHOOK_USER"),
            password: env("WEBHOOK_PASS"),
        },
    };

    let message = json!({
        "recipients": recipients,
        "subject": "Sample report",
        "header": "Nightly jobs",
        "caption": "Results",
        "columns": ["Job", "Status"],
        "rows": [["backup", "ok"], ["import", "failed"]],
        "footer": "This email was sent by the notification example.",
    });

    let trigger = Trigger::new(settings)?;
    let delivery = trigger.handle(message.to_string().as_bytes()).await?;

    tracing::info!("Delivery {delivery}");
    Ok(())
}
