//! Fakes for the webhook endpoint and the SMTP relay.

use std::{
    net::SocketAddr,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing, Json, Router,
};
use serde_json::Value;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpListener,
};

use crate::{smtp, webhook, Settings};

pub fn template_dir() -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "..", "..", "templates"].iter().collect()
}

pub fn testdata_dir() -> PathBuf { [env!("CARGO_MANIFEST_DIR"), "testdata"].iter().collect() }

pub fn settings() -> Settings { Settings { template_dir: template_dir(), ..Settings::default() } }

#[derive(Clone, Debug)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

pub struct FakeWebhook {
    pub url: String,
    pub requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl FakeWebhook {
    pub fn settings(&self) -> webhook::Settings {
        webhook::Settings {
            url: Some(self.url.clone()),
            username: Some("hook-user".to_string()),
            password: Some("hook-pass".to_string()),
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> { self.requests.lock().unwrap().clone() }
}

/// Starts an HTTP endpoint answering every `POST /mail` with `status`.
pub async fn spawn_webhook(status: StatusCode, reply: &'static str) -> FakeWebhook {
    let requests = Arc::new(Mutex::new(Vec::new()));

    let captured = Arc::clone(&requests);
    let router = Router::new().route(
        "/mail",
        routing::post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let captured = Arc::clone(&captured);
            async move {
                let authorization = headers
                    .get(AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    .map(ToString::to_string);
                captured.lock().unwrap().push(CapturedRequest { authorization, body });
                (status, reply)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let _handle = tokio::spawn(async move { axum::serve(listener, router).await });

    FakeWebhook { url: format!("http://{address}/mail"), requests }
}

/// An address nothing listens on.
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Starts a plaintext SMTP peer that rejects every authentication attempt.
pub async fn spawn_smtp_rejecting_auth() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    let _handle = tokio::spawn(async move {
        let Ok((stream, _peer)) = listener.accept().await else {
            return;
        };
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        if writer.write_all(b"220 relay.test ESMTP\r\n").await.is_err() {
            return;
        }

        while let Ok(Some(line)) = lines.next_line().await {
            let command = line.to_ascii_uppercase();
            let reply: &[u8] = if command.starts_with("EHLO") || command.starts_with("HELO") {
                b"250-relay.test\r\n250 AUTH PLAIN LOGIN\r\n"
            } else if command.starts_with("AUTH") {
                b"535 5.7.8 Authentication credentials invalid\r\n"
            } else if command.starts_with("QUIT") {
                b"221 2.0.0 Bye\r\n"
            } else {
                b"250 2.0.0 OK\r\n"
            };

            if writer.write_all(reply).await.is_err() || command.starts_with("QUIT") {
                break;
            }
        }
    });

    address
}

pub fn smtp_settings(address: SocketAddr) -> smtp::Settings {
    smtp::Settings {
        host: Some(address.ip().to_string()),
        port: Some(address.port()),
        username: Some("relay-user".to_string()),
        password: Some("wrong-password".to_string()),
        tls: smtp::Tls::Disabled,
        timeout: std::time::Duration::from_secs(5),
    }
}
