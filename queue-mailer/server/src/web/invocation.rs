//! Invocation protocol between the Functions host and the custom handler.

use axum::{extract::State, http::StatusCode, Json};
use queue_mailer_core::QUEUE_BINDING;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::Instrument;

use super::ServiceState;

/// Body the host posts for every dequeued message.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvocationRequest {
    #[serde(default)]
    pub data: Map<String, Value>,

    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl InvocationRequest {
    /// Raw bytes of the queue message.
    ///
    /// The host passes a string for plain messages and may pass an already
    /// decoded JSON value, which is serialized back.
    #[must_use]
    pub fn message(&self) -> Option<Vec<u8>> {
        match self.data.get(QUEUE_BINDING)? {
            Value::Null => None,
            Value::String(message) => Some(message.clone().into_bytes()),
            value => Some(value.to_string().into_bytes()),
        }
    }

    fn metadata_field(&self, key: &str) -> String {
        match self.metadata.get(key) {
            Some(Value::String(value)) => value.clone(),
            Some(Value::Null) | None => String::from("-"),
            Some(value) => value.to_string(),
        }
    }
}

/// Body returned to the host.
///
/// The queue trigger has no output bindings, so `Outputs` stays empty and
/// `Logs` carries the outcome.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvocationResponse {
    pub outputs: Map<String, Value>,

    pub logs: Vec<String>,

    pub return_value: Option<Value>,
}

impl InvocationResponse {
    fn with_log(log: impl Into<String>) -> Self {
        Self { logs: vec![log.into()], ..Self::default() }
    }
}

/// Handles one queue message.
///
/// Any error returned by the trigger answers `500`, so the host counts the
/// invocation as failed and applies the queue's retry policy.
pub async fn queue_send_email(
    State(state): State<ServiceState>,
    Json(request): Json<InvocationRequest>,
) -> (StatusCode, Json<InvocationResponse>) {
    let message_id = request.metadata_field("Id");
    let dequeue_count = request.metadata_field("DequeueCount");
    let span = tracing::info_span!("invocation", %message_id, %dequeue_count);

    async move {
        let Some(message) = request.message() else {
            tracing::warn!("Invocation carries no `{QUEUE_BINDING}` binding");
            return (
                StatusCode::BAD_REQUEST,
                Json(InvocationResponse::with_log(format!("Missing `{QUEUE_BINDING}` binding"))),
            );
        };

        match state.trigger.handle(&message).await {
            Ok(delivery) => {
                tracing::debug!(%delivery, "Queue message processed");
                (StatusCode::OK, Json(InvocationResponse::with_log(delivery.to_string())))
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to process queue message");
                let response = InvocationResponse::with_log(err.to_string());
                (StatusCode::INTERNAL_SERVER_ERROR, Json(response))
            }
        }
    }
    .instrument(span)
    .await
}
