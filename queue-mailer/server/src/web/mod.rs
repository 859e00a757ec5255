pub mod error;
pub mod invocation;

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{http, response::IntoResponse, routing, Extension, Json, Router};
use notification::Trigger;
use queue_mailer_core::{ServerInfo, FUNCTION_NAME};
use serde_json::json;
use snafu::ResultExt;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub use self::error::Error;

pub async fn new_handler_server<ShutdownSignal>(
    socket_address: SocketAddr,
    service_state: ServiceState,
    server_info: ServerInfo,
    shutdown_signal: ShutdownSignal,
) -> Result<(), Error>
where
    ShutdownSignal: Future<Output = ()> + Send + 'static,
{
    let router = router(service_state, server_info);

    let listener = TcpListener::bind(&socket_address).await.context(error::BindTcpServerSnafu)?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|err| Error::ServeHttpServer { message: err.to_string() })
}

/// Routes served to the Functions host.
///
/// The host forwards each queue message to `POST /<function name>`.
pub fn router(service_state: ServiceState, server_info: ServerInfo) -> Router {
    let middleware_stack = ServiceBuilder::new().layer(TraceLayer::new_for_http());

    Router::new()
        // liveness probe
        .route("/", routing::get(server_info_handler))
        .route(&format!("/{FUNCTION_NAME}"), routing::post(invocation::queue_send_email))
        .with_state(service_state)
        .layer(Extension(server_info))
        .layer(middleware_stack)
        .fallback(fallback)
}

// SAFETY: `axum` handler must be async
#[allow(clippy::unused_async)]
async fn server_info_handler(Extension(server_info): Extension<ServerInfo>) -> Json<ServerInfo> {
    Json(server_info)
}

// SAFETY: `axum` handler must be async
#[allow(clippy::unused_async)]
async fn fallback(uri: http::Uri) -> axum::response::Response {
    (http::StatusCode::NOT_FOUND, Json(json!({ "message": format!("No route for {uri}") })))
        .into_response()
}

#[derive(Clone, Debug)]
pub struct ServiceState {
    pub trigger: Arc<Trigger>,
}

impl ServiceState {
    #[must_use]
    pub fn new(trigger: Trigger) -> Self { Self { trigger: Arc::new(trigger) } }
}
