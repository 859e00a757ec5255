mod error;
mod web;

use std::net::SocketAddr;

use futures::{future::BoxFuture, FutureExt};
use notification::Trigger;
use queue_mailer_core::{
    config::{Config, HandlerConfig},
    ServerInfo,
};
use sigfinn::{ExitStatus, LifecycleManager, Shutdown};
use snafu::ResultExt;

pub use self::{
    error::{Error, Result},
    web::{
        invocation::{InvocationRequest, InvocationResponse},
        router, ServiceState,
    },
};

/// # Errors
/// Returns errors when the trigger cannot be created or the server fails to
/// start
pub async fn serve_with_shutdown(config: Config, server_info: ServerInfo) -> Result<()> {
    let Config { handler: HandlerConfig { listen_address }, queue, notification } = config;

    tracing::info!(%queue, "Initializing queue trigger");

    let trigger = Trigger::new(notification).context(error::InitializeTriggerSnafu)?;
    let service_state = ServiceState::new(trigger);

    let lifecycle_manager = LifecycleManager::<Error>::new();

    let _handle = lifecycle_manager.spawn(
        "Custom handler",
        create_handler_server_future(listen_address, service_state, server_info),
    );

    if let Ok(Err(err)) = lifecycle_manager.serve().await {
        tracing::error!("{err}");
        Err(err)
    } else {
        Ok(())
    }
}

fn create_handler_server_future(
    listen_address: SocketAddr,
    service_state: ServiceState,
    server_info: ServerInfo,
) -> impl FnOnce(Shutdown) -> BoxFuture<'static, ExitStatus<Error>> {
    move |shutdown_signal| {
        async move {
            tracing::info!("Listen custom handler endpoint on {listen_address}");

            let result = web::new_handler_server(
                listen_address,
                service_state,
                server_info,
                shutdown_signal,
            )
            .await;

            match result {
                Ok(()) => {
                    tracing::info!("Custom handler is shut down gracefully");
                    ExitStatus::Success
                }
                Err(err) => ExitStatus::FatalError(Error::from(err)),
            }
        }
        .boxed()
    }
}
