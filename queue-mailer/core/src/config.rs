use std::net::SocketAddr;

#[derive(Clone, Debug)]
pub struct Config {
    pub handler: HandlerConfig,

    /// Queue this process consumes, as bound by the Functions host.
    pub queue: String,

    pub notification: notification::Settings,
}

#[derive(Clone, Debug)]
pub struct HandlerConfig {
    pub listen_address: SocketAddr,
}
