use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

/// Listen address of the custom handler.
///
/// The Functions host passes the port it expects through
/// `FUNCTIONS_CUSTOMHANDLER_PORT`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandlerConfig {
    #[serde(default = "HandlerConfig::default_host")]
    pub host: IpAddr,

    #[serde(default = "HandlerConfig::default_port")]
    pub port: u16,
}

impl HandlerConfig {
    #[inline]
    pub const fn socket_address(&self) -> SocketAddr { SocketAddr::new(self.host, self.port) }

    #[inline]
    pub const fn default_host() -> IpAddr { queue_mailer_core::DEFAULT_HANDLER_HOST }

    #[inline]
    pub const fn default_port() -> u16 { queue_mailer_core::DEFAULT_HANDLER_PORT }
}

impl Default for HandlerConfig {
    fn default() -> Self { Self { host: Self::default_host(), port: Self::default_port() } }
}

impl From<HandlerConfig> for queue_mailer_core::config::HandlerConfig {
    fn from(config: HandlerConfig) -> Self { Self { listen_address: config.socket_address() } }
}
