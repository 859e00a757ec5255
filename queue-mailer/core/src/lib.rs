pub mod config;

use std::{
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
    sync::LazyLock,
};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const PROJECT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const PROJECT_NAME: &str = "queue-mailer";

pub const PROGRAM_NAME: &str = "queue-mailer";
pub const CONFIG_NAME: &str = "queue-mailer.yaml";

/// Name of the queue triggered function, also the custom handler route.
pub const FUNCTION_NAME: &str = "queuesendemail";

/// Name of the queue trigger binding inside an invocation's `Data`.
pub const QUEUE_BINDING: &str = "azqueue";

pub const DEFAULT_HANDLER_PORT: u16 = 3000;
pub const DEFAULT_HANDLER_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Platform configuration directory, absent when the process has no home
/// directory, as in some function hosts.
pub static PROJECT_CONFIG_DIR: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    ProjectDirs::from("", PROJECT_NAME, PROJECT_NAME).map(|dirs| dirs.config_dir().to_path_buf())
});

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub function_name: String,
    pub queue: String,
    pub start_time: DateTime<Utc>,
}

impl ServerInfo {
    #[must_use]
    pub fn new(queue: impl Into<String>) -> Self {
        Self {
            name: PROJECT_NAME.to_string(),
            version: PROJECT_VERSION.to_string(),
            function_name: FUNCTION_NAME.to_string(),
            queue: queue.into(),
            start_time: Utc::now(),
        }
    }
}
