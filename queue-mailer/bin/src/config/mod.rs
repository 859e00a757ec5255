mod environment;
mod error;
mod handler;
mod mailer;

use std::path::{Path, PathBuf};

use queue_mailer_cli_common::config::LogConfig;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};

use self::{handler::HandlerConfig, mailer::MailerConfig};
pub use self::{environment::EnvironmentOverrides, error::Error};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub handler: HandlerConfig,

    /// Queue the Functions host binds to the trigger
    #[serde(default)]
    pub queue: Option<String>,

    #[serde(default)]
    pub mailer: MailerConfig,
}

impl Config {
    #[inline]
    pub fn default_path() -> Option<PathBuf> {
        let dir = queue_mailer_core::PROJECT_CONFIG_DIR.as_deref()?;
        Some(dir.join(queue_mailer_core::CONFIG_NAME))
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let data = std::fs::read_to_string(&path)
            .context(error::OpenConfigSnafu { filename: path.as_ref().to_path_buf() })?;

        serde_yaml::from_str(&data)
            .context(error::ParseConfigSnafu { filename: path.as_ref().to_path_buf() })
    }

    /// Loads the file at `path`, or the file at the default path when it
    /// exists. Without either the defaults are used.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load(path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Expands `~` and relative segments in the configured file paths.
    pub fn resolve_paths(mut self) -> Result<Self, Error> {
        self.log.file_path = self.log.file_path.as_deref().map(resolve).transpose()?;
        self.mailer.template_dir = resolve(&self.mailer.template_dir)?;
        Ok(self)
    }

    #[inline]
    pub fn notification_settings(&self) -> notification::Settings { self.mailer.clone().into() }

    /// Converts into the configuration of the custom handler.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueueNotSet`] when no queue is configured.
    pub fn into_server_config(self) -> Result<queue_mailer_core::config::Config, Error> {
        let Self { handler, queue, mailer, .. } = self;
        let queue =
            queue.filter(|queue| !queue.trim().is_empty()).context(error::QueueNotSetSnafu)?;

        Ok(queue_mailer_core::config::Config {
            handler: handler.into(),
            queue,
            notification: mailer.into(),
        })
    }
}

fn resolve(path: &Path) -> Result<PathBuf, Error> {
    path.try_resolve()
        .map(|path| path.to_path_buf())
        .with_context(|_| error::ResolveFilePathSnafu { file_path: path.to_path_buf() })
}
