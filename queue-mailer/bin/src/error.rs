use std::path::PathBuf;

use snafu::Snafu;

use crate::config;

/// Result type alias for the CLI.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for the CLI.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{source}"))]
    Application { source: queue_mailer_server::Error },

    #[snafu(display("{source}"))]
    Notification { source: notification::Error },

    #[snafu(display("Could not initialize tokio runtime, error: {source}"))]
    InitializeTokioRuntime { source: tokio::io::Error },

    #[snafu(display("{source}"))]
    Config { source: config::Error },

    #[snafu(display("Could not read queue message from {}, error: {source}", path.display()))]
    ReadMessageFile { path: PathBuf, source: std::io::Error },

    #[snafu(display("Could not read queue message from stdin, error: {source}"))]
    ReadMessageStdin { source: std::io::Error },

    #[snafu(display("Could not write to stdout, error: {source}"))]
    WriteStdout { source: std::io::Error },

    #[snafu(display("Could not serialize configuration, error: {source}"))]
    SerializeConfig { source: serde_yaml::Error },
}

impl From<config::Error> for Error {
    fn from(source: config::Error) -> Self { Self::Config { source } }
}

impl From<queue_mailer_server::Error> for Error {
    fn from(source: queue_mailer_server::Error) -> Self { Self::Application { source } }
}

impl From<notification::Error> for Error {
    fn from(source: notification::Error) -> Self { Self::Notification { source } }
}

pub trait CommandError {
    fn exit_code(&self) -> exitcode::ExitCode;
}

impl CommandError for Error {
    fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            Self::Application { .. } | Self::Notification { .. } | Self::SerializeConfig { .. } => {
                exitcode::SOFTWARE
            }
            Self::Config { .. } => exitcode::CONFIG,
            Self::ReadMessageFile { .. } | Self::ReadMessageStdin { .. } => exitcode::NOINPUT,
            Self::InitializeTokioRuntime { .. } | Self::WriteStdout { .. } => exitcode::IOERR,
        }
    }
}
