use std::{num::ParseIntError, path::PathBuf};

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not open config from {}, error: {source}", filename.display()))]
    OpenConfig { filename: PathBuf, source: std::io::Error },

    #[snafu(display("Could not parse config from {}, error: {source}", filename.display()))]
    ParseConfig { filename: PathBuf, source: serde_yaml::Error },

    #[snafu(display("Could not resolve file path {}, error: {source}", file_path.display()))]
    ResolveFilePath { file_path: PathBuf, source: std::io::Error },

    #[snafu(display("Invalid port `{value}` in {variable}, error: {source}"))]
    InvalidPort { variable: &'static str, value: String, source: ParseIntError },

    #[snafu(display("Source queue is not set, provide it with `SOURCE_QUEUE`"))]
    QueueNotSet,
}
