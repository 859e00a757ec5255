use snafu::Snafu;

use crate::web;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Error occurs while initializing queue trigger, error: {source}"))]
    InitializeTrigger { source: notification::Error },

    #[snafu(display("{source}"))]
    Web { source: web::Error },
}

impl From<web::Error> for Error {
    fn from(source: web::Error) -> Self { Self::Web { source } }
}
