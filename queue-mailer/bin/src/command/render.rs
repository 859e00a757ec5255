use std::{
    io::{self, Write},
    path::Path,
};

use notification::Trigger;
use snafu::ResultExt;

use super::read_message;
use crate::{config::Config, error, error::Result};

/// Print the rendered body of a message without delivering it
#[allow(clippy::result_large_err)]
pub fn render_message(config: &Config, file: Option<&Path>) -> Result<()> {
    let message = read_message(file)?;
    let notification = Trigger::new(config.notification_settings())?.prepare(&message)?;

    io::stdout().write_all(notification.body().as_bytes()).context(error::WriteStdoutSnafu)
}
