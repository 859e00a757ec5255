use std::{
    io::{self, Write},
    path::Path,
};

use notification::Trigger;
use snafu::ResultExt;
use tokio::runtime::Runtime;

use super::read_message;
use crate::{config::Config, error, error::Result};

/// Dispatch a single message exactly as the custom handler would
#[allow(clippy::result_large_err)]
pub fn send_message(config: &Config, file: Option<&Path>) -> Result<()> {
    config.log.registry();

    let message = read_message(file)?;
    let trigger = Trigger::new(config.notification_settings())?;

    let runtime = Runtime::new().context(error::InitializeTokioRuntimeSnafu)?;
    let delivery = runtime.block_on(trigger.handle(&message))?;

    writeln!(io::stdout(), "{delivery}").context(error::WriteStdoutSnafu)
}
