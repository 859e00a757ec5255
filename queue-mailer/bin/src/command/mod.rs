mod render;
mod send;
mod serve;

use std::{
    io::{self, Read},
    path::Path,
};

use snafu::ResultExt;

pub use self::{render::render_message, send::send_message, serve::run_server};
use crate::error::{self, Result};

/// Reads a raw queue message from `file`, or from stdin when no file is given.
fn read_message(file: Option<&Path>) -> Result<Vec<u8>> {
    match file {
        Some(path) => {
            std::fs::read(path).context(error::ReadMessageFileSnafu { path: path.to_path_buf() })
        }
        None => {
            let mut message = Vec::new();
            let _size =
                io::stdin().read_to_end(&mut message).context(error::ReadMessageStdinSnafu)?;
            Ok(message)
        }
    }
}
