use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use snafu::ResultExt;

use crate::{
    command::{render_message, run_server, send_message},
    config::{Config, EnvironmentOverrides},
    error,
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(
        long = "config",
        short = 'c',
        env = "QUEUE_MAILER_CONFIG_FILE_PATH",
        help = "Specify a configuration file"
    )]
    config_file_path: Option<PathBuf>,

    #[command(flatten)]
    overrides: EnvironmentOverrides,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[clap(about = "Print version information")]
    Version,

    #[clap(about = "Output shell completion code for the specified shell (bash, zsh, fish)")]
    Completion { shell: Shell },

    #[clap(about = "Output default configuration")]
    DefaultConfig,

    #[clap(about = "Run the Azure Functions custom handler")]
    #[command(visible_alias = "run")]
    Serve,

    #[clap(about = "Dispatch one queue message read from a file or stdin")]
    Send {
        #[clap(long = "file", short = 'f', help = "Read the message from a file instead of stdin")]
        file: Option<PathBuf>,
    },

    #[clap(about = "Print the HTML body rendered for one queue message")]
    Render {
        #[clap(long = "file", short = 'f', help = "Read the message from a file instead of stdin")]
        file: Option<PathBuf>,
    },
}

impl Cli {
    pub fn run(self) -> Result<(), Box<error::Error>> {
        match self.command {
            Command::Version => {
                io::stdout()
                    .write_all(Self::command().render_long_version().as_bytes())
                    .context(error::WriteStdoutSnafu)?;
            }
            Command::Completion { shell } => {
                let mut command = Self::command();
                let bin_name = command.get_name().to_string();
                clap_complete::generate(shell, &mut command, bin_name, &mut io::stdout());
            }
            Command::DefaultConfig => {
                let config_text = serde_yaml::to_string(&Config::default())
                    .context(error::SerializeConfigSnafu)?;
                io::stdout().write_all(config_text.as_bytes()).context(error::WriteStdoutSnafu)?;
            }
            Command::Serve => {
                let config = self.load_config()?;
                run_server(config)?;
            }
            Command::Send { ref file } => {
                let config = self.load_config()?;
                send_message(&config, file.as_deref())?;
            }
            Command::Render { ref file } => {
                let config = self.load_config()?;
                render_message(&config, file.as_deref())?;
            }
        }

        Ok(())
    }

    #[allow(clippy::result_large_err)]
    fn load_config(&self) -> Result<Config, error::Error> {
        let mut config = Config::load_or_default(self.config_file_path.as_deref())?;
        self.overrides.clone().apply(&mut config)?;
        Ok(config.resolve_paths()?)
    }
}
