use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use subdrush_core::{Config, DrushApi};
use tracing::debug;

use crate::commands::{
    alias_for_command, aliases_command, check_command, command_args_command,
    command_info_command, root_command, run_command,
};
use crate::display::TerminalDisplay;

#[derive(Parser, Debug)]
#[command(name = "subdrush")]
#[command(version, about = "Run drush against the Drupal site behind your editor", long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug               Enable debug logging\n    SUBDRUSH_DRUSH_PATH=<path>   Drush binary to run\n    SUBDRUSH_CACHE_DIR=<dir>     Where discovery results are cached")]
pub struct Cli {
    /// Open editor folder; the first one is searched for the Drupal root
    #[arg(long = "folder", value_name = "DIR", global = true)]
    pub folders: Vec<PathBuf>,

    /// Active file, used when no folder is given
    #[arg(long, value_name = "PATH", global = true)]
    pub file: Option<PathBuf>,

    /// Drush binary, overriding the configured one
    #[arg(long, value_name = "PATH", global = true)]
    pub drush: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run a drush command against the project root
    #[command(visible_alias = "r")]
    Run {
        /// Drush command name (e.g. status, cache-clear)
        command: String,

        /// Positional arguments for the command
        args: Vec<String>,

        /// Option passed through to drush (e.g. --opt=--yes)
        #[arg(long = "opt", value_name = "OPTION", allow_hyphen_values = true)]
        options: Vec<String>,
    },
    /// Print the resolved Drupal root
    Root,
    /// List local site aliases
    Aliases,
    /// Print the site alias whose root is DIR
    AliasFor {
        dir: PathBuf,
    },
    /// Show drush's metadata for a command
    CommandInfo {
        command: String,
    },
    /// List the argument completions drush offers for a command
    CommandArgs {
        command: String,
    },
    /// Check that the installed drush is recent enough
    Check,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let api = self.session()?;
        debug!("Running {:?}", self.command);

        match self.command {
            Commands::Run {
                command,
                args,
                options,
            } => run_command(api, command, args, options),
            Commands::Root => root_command(&api),
            Commands::Aliases => aliases_command(&api),
            Commands::AliasFor { dir } => alias_for_command(&api, &dir),
            Commands::CommandInfo { command } => command_info_command(&api, &command),
            Commands::CommandArgs { command } => command_args_command(&api, &command),
            Commands::Check => check_command(&api),
        }
    }

    /// Build the session for the editor context given on the command line.
    /// Without `--folder` or `--file` the current directory stands in for
    /// the open folder.
    pub fn session(&self) -> Result<DrushApi> {
        let cwd = env::current_dir().context("Failed to read the current directory")?;
        let mut config = Config::load(&cwd)?;
        if let Some(drush) = &self.drush {
            config.drush_path = drush.clone();
        }

        let folders = if self.folders.is_empty() && self.file.is_none() {
            vec![cwd]
        } else {
            self.folders.clone()
        };

        Ok(DrushApi::builder(config)
            .editor_context(&folders, self.file.as_deref())
            .display(Arc::new(TerminalDisplay))
            .build())
    }
}
