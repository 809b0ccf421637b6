//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, SetupArgs};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    program: PathBuf,
    dir: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given opp_env program and target dir.
    pub fn new(program: PathBuf, dir: Option<PathBuf>) -> Self {
        Self { program, dir }
    }

    /// The opp_env program being dispatched against.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Dispatch and execute a command.
    ///
    /// No subcommand means the interactive setup session.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            None => {
                let cmd = super::setup::SetupCommand::new(
                    &self.program,
                    self.dir.clone(),
                    SetupArgs::default(),
                );
                cmd.execute(ui)
            }
            Some(Commands::Setup(args)) => {
                let cmd =
                    super::setup::SetupCommand::new(&self.program, self.dir.clone(), args.clone());
                cmd.execute(ui)
            }
            Some(Commands::List(args)) => {
                let cmd = super::list::ListCommand::new(&self.program, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Info(args)) => {
                let cmd = super::info::InfoCommand::new(&self.program, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Install(args)) => {
                let cmd = super::install::InstallCommand::new(
                    &self.program,
                    self.dir.clone(),
                    args.clone(),
                );
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
        }
    }
}
