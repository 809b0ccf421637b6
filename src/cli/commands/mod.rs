//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`oppdeck list`, `oppdeck install`)
//! - Shared handling of the opp_env program path and target directory
//! - Consistent global flag handling

pub mod completions;
pub mod dispatcher;
pub mod info;
pub mod install;
pub mod list;
pub mod setup;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
