//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// oppdeck - Interactive front-end for the opp_env installer.
#[derive(Debug, Parser)]
#[command(name = "oppdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// opp_env program to invoke (name or path)
    #[arg(long, global = true, env = "OPPDECK_OPP_ENV", default_value = "opp_env")]
    pub opp_env: PathBuf,

    /// Install target directory
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Interactive version picker and installer (default if no command specified)
    Setup(SetupArgs),

    /// List installable versions as reported by opp_env
    List(ListArgs),

    /// Show the options compatible with one installable unit
    Info(InfoArgs),

    /// Install a selection non-interactively
    Install(InstallArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `setup` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SetupArgs {
    /// Run `opp_env init` in the target directory before installing
    #[arg(long)]
    pub init: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InfoArgs {
    /// Installable unit id, e.g. `omnetpp-6.1` or `veins-5.2`
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InstallArgs {
    /// OMNeT++ version to install, e.g. `6.1`
    #[arg(long)]
    pub omnetpp: String,

    /// INET version to install alongside, e.g. `4.5`
    #[arg(long)]
    pub inet: Option<String>,

    /// Extra tool to install, as a qualified id, e.g. `veins-5.2`
    #[arg(long)]
    pub tool: Option<String>,

    /// Run `opp_env init` in the target directory first
    #[arg(long)]
    pub init: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
