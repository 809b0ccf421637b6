//! Oppdeck - Interactive front-end for the opp_env simulation installer.
//!
//! Oppdeck drives the `opp_env` package manager to install OMNeT++
//! simulation environments: pick an OMNeT++ version, an optional INET
//! version, and an optional extra framework, with the three choices kept
//! mutually compatible through opp_env's own compatibility reports.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`install`] - Install planning and subprocess streaming
//! - [`oracle`] - opp_env invocation and report parsing
//! - [`propagator`] - Compatibility propagation between slots
//! - [`selector`] - Version tags, ordering, and selection slots
//! - [`session`] - Single-writer event loop behind the interactive surface
//! - [`state`] - Application state shared by the commands
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use oppdeck::selector::{Selection, Slot, VersionTag};
//!
//! let mut slot = Slot::mandatory();
//! slot.replace_allowed(vec![VersionTag::new("6.0"), VersionTag::new("6.1")]);
//! slot.reset_to_newest();
//! assert_eq!(slot.current().to_string(), "6.1");
//!
//! // Narrowing away the current value falls back to the newest survivor.
//! slot.replace_allowed(vec![VersionTag::new("6.0")]);
//! assert_eq!(slot.current().to_string(), "6.0");
//! ```

pub mod cli;
pub mod error;
pub mod install;
pub mod oracle;
pub mod propagator;
pub mod selector;
pub mod session;
pub mod state;
pub mod ui;

pub use error::{OppdeckError, Result};
