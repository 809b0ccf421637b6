//! The opp_env oracle: version listings and compatibility queries.
//!
//! opp_env is treated as an opaque collaborator reached through two
//! subprocess calls, `opp_env list` and `opp_env info <id>`. The
//! [`OptionSource`] trait is the seam that lets the propagator and session
//! run against a mock in tests.

pub mod parse;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;

use crate::error::{OppdeckError, Result};
use crate::selector::VersionTag;

/// The unconstrained option groups from `opp_env list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToolListing {
    /// OMNeT++ versions, bare (`6.1`).
    pub primary: Vec<VersionTag>,
    /// INET versions, bare (`4.5`).
    pub secondary: Vec<VersionTag>,
    /// Every other tool, qualified (`veins-5.2`).
    pub auxiliary: Vec<VersionTag>,
}

/// Compatible options reported by one `opp_env info <id>` query.
///
/// Produced fresh per query; no identity beyond that query's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompatibilitySet {
    pub primary_allowed: Vec<VersionTag>,
    pub secondary_allowed: Vec<VersionTag>,
    pub auxiliary_allowed: Vec<VersionTag>,
}

/// Source of version and compatibility data.
///
/// Implemented by [`OppEnv`] for the real binary and by mocks in tests.
pub trait OptionSource {
    /// All installable options, unconstrained.
    fn list_all(&self) -> Result<ToolListing>;

    /// Options compatible with one installable unit.
    fn query_compatibility(&self, id: &VersionTag) -> Result<CompatibilitySet>;
}

/// Adapter for the real `opp_env` executable.
#[derive(Debug, Clone)]
pub struct OppEnv {
    program: PathBuf,
}

impl OppEnv {
    /// Create an adapter for the given program name or path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The program this adapter invokes.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the program with the given arguments, returning captured stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        let command_line = format!("{} {}", self.program.display(), args.join(" "));
        tracing::debug!("running '{}'", command_line);

        let output = Command::new(&self.program).args(args).output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                OppdeckError::ToolMissing {
                    program: self.program.display().to_string(),
                }
            } else {
                OppdeckError::Io(e)
            }
        })?;

        if !output.status.success() {
            return Err(OppdeckError::ToolFailed {
                command: command_line,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl OptionSource for OppEnv {
    fn list_all(&self) -> Result<ToolListing> {
        let output = self.run(&["list"])?;
        let listing = parse::parse_listing(&output);
        tracing::debug!(
            "listing: {} omnetpp, {} inet, {} auxiliary",
            listing.primary.len(),
            listing.secondary.len(),
            listing.auxiliary.len()
        );
        Ok(listing)
    }

    fn query_compatibility(&self, id: &VersionTag) -> Result<CompatibilitySet> {
        let output = self.run(&["info", id.as_str()])?;
        Ok(parse::parse_requirements(&output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_maps_to_tool_missing() {
        let oracle = OppEnv::new("definitely-not-a-real-binary-4711");
        let err = oracle.list_all().unwrap_err();
        assert!(matches!(err, OppdeckError::ToolMissing { .. }));
    }

    #[test]
    fn failing_program_maps_to_tool_failed() {
        // `false` exists on any unix box and always exits 1.
        #[cfg(unix)]
        {
            let oracle = OppEnv::new("false");
            let err = oracle.list_all().unwrap_err();
            match err {
                OppdeckError::ToolFailed { command, code, .. } => {
                    assert!(command.contains("list"));
                    assert_eq!(code, Some(1));
                }
                other => panic!("expected ToolFailed, got {other:?}"),
            }
        }
    }

    #[test]
    fn successful_program_output_is_parsed() {
        #[cfg(unix)]
        {
            // `echo list` stands in for an opp_env that prints one row.
            let oracle = OppEnv::new("echo");
            let listing = oracle.list_all().unwrap();
            // "echo list" prints "list" which is a one-token line: ignored.
            assert!(listing.primary.is_empty());
            assert!(listing.auxiliary.is_empty());
        }
    }
}
