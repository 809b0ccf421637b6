//! Info command implementation.
//!
//! The `oppdeck info <id>` command prints the options compatible with one
//! installable unit, parsed from the oracle's `Requires:` block.

use std::path::{Path, PathBuf};

use crate::cli::args::InfoArgs;
use crate::error::Result;
use crate::oracle::{CompatibilitySet, OppEnv, OptionSource};
use crate::selector::VersionTag;
use crate::ui::theme::OppdeckTheme;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The info command implementation.
pub struct InfoCommand {
    program: PathBuf,
    args: InfoArgs,
}

impl InfoCommand {
    /// Create a new info command.
    pub fn new(program: &Path, args: InfoArgs) -> Self {
        Self {
            program: program.to_path_buf(),
            args,
        }
    }
}

fn join(tags: &[VersionTag]) -> String {
    if tags.is_empty() {
        "(none reported)".to_string()
    } else {
        tags.iter()
            .map(VersionTag::as_str)
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

impl Command for InfoCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let oracle = OppEnv::new(&self.program);
        let id = VersionTag::new(&self.args.id);
        let set: CompatibilitySet = match oracle.query_compatibility(&id) {
            Ok(set) => set,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
        };

        if self.args.json {
            let json = serde_json::to_string_pretty(&set).map_err(anyhow::Error::from)?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        let theme = OppdeckTheme::new();
        ui.message(&format!(
            "{}",
            theme.highlight.apply_to(format!("Compatible with {}:", id))
        ));
        ui.message(&format!("  OMNeT++: {}", join(&set.primary_allowed)));
        ui.message(&format!("  INET:    {}", join(&set.secondary_allowed)));
        ui.message(&format!("  Tools:   {}", join(&set.auxiliary_allowed)));

        Ok(CommandResult::success())
    }
}
