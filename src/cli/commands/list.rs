//! List command implementation.
//!
//! The `oppdeck list` command prints the unconstrained version listing.

use std::path::{Path, PathBuf};

use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::oracle::{OppEnv, OptionSource, ToolListing};
use crate::selector::VersionTag;
use crate::ui::theme::OppdeckTheme;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    program: PathBuf,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(program: &Path, args: ListArgs) -> Self {
        Self {
            program: program.to_path_buf(),
            args,
        }
    }
}

fn join(tags: &[VersionTag]) -> String {
    tags.iter()
        .map(VersionTag::as_str)
        .collect::<Vec<_>>()
        .join("  ")
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let oracle = OppEnv::new(&self.program);
        let listing: ToolListing = match oracle.list_all() {
            Ok(listing) => listing,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
        };

        if self.args.json {
            let json = serde_json::to_string_pretty(&listing).map_err(anyhow::Error::from)?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        let theme = OppdeckTheme::new();
        ui.message(&format!(
            "{} {}",
            theme.highlight.apply_to("OMNeT++:"),
            join(&listing.primary)
        ));
        ui.message(&format!(
            "{}    {}",
            theme.highlight.apply_to("INET:"),
            join(&listing.secondary)
        ));
        ui.message(&format!(
            "{}   {}",
            theme.highlight.apply_to("Tools:"),
            join(&listing.auxiliary)
        ));

        Ok(CommandResult::success())
    }
}
