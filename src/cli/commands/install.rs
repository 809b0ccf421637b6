//! Non-interactive install command.
//!
//! `oppdeck install --omnetpp 6.1 [--inet 4.5] [--tool veins-5.2]` performs
//! one install without the interactive session: the requested versions are
//! validated against the oracle's listing and compatibility answers, then
//! the install subprocess runs with its output streamed to the console.

use std::path::{Path, PathBuf};

use crate::cli::args::InstallArgs;
use crate::error::{OppdeckError, Result};
use crate::install::{self, InstallPlan, OutputCallback};
use crate::oracle::OppEnv;
use crate::propagator;
use crate::selector::Selection;
use crate::state::{AppState, SlotId};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The install command implementation.
pub struct InstallCommand {
    program: PathBuf,
    dir: Option<PathBuf>,
    args: InstallArgs,
}

impl InstallCommand {
    /// Create a new install command.
    pub fn new(program: &Path, dir: Option<PathBuf>, args: InstallArgs) -> Self {
        Self {
            program: program.to_path_buf(),
            dir,
            args,
        }
    }

    /// Select a value into a slot, narrowing the others through the oracle.
    fn pick(
        &self,
        oracle: &OppEnv,
        state: &mut AppState,
        ui: &mut dyn UserInterface,
        slot: SlotId,
        value: &str,
    ) -> Result<bool> {
        if !state.slot_mut(slot).select(Selection::parse(value)) {
            ui.error(&format!(
                "'{}' is not an available {} (choices: {})",
                value,
                slot.label(),
                state.slot(slot).display_choices().join(", ")
            ));
            return Ok(false);
        }
        if let Err(e) = propagator::slot_changed(oracle, state, slot) {
            ui.warning(&e.to_string());
        }
        Ok(true)
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let oracle = OppEnv::new(&self.program);
        let mut state = AppState::new();

        if let Err(e) = propagator::repopulate(&oracle, &mut state) {
            ui.error(&e.to_string());
            return Ok(CommandResult::failure(1));
        }

        if !self.pick(&oracle, &mut state, ui, SlotId::Primary, &self.args.omnetpp)? {
            return Ok(CommandResult::failure(2));
        }
        if let Some(inet) = &self.args.inet {
            if !self.pick(&oracle, &mut state, ui, SlotId::Secondary, inet)? {
                return Ok(CommandResult::failure(2));
            }
        }
        if let Some(tool) = &self.args.tool {
            if !self.pick(&oracle, &mut state, ui, SlotId::Auxiliary, tool)? {
                return Ok(CommandResult::failure(2));
            }
        }

        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        state.set_install_dir(dir);

        let plan = InstallPlan::from_state(&state, self.args.init)?;
        ui.message(&format!("Running opp_env {}", plan.argv().join(" ")));

        let show_console = ui.output_mode().shows_console();
        let callback: OutputCallback = Box::new(move |line| {
            if show_console {
                println!("{}", line.text());
            }
        });

        match install::run(&plan, &self.program, callback) {
            Ok(()) => {
                ui.success("Installation completed successfully");
                Ok(CommandResult::success())
            }
            Err(e @ OppdeckError::InstallFailed { .. })
            | Err(e @ OppdeckError::Directory { .. })
            | Err(e @ OppdeckError::ToolFailed { .. })
            | Err(e @ OppdeckError::ToolMissing { .. }) => {
                ui.error(&e.to_string());
                Ok(CommandResult::failure(1))
            }
            Err(e) => Err(e),
        }
    }
}
