//! Interactive setup session.
//!
//! The `oppdeck setup` command is the application's main surface: three
//! dropdowns kept mutually consistent through opp_env's compatibility
//! answers, a directory picker, and an install action with a live console.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use crate::cli::args::SetupArgs;
use crate::error::{OppdeckError, Result};
use crate::oracle::OppEnv;
use crate::selector::Selection;
use crate::session::{Event, Notice, Session, TICK};
use crate::state::SlotId;
use crate::ui::{Prompt, UserInterface};

use super::dispatcher::{Command, CommandResult};

const ACTION_PRIMARY: &str = "Pick OMNeT++ version";
const ACTION_SECONDARY: &str = "Pick INET version";
const ACTION_AUXILIARY: &str = "Pick extra tool";
const ACTION_DIR: &str = "Choose install directory";
const ACTION_INSTALL: &str = "Install";
const ACTION_RESET: &str = "Reset selections";
const ACTION_QUIT: &str = "Quit";

/// The setup command implementation.
pub struct SetupCommand {
    program: PathBuf,
    dir: Option<PathBuf>,
    args: SetupArgs,
}

impl SetupCommand {
    /// Create a new setup command.
    pub fn new(program: &Path, dir: Option<PathBuf>, args: SetupArgs) -> Self {
        Self {
            program: program.to_path_buf(),
            dir,
            args,
        }
    }

    fn pick_slot(
        &self,
        ui: &mut dyn UserInterface,
        session: &mut Session,
        slot: SlotId,
    ) -> Result<()> {
        let choices = session.state().slot(slot).display_choices();
        if choices.is_empty() {
            ui.warning("No choices available; opp_env may have failed. Try Reset.");
            return Ok(());
        }

        let key = match slot {
            SlotId::Primary => "omnetpp",
            SlotId::Secondary => "inet",
            SlotId::Auxiliary => "tool",
        };
        let current = session.state().selection(slot).to_string();
        let answer = ui
            .prompt(&Prompt::select(
                key,
                slot.label(),
                choices,
                Some(current.as_str()),
            ))?
            .into_string();

        let selection = Selection::parse(&answer);
        if selection == session.state().selection(slot) {
            // Re-picking the current value needs no compatibility re-query.
            return Ok(());
        }

        session.handle(Event::SlotPicked { slot, selection })?;
        settle(ui, session, "Checking compatibility with opp_env");
        Ok(())
    }

    fn choose_directory(&self, ui: &mut dyn UserInterface, session: &mut Session) -> Result<()> {
        let default = session
            .state()
            .install_dir()
            .map(|p| p.display().to_string())
            .or_else(|| {
                std::env::current_dir()
                    .ok()
                    .map(|p| p.display().to_string())
            });
        let answer = ui
            .prompt(&Prompt::input(
                "dir",
                "Install directory",
                default.as_deref(),
            ))?
            .into_string();
        if !answer.is_empty() {
            session.handle(Event::DirectoryChosen(PathBuf::from(answer)))?;
        }
        Ok(())
    }

    fn run_install(&self, ui: &mut dyn UserInterface, session: &mut Session) -> Result<()> {
        if !session.state().install_ready() {
            ui.warning("Pick an OMNeT++ version and choose an install directory first");
            return Ok(());
        }

        let question = format!("Install {}?", session.state().summary());
        if !ui.prompt(&Prompt::confirm("install", &question))?.as_bool() {
            return Ok(());
        }

        match session.handle(Event::InstallRequested {
            run_init: self.args.init,
        }) {
            Ok(()) => follow_install(ui, session),
            Err(e) => ui.error(&e.to_string()),
        }
        Ok(())
    }
}

/// Display one drained notice through the UI.
fn report(ui: &mut dyn UserInterface, notice: Notice) {
    match notice {
        Notice::Warning(msg) => ui.warning(&msg),
        Notice::Console(line) => ui.console_line(&line),
        Notice::InstallSucceeded => ui.success("Installation completed successfully"),
        Notice::InstallFailed(msg) => ui.error(&msg),
    }
}

/// Spin until outstanding oracle queries have been applied.
fn settle(ui: &mut dyn UserInterface, session: &mut Session, message: &str) {
    let mut spinner = ui.start_spinner(message);
    let mut notices = Vec::new();
    session.wait_idle(|n| notices.push(n));
    spinner.finish_clear();
    for notice in notices {
        report(ui, notice);
    }
}

/// Tick-drain the session while the install runs, streaming its console.
fn follow_install(ui: &mut dyn UserInterface, session: &mut Session) {
    loop {
        for notice in session.drain() {
            report(ui, notice);
        }
        if session.idle() {
            return;
        }
        thread::sleep(TICK);
    }
}

impl Command for SetupCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let oracle = Arc::new(OppEnv::new(&self.program));
        let mut session = Session::new(oracle, self.program.clone());

        ui.show_header(&format!("oppdeck {}", env!("CARGO_PKG_VERSION")));

        let mut spinner = ui.start_spinner("Loading available versions from opp_env");
        match session.bootstrap() {
            Ok(()) => spinner.finish_clear(),
            Err(e @ OppdeckError::ToolMissing { .. }) => {
                spinner.finish_error("opp_env is not available");
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
            Err(e) => {
                spinner.finish_clear();
                ui.warning(&e.to_string());
            }
        }

        if let Some(dir) = &self.dir {
            session.handle(Event::DirectoryChosen(dir.clone()))?;
        }

        if !ui.is_interactive() {
            ui.warning("setup needs a terminal; use 'oppdeck install' for scripted runs");
            return Ok(CommandResult::failure(2));
        }

        loop {
            ui.message(&format!("\n{}", session.state().summary()));

            let actions = vec![
                ACTION_PRIMARY.to_string(),
                ACTION_SECONDARY.to_string(),
                ACTION_AUXILIARY.to_string(),
                ACTION_DIR.to_string(),
                ACTION_INSTALL.to_string(),
                ACTION_RESET.to_string(),
                ACTION_QUIT.to_string(),
            ];
            let action = ui
                .prompt(&Prompt::select("action", "What next", actions, None))?
                .into_string();

            match action.as_str() {
                ACTION_PRIMARY => self.pick_slot(ui, &mut session, SlotId::Primary)?,
                ACTION_SECONDARY => self.pick_slot(ui, &mut session, SlotId::Secondary)?,
                ACTION_AUXILIARY => self.pick_slot(ui, &mut session, SlotId::Auxiliary)?,
                ACTION_DIR => self.choose_directory(ui, &mut session)?,
                ACTION_INSTALL => self.run_install(ui, &mut session)?,
                ACTION_RESET => {
                    session.handle(Event::ResetRequested)?;
                    settle(ui, &mut session, "Reloading available versions");
                }
                _ => break,
            }
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    #[cfg(unix)]
    fn stub_opp_env(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("opp_env_stub");
        std::fs::write(
            &script,
            r#"#!/bin/sh
case "$1" in
  list)
    printf 'omnetpp 6.0 6.1\ninet 4.4 4.5\nveins 5.2\n'
    ;;
  info)
    case "$2" in
      omnetpp-6.0) printf 'Requires:\n- inet: 4.4\n' ;;
      omnetpp-6.1) printf 'Requires:\n- inet: 4.4 / 4.5\n- veins: 5.2\n' ;;
      *) printf 'Requires:\n' ;;
    esac
    ;;
  install)
    shift
    echo "installing $@"
    ;;
  init)
    echo "init ok"
    ;;
esac
"#,
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[test]
    fn full_session_picks_narrows_and_installs() {
        let temp = tempfile::TempDir::new().unwrap();
        let program = stub_opp_env(temp.path());
        let cmd = SetupCommand::new(&program, None, SetupArgs { init: false });

        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.set_prompt_response("action", ACTION_QUIT);
        ui.queue_prompt_responses(
            "action",
            vec![ACTION_PRIMARY, ACTION_DIR, ACTION_INSTALL, ACTION_QUIT],
        );
        ui.set_prompt_response("omnetpp", "6.0");
        ui.set_prompt_response("dir", temp.path().to_str().unwrap());
        ui.set_prompt_response("install", "yes");

        let result = cmd.execute(&mut ui).unwrap();
        assert!(result.success);
        assert!(ui
            .console()
            .iter()
            .any(|line| line.contains("omnetpp-6.0")));
        assert!(ui
            .successes()
            .contains(&"Installation completed successfully".to_string()));
        // inet 4.5 was narrowed away by picking omnetpp 6.0.
        assert!(ui
            .messages()
            .iter()
            .any(|m| m.contains("omnetpp=6.0")));
    }

    #[cfg(unix)]
    #[test]
    fn install_without_directory_warns_instead_of_running() {
        let temp = tempfile::TempDir::new().unwrap();
        let program = stub_opp_env(temp.path());
        let cmd = SetupCommand::new(&program, None, SetupArgs { init: false });

        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.set_prompt_response("action", ACTION_QUIT);
        ui.queue_prompt_responses("action", vec![ACTION_INSTALL, ACTION_QUIT]);

        let result = cmd.execute(&mut ui).unwrap();
        assert!(result.success);
        assert!(ui.warnings().iter().any(|w| w.contains("directory")));
        assert!(ui.console().is_empty());
    }

    #[test]
    fn missing_opp_env_is_fatal_with_remediation() {
        let cmd = SetupCommand::new(
            Path::new("no-such-opp-env-binary-4711"),
            None,
            SetupArgs { init: false },
        );
        let mut ui = MockUI::new();
        ui.set_interactive(true);

        let result = cmd.execute(&mut ui).unwrap();
        assert!(!result.success);
        assert!(ui.errors().iter().any(|e| e.contains("PATH")));
    }

    #[cfg(unix)]
    #[test]
    fn non_interactive_terminal_is_refused() {
        let temp = tempfile::TempDir::new().unwrap();
        let program = stub_opp_env(temp.path());
        let cmd = SetupCommand::new(&program, None, SetupArgs { init: false });

        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, 2);
    }
}
