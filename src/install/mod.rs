//! Install invocation: argv construction and live output streaming.
//!
//! An [`InstallPlan`] is built from the current selections, validated
//! against the install preconditions, and then run as an `opp_env install`
//! subprocess whose combined output is forwarded line by line to an
//! observer callback. The caller's working directory is never changed; the
//! child process runs inside the target directory.

use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;

use crate::error::{OppdeckError, Result};
use crate::oracle::parse::{PRIMARY_TOOL, SECONDARY_TOOL};
use crate::selector::VersionTag;
use crate::state::{AppState, SlotId};

/// One line of subprocess output.
#[derive(Debug, Clone)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

impl OutputLine {
    /// The line's text, regardless of which stream it came from.
    pub fn text(&self) -> &str {
        match self {
            Self::Stdout(s) | Self::Stderr(s) => s,
        }
    }
}

/// Callback receiving streamed output lines.
pub type OutputCallback = Box<dyn Fn(OutputLine) + Send>;

/// A validated set of selections ready to install.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallPlan {
    /// Bare OMNeT++ version, e.g. `6.1`.
    pub primary: VersionTag,
    /// Bare INET version, omitted when `NONE`.
    pub secondary: Option<VersionTag>,
    /// Qualified auxiliary tag, omitted when `NONE`.
    pub auxiliary: Option<VersionTag>,
    /// Directory the install runs in.
    pub target_dir: PathBuf,
    /// Run `opp_env init` in the target directory first.
    pub run_init: bool,
}

impl InstallPlan {
    /// Build a plan from the application state.
    ///
    /// Fails before any subprocess when the preconditions are not met: an
    /// OMNeT++ version must be selected and a target directory chosen.
    pub fn from_state(state: &AppState, run_init: bool) -> Result<Self> {
        let primary = state
            .slot(SlotId::Primary)
            .current_tag()
            .cloned()
            .ok_or(OppdeckError::SelectionMissing)?;

        let target_dir = state
            .install_dir()
            .map(Path::to_path_buf)
            .ok_or_else(|| OppdeckError::Directory {
                path: PathBuf::from("(unset)"),
                message: "no install directory has been chosen".into(),
            })?;

        Ok(Self {
            primary,
            secondary: state.slot(SlotId::Secondary).current_tag().cloned(),
            auxiliary: state.slot(SlotId::Auxiliary).current_tag().cloned(),
            target_dir,
            run_init,
        })
    }

    /// The argument list: `install <omnetpp-id> [<inet-id>] [<tool-id>]`.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = vec![
            "install".to_string(),
            VersionTag::qualified(PRIMARY_TOOL, self.primary.as_str()).to_string(),
        ];
        if let Some(inet) = &self.secondary {
            argv.push(VersionTag::qualified(SECONDARY_TOOL, inet.as_str()).to_string());
        }
        if let Some(tool) = &self.auxiliary {
            argv.push(tool.to_string());
        }
        argv
    }

    fn check_target_dir(&self) -> Result<()> {
        if self.target_dir.is_dir() {
            Ok(())
        } else {
            Err(OppdeckError::Directory {
                path: self.target_dir.clone(),
                message: "directory does not exist or is not accessible".into(),
            })
        }
    }
}

/// Run the plan, forwarding combined output to `callback` as it arrives.
///
/// Success means exit code 0; any other exit is reported as a generic
/// installation failure with no interpretation of opp_env's exit codes.
/// No rollback is attempted; opp_env owns its own atomicity.
pub fn run(plan: &InstallPlan, program: &Path, callback: OutputCallback) -> Result<()> {
    plan.check_target_dir()?;

    if plan.run_init {
        let status = stream(program, &["init".to_string()], &plan.target_dir, &callback)?;
        if !status.success() {
            return Err(OppdeckError::ToolFailed {
                command: format!("{} init", program.display()),
                code: status.code(),
                stderr: "see console output".into(),
            });
        }
    }

    let argv = plan.argv();
    tracing::info!("running '{} {}'", program.display(), argv.join(" "));
    let status = stream(program, &argv, &plan.target_dir, &callback)?;

    if status.success() {
        Ok(())
    } else {
        Err(OppdeckError::InstallFailed {
            code: status.code(),
        })
    }
}

/// Spawn the subprocess and pump its output through the callback.
///
/// Two reader threads line-buffer stdout and stderr into a channel; the
/// calling thread forwards lines in arrival order until both streams close,
/// then waits for the exit status.
fn stream(
    program: &Path,
    args: &[String],
    cwd: &Path,
    callback: &OutputCallback,
) -> Result<ExitStatus> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            OppdeckError::ToolMissing {
                program: program.display().to_string(),
            }
        } else {
            OppdeckError::Io(e)
        }
    })?;

    // Piped stdio is always present after a successful spawn.
    let stdout = child.stdout.take().expect("child stdout was piped");
    let stderr = child.stderr.take().expect("child stderr was piped");

    let (tx, rx) = mpsc::channel();
    let tx_stdout = tx.clone();
    let tx_stderr = tx;

    let stdout_handle = thread::spawn(move || {
        let reader = BufReader::new(stdout);
        for line in reader.lines().map_while(std::result::Result::ok) {
            let _ = tx_stdout.send(OutputLine::Stdout(line));
        }
    });
    let stderr_handle = thread::spawn(move || {
        let reader = BufReader::new(stderr);
        for line in reader.lines().map_while(std::result::Result::ok) {
            let _ = tx_stderr.send(OutputLine::Stderr(line));
        }
    });

    for line in rx {
        callback(line);
    }

    let _ = stdout_handle.join();
    let _ = stderr_handle.join();

    Ok(child.wait()?)
}
