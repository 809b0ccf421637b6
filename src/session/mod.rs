//! Single-writer session loop: events in, intent messages drained on a tick.
//!
//! The session thread is the only writer of [`AppState`]. Every user action
//! becomes a typed [`Event`]; handling one either mutates local-only state
//! (directory choice) or spawns a fire-and-forget worker thread that talks
//! to opp_env and reports back through a bounded mailbox of [`StateMsg`]
//! intents. The session drains the mailbox on a fixed-rate tick and applies
//! the intents itself, so no widget-state race can occur without any lock.
//!
//! Queries have no timeout; a hung opp_env hangs its worker indefinitely.

use std::path::PathBuf;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::{OppdeckError, Result};
use crate::install::{self, InstallPlan, OutputCallback};
use crate::oracle::{CompatibilitySet, OptionSource, ToolListing};
use crate::propagator;
use crate::selector::Selection;
use crate::state::{AppState, SlotId};

/// Fixed mailbox drain interval.
pub const TICK: Duration = Duration::from_millis(100);

/// Mailbox capacity; workers block (backpressure) when it fills up.
const MAILBOX_DEPTH: usize = 64;

/// A user action, as enqueued by the interactive surface.
#[derive(Debug, Clone)]
pub enum Event {
    /// A slot's value was picked from its dropdown.
    SlotPicked { slot: SlotId, selection: Selection },
    /// The install target directory was chosen.
    DirectoryChosen(PathBuf),
    /// The install action was confirmed.
    InstallRequested { run_init: bool },
    /// Revert all slots to the unconstrained listing.
    ResetRequested,
}

/// Intent message from a worker thread to the state-owning session thread.
#[derive(Debug)]
enum StateMsg {
    ListingLoaded(ToolListing),
    ListingFailed { message: String },
    Narrowed { origin: SlotId, set: CompatibilitySet },
    NarrowFailed { origin: SlotId, message: String },
    InstallLine(String),
    InstallFinished { outcome: std::result::Result<(), String> },
}

/// User-visible outcome of draining the mailbox.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A query failed; option sets were emptied. Non-fatal.
    Warning(String),
    /// One line of live install output.
    Console(String),
    /// The install subprocess finished with exit code 0.
    InstallSucceeded,
    /// The install subprocess failed; message is the error text.
    InstallFailed(String),
}

/// Owns the application state and the worker mailbox.
pub struct Session {
    state: AppState,
    oracle: Arc<dyn OptionSource + Send + Sync>,
    program: PathBuf,
    tx: SyncSender<StateMsg>,
    rx: Receiver<StateMsg>,
    pending: usize,
}

impl Session {
    /// Create a session around an oracle and the program used for installs.
    pub fn new(oracle: Arc<dyn OptionSource + Send + Sync>, program: PathBuf) -> Self {
        let (tx, rx) = sync_channel(MAILBOX_DEPTH);
        Self {
            state: AppState::new(),
            oracle,
            program,
            tx,
            rx,
            pending: 0,
        }
    }

    /// Read access to the state, for rendering.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Whether no worker thread is outstanding.
    pub fn idle(&self) -> bool {
        self.pending == 0
    }

    /// Populate the slots synchronously from the initial listing.
    ///
    /// `ToolMissing` here is fatal to the session; a plain query failure
    /// leaves the slots empty and is surfaced non-fatally by the caller.
    pub fn bootstrap(&mut self) -> Result<()> {
        propagator::repopulate(self.oracle.as_ref(), &mut self.state)
    }

    /// Handle one user event.
    ///
    /// Returns an error only for preconditions the user must fix (install
    /// while one is running, missing selections); oracle trouble is
    /// reported later through [`Notice`]s.
    pub fn handle(&mut self, event: Event) -> Result<()> {
        match event {
            Event::SlotPicked { slot, selection } => {
                if !self.state.slot_mut(slot).select(selection) {
                    tracing::warn!("ignoring selection outside the allowed set for {:?}", slot);
                    return Ok(());
                }
                match self.state.selection(slot) {
                    Selection::None => match slot {
                        SlotId::Primary => {}
                        SlotId::Secondary | SlotId::Auxiliary => self.spawn_listing(),
                    },
                    Selection::Tag(tag) => {
                        let id = propagator::query_id(slot, &tag);
                        let oracle = Arc::clone(&self.oracle);
                        let tx = self.tx.clone();
                        self.pending += 1;
                        thread::spawn(move || {
                            let msg = match oracle.query_compatibility(&id) {
                                Ok(set) => StateMsg::Narrowed { origin: slot, set },
                                Err(e) => StateMsg::NarrowFailed {
                                    origin: slot,
                                    message: e.to_string(),
                                },
                            };
                            let _ = tx.send(msg);
                        });
                    }
                }
                Ok(())
            }
            Event::DirectoryChosen(dir) => {
                self.state.set_install_dir(dir);
                Ok(())
            }
            Event::ResetRequested => {
                self.spawn_listing();
                Ok(())
            }
            Event::InstallRequested { run_init } => {
                if self.state.installing() {
                    return Err(OppdeckError::InstallInProgress);
                }
                let plan = InstallPlan::from_state(&self.state, run_init)?;
                self.state.set_installing(true);
                self.spawn_install(plan);
                Ok(())
            }
        }
    }

    /// Drain the mailbox, apply every intent, and report what happened.
    pub fn drain(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(msg) => self.apply(msg, &mut notices),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        notices
    }

    /// Tick until every outstanding worker has reported back.
    pub fn wait_idle(&mut self, mut on_notice: impl FnMut(Notice)) {
        loop {
            for notice in self.drain() {
                on_notice(notice);
            }
            if self.idle() {
                return;
            }
            thread::sleep(TICK);
        }
    }

    fn apply(&mut self, msg: StateMsg, notices: &mut Vec<Notice>) {
        match msg {
            StateMsg::ListingLoaded(listing) => {
                propagator::apply_listing(&mut self.state, listing);
                self.pending -= 1;
            }
            StateMsg::ListingFailed { message } => {
                propagator::apply_listing(&mut self.state, ToolListing::default());
                notices.push(Notice::Warning(message));
                self.pending -= 1;
            }
            StateMsg::Narrowed { origin, set } => {
                propagator::apply_narrowing(&mut self.state, origin, set);
                self.pending -= 1;
            }
            StateMsg::NarrowFailed { origin, message } => {
                propagator::apply_narrowing(&mut self.state, origin, CompatibilitySet::default());
                notices.push(Notice::Warning(message));
                self.pending -= 1;
            }
            StateMsg::InstallLine(line) => notices.push(Notice::Console(line)),
            StateMsg::InstallFinished { outcome } => {
                self.state.set_installing(false);
                self.pending -= 1;
                notices.push(match outcome {
                    Ok(()) => Notice::InstallSucceeded,
                    Err(message) => Notice::InstallFailed(message),
                });
            }
        }
    }

    fn spawn_listing(&mut self) {
        let oracle = Arc::clone(&self.oracle);
        let tx = self.tx.clone();
        self.pending += 1;
        thread::spawn(move || {
            let msg = match oracle.list_all() {
                Ok(listing) => StateMsg::ListingLoaded(listing),
                Err(e) => StateMsg::ListingFailed {
                    message: e.to_string(),
                },
            };
            let _ = tx.send(msg);
        });
    }

    fn spawn_install(&mut self, plan: InstallPlan) {
        let program = self.program.clone();
        let tx = self.tx.clone();
        let line_tx = self.tx.clone();
        self.pending += 1;
        thread::spawn(move || {
            let callback: OutputCallback = Box::new(move |line| {
                let _ = line_tx.send(StateMsg::InstallLine(line.text().to_string()));
            });
            let outcome = install::run(&plan, &program, callback).map_err(|e| e.to_string());
            let _ = tx.send(StateMsg::InstallFinished { outcome });
        });
    }
}
