//! Application state: the three selector slots plus install settings.
//!
//! `AppState` is owned by exactly one thread (the session loop). Worker
//! threads never touch it; they send intent messages that the owning
//! thread applies on its tick.

use std::path::{Path, PathBuf};

use crate::selector::{Selection, Slot};

/// Identifies one of the three user-facing selection slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotId {
    /// OMNeT++ version (mandatory).
    Primary,
    /// INET version (optional).
    Secondary,
    /// Any other model library, as a qualified `tool-version` tag (optional).
    Auxiliary,
}

impl SlotId {
    /// Human-readable slot name for prompts and messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Primary => "OMNeT++ version",
            Self::Secondary => "INET version",
            Self::Auxiliary => "Extra tool",
        }
    }
}

/// Mutable application state, created empty at startup and populated by the
/// initial unconstrained listing. Not persisted.
#[derive(Debug, Clone)]
pub struct AppState {
    primary: Slot,
    secondary: Slot,
    auxiliary: Slot,
    install_dir: Option<PathBuf>,
    installing: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create an empty state: no choices loaded, nothing selected.
    pub fn new() -> Self {
        Self {
            primary: Slot::mandatory(),
            secondary: Slot::optional(),
            auxiliary: Slot::optional(),
            install_dir: None,
            installing: false,
        }
    }

    /// Borrow a slot by id.
    pub fn slot(&self, id: SlotId) -> &Slot {
        match id {
            SlotId::Primary => &self.primary,
            SlotId::Secondary => &self.secondary,
            SlotId::Auxiliary => &self.auxiliary,
        }
    }

    /// Mutably borrow a slot by id.
    pub fn slot_mut(&mut self, id: SlotId) -> &mut Slot {
        match id {
            SlotId::Primary => &mut self.primary,
            SlotId::Secondary => &mut self.secondary,
            SlotId::Auxiliary => &mut self.auxiliary,
        }
    }

    /// The chosen install target directory, if any.
    pub fn install_dir(&self) -> Option<&Path> {
        self.install_dir.as_deref()
    }

    /// Record the install target directory.
    pub fn set_install_dir(&mut self, dir: PathBuf) {
        self.install_dir = Some(dir);
    }

    /// Whether an install subprocess is currently running.
    pub fn installing(&self) -> bool {
        self.installing
    }

    /// Flip the in-flight install flag.
    pub fn set_installing(&mut self, installing: bool) {
        self.installing = installing;
    }

    /// Whether the install preconditions hold: an OMNeT++ version is
    /// selected and a target directory has been chosen.
    pub fn install_ready(&self) -> bool {
        !self.primary.current().is_none() && self.install_dir.is_some()
    }

    /// One-line summary of the current selections, for the session header.
    pub fn summary(&self) -> String {
        format!(
            "omnetpp={}  inet={}  tool={}  dir={}",
            self.primary.current(),
            self.secondary.current(),
            self.auxiliary.current(),
            self.install_dir
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(not set)".to_string()),
        )
    }

    /// Current selection of a slot, convenience for event handling.
    pub fn selection(&self, id: SlotId) -> Selection {
        self.slot(id).current().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{Selection, VersionTag};

    #[test]
    fn new_state_is_empty_and_not_ready() {
        let state = AppState::new();
        assert!(state.slot(SlotId::Primary).allowed().is_empty());
        assert!(state.selection(SlotId::Secondary).is_none());
        assert!(!state.install_ready());
        assert!(!state.installing());
    }

    #[test]
    fn install_ready_needs_primary_and_directory() {
        let mut state = AppState::new();
        state
            .slot_mut(SlotId::Primary)
            .replace_allowed(vec![VersionTag::new("6.1")]);
        state
            .slot_mut(SlotId::Primary)
            .select(Selection::parse("6.1"));
        assert!(!state.install_ready());

        state.set_install_dir(PathBuf::from("/tmp/x"));
        assert!(state.install_ready());
    }

    #[test]
    fn summary_shows_all_four_fields() {
        let mut state = AppState::new();
        state.set_install_dir(PathBuf::from("/tmp/sims"));
        let summary = state.summary();
        assert!(summary.contains("omnetpp=NONE"));
        assert!(summary.contains("inet=NONE"));
        assert!(summary.contains("/tmp/sims"));
    }
}
