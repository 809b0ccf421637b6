//! Compatibility propagation across the three selector slots.
//!
//! opp_env reports compatibility one-directionally: `info <id>` enumerates
//! what `<id>` requires. A change in any slot therefore resolves through
//! that slot's own id and the other two slots are narrowed from the answer.
//! The split between `apply_*` (pure state mutation) and the querying
//! wrappers lets the session run queries on worker threads and apply the
//! results on the state-owning thread.

use crate::error::Result;
use crate::oracle::parse::{PRIMARY_TOOL, SECONDARY_TOOL};
use crate::oracle::{CompatibilitySet, OptionSource, ToolListing};
use crate::selector::{Selection, VersionTag};
use crate::state::{AppState, SlotId};

/// The id to pass to `opp_env info` for a slot's selected tag.
///
/// Primary and secondary slots hold bare versions and need the tool-name
/// prefix; auxiliary tags are already qualified.
pub fn query_id(slot: SlotId, tag: &VersionTag) -> VersionTag {
    match slot {
        SlotId::Primary => VersionTag::qualified(PRIMARY_TOOL, tag.as_str()),
        SlotId::Secondary => VersionTag::qualified(SECONDARY_TOOL, tag.as_str()),
        SlotId::Auxiliary => tag.clone(),
    }
}

/// Apply an unconstrained listing: all three slots get their full option
/// sets, the primary defaults to the newest version, the optional slots
/// default to `NONE`.
pub fn apply_listing(state: &mut AppState, listing: ToolListing) {
    state
        .slot_mut(SlotId::Primary)
        .replace_allowed(listing.primary);
    state.slot_mut(SlotId::Primary).reset_to_newest();

    state
        .slot_mut(SlotId::Secondary)
        .replace_allowed(listing.secondary);
    state.slot_mut(SlotId::Secondary).reset_to_none();

    state
        .slot_mut(SlotId::Auxiliary)
        .replace_allowed(listing.auxiliary);
    state.slot_mut(SlotId::Auxiliary).reset_to_none();
}

/// Narrow the two slots other than `origin` from a compatibility answer.
///
/// Each narrowed slot reconciles its current value against the new set.
pub fn apply_narrowing(state: &mut AppState, origin: SlotId, set: CompatibilitySet) {
    let CompatibilitySet {
        primary_allowed,
        secondary_allowed,
        auxiliary_allowed,
    } = set;

    match origin {
        SlotId::Primary => {
            state
                .slot_mut(SlotId::Secondary)
                .replace_allowed(secondary_allowed);
            state
                .slot_mut(SlotId::Auxiliary)
                .replace_allowed(auxiliary_allowed);
        }
        SlotId::Secondary => {
            state
                .slot_mut(SlotId::Primary)
                .replace_allowed(primary_allowed);
            state
                .slot_mut(SlotId::Auxiliary)
                .replace_allowed(auxiliary_allowed);
        }
        SlotId::Auxiliary => {
            state
                .slot_mut(SlotId::Primary)
                .replace_allowed(primary_allowed);
            state
                .slot_mut(SlotId::Secondary)
                .replace_allowed(secondary_allowed);
        }
    }
}

/// Full unconstrained reset from `opp_env list`.
///
/// On oracle failure the slots are emptied and the error is returned for
/// non-fatal display; the state never holds stale options after a failure.
pub fn repopulate(oracle: &dyn OptionSource, state: &mut AppState) -> Result<()> {
    match oracle.list_all() {
        Ok(listing) => {
            apply_listing(state, listing);
            Ok(())
        }
        Err(e) => {
            apply_listing(state, ToolListing::default());
            Err(e)
        }
    }
}

/// React to a slot's current value having changed.
///
/// An optional slot going back to `NONE` reverts to the full unconstrained
/// listing; any concrete value narrows the other two slots through a
/// compatibility query. Query failures empty the narrowed sets.
pub fn slot_changed(oracle: &dyn OptionSource, state: &mut AppState, slot: SlotId) -> Result<()> {
    match state.selection(slot) {
        Selection::None => match slot {
            SlotId::Primary => Ok(()),
            SlotId::Secondary | SlotId::Auxiliary => repopulate(oracle, state),
        },
        Selection::Tag(tag) => match oracle.query_compatibility(&query_id(slot, &tag)) {
            Ok(set) => {
                apply_narrowing(state, slot, set);
                Ok(())
            }
            Err(e) => {
                apply_narrowing(state, slot, CompatibilitySet::default());
                Err(e)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OppdeckError;

    /// Oracle with canned answers, mirroring the MockUI approach.
    struct FixedOracle {
        listing: &'static str,
        info: Vec<(&'static str, &'static str)>,
    }

    impl FixedOracle {
        fn standard() -> Self {
            Self {
                listing: "omnetpp 6.0 6.1\ninet 4.4 4.5\nveins 5.2\n",
                info: vec![
                    ("omnetpp-6.0", "Requires:\n- inet: 4.4\n"),
                    ("omnetpp-6.1", "Requires:\n- inet: 4.4 / 4.5\n- veins: 5.2\n"),
                    ("inet-4.4", "Requires:\n- omnetpp: 6.0 / 6.1\n- veins: 5.2\n"),
                    ("veins-5.2", "Requires:\n- omnetpp: 6.1\n- inet: 4.5\n"),
                ],
            }
        }
    }

    impl OptionSource for FixedOracle {
        fn list_all(&self) -> Result<ToolListing> {
            Ok(crate::oracle::parse::parse_listing(self.listing))
        }

        fn query_compatibility(&self, id: &VersionTag) -> Result<CompatibilitySet> {
            let report = self
                .info
                .iter()
                .find(|(k, _)| *k == id.as_str())
                .map(|(_, v)| *v)
                .unwrap_or("");
            Ok(crate::oracle::parse::parse_requirements(report))
        }
    }

    struct BrokenOracle;

    impl OptionSource for BrokenOracle {
        fn list_all(&self) -> Result<ToolListing> {
            Err(OppdeckError::ToolFailed {
                command: "opp_env list".into(),
                code: Some(1),
                stderr: "boom".into(),
            })
        }

        fn query_compatibility(&self, _id: &VersionTag) -> Result<CompatibilitySet> {
            Err(OppdeckError::ToolFailed {
                command: "opp_env info".into(),
                code: Some(1),
                stderr: "boom".into(),
            })
        }
    }

    fn populated() -> AppState {
        let mut state = AppState::new();
        repopulate(&FixedOracle::standard(), &mut state).unwrap();
        state
    }

    #[test]
    fn repopulate_defaults_primary_to_newest_and_others_to_none() {
        let state = populated();
        assert_eq!(state.selection(SlotId::Primary).to_string(), "6.1");
        assert!(state.selection(SlotId::Secondary).is_none());
        assert!(state.selection(SlotId::Auxiliary).is_none());
        assert_eq!(
            state.slot(SlotId::Auxiliary).display_choices(),
            vec!["NONE", "veins-5.2"]
        );
    }

    #[test]
    fn repopulate_twice_is_idempotent() {
        let oracle = FixedOracle::standard();
        let mut state = AppState::new();
        repopulate(&oracle, &mut state).unwrap();
        let first = state.clone();
        repopulate(&oracle, &mut state).unwrap();
        assert_eq!(state.slot(SlotId::Primary), first.slot(SlotId::Primary));
        assert_eq!(state.slot(SlotId::Secondary), first.slot(SlotId::Secondary));
        assert_eq!(state.slot(SlotId::Auxiliary), first.slot(SlotId::Auxiliary));
    }

    #[test]
    fn primary_change_narrows_secondary_and_auxiliary() {
        let oracle = FixedOracle::standard();
        let mut state = populated();

        state
            .slot_mut(SlotId::Primary)
            .select(Selection::parse("6.0"));
        slot_changed(&oracle, &mut state, SlotId::Primary).unwrap();

        assert_eq!(
            state.slot(SlotId::Secondary).display_choices(),
            vec!["NONE", "4.4"]
        );
        // omnetpp-6.0 reports no auxiliary entries: only NONE remains.
        assert_eq!(state.slot(SlotId::Auxiliary).display_choices(), vec!["NONE"]);
    }

    #[test]
    fn secondary_change_narrows_primary_without_none_option() {
        let oracle = FixedOracle::standard();
        let mut state = populated();

        state
            .slot_mut(SlotId::Secondary)
            .select(Selection::parse("4.4"));
        slot_changed(&oracle, &mut state, SlotId::Secondary).unwrap();

        assert_eq!(
            state.slot(SlotId::Primary).display_choices(),
            vec!["6.0", "6.1"]
        );
        assert_eq!(state.selection(SlotId::Primary).to_string(), "6.1");
        assert_eq!(
            state.slot(SlotId::Auxiliary).display_choices(),
            vec!["NONE", "veins-5.2"]
        );
    }

    #[test]
    fn auxiliary_change_narrows_primary_and_secondary() {
        let oracle = FixedOracle::standard();
        let mut state = populated();

        state
            .slot_mut(SlotId::Auxiliary)
            .select(Selection::parse("veins-5.2"));
        slot_changed(&oracle, &mut state, SlotId::Auxiliary).unwrap();

        assert_eq!(state.slot(SlotId::Primary).display_choices(), vec!["6.1"]);
        assert_eq!(
            state.slot(SlotId::Secondary).display_choices(),
            vec!["NONE", "4.5"]
        );
    }

    #[test]
    fn optional_slot_back_to_none_restores_full_listing() {
        let oracle = FixedOracle::standard();
        let mut state = populated();

        state
            .slot_mut(SlotId::Secondary)
            .select(Selection::parse("4.4"));
        slot_changed(&oracle, &mut state, SlotId::Secondary).unwrap();

        state.slot_mut(SlotId::Secondary).select(Selection::None);
        slot_changed(&oracle, &mut state, SlotId::Secondary).unwrap();

        assert_eq!(
            state.slot(SlotId::Primary).display_choices(),
            vec!["6.0", "6.1"]
        );
        assert_eq!(
            state.slot(SlotId::Secondary).display_choices(),
            vec!["NONE", "4.4", "4.5"]
        );
    }

    #[test]
    fn narrowing_reconciles_invalidated_selection() {
        let oracle = FixedOracle::standard();
        let mut state = populated();

        state
            .slot_mut(SlotId::Secondary)
            .select(Selection::parse("4.5"));
        slot_changed(&oracle, &mut state, SlotId::Secondary).unwrap();

        // omnetpp-6.0 only allows inet 4.4, so the 4.5 selection resets.
        state
            .slot_mut(SlotId::Primary)
            .select(Selection::parse("6.0"));
        slot_changed(&oracle, &mut state, SlotId::Primary).unwrap();
        assert!(state.selection(SlotId::Secondary).is_none());
    }

    #[test]
    fn failed_listing_empties_all_slots_and_reports() {
        let mut state = populated();
        let err = repopulate(&BrokenOracle, &mut state).unwrap_err();
        assert!(matches!(err, OppdeckError::ToolFailed { .. }));
        assert!(state.slot(SlotId::Primary).allowed().is_empty());
        assert!(state.slot(SlotId::Secondary).allowed().is_empty());
        assert!(state.slot(SlotId::Auxiliary).allowed().is_empty());
    }

    #[test]
    fn failed_query_empties_narrowed_slots() {
        let mut state = populated();
        state
            .slot_mut(SlotId::Primary)
            .select(Selection::parse("6.0"));
        let err = slot_changed(&BrokenOracle, &mut state, SlotId::Primary).unwrap_err();
        assert!(matches!(err, OppdeckError::ToolFailed { .. }));
        assert!(state.slot(SlotId::Secondary).allowed().is_empty());
        // The changed slot itself keeps its value.
        assert_eq!(state.selection(SlotId::Primary).to_string(), "6.0");
    }

    #[test]
    fn query_id_qualifies_bare_versions() {
        assert_eq!(
            query_id(SlotId::Primary, &VersionTag::new("6.0")).as_str(),
            "omnetpp-6.0"
        );
        assert_eq!(
            query_id(SlotId::Secondary, &VersionTag::new("4.4")).as_str(),
            "inet-4.4"
        );
        assert_eq!(
            query_id(SlotId::Auxiliary, &VersionTag::new("veins-5.2")).as_str(),
            "veins-5.2"
        );
    }
}
