//! Version tags, selections, and selector slots.
//!
//! A [`VersionTag`] is an opaque string naming one installable unit, either
//! a bare version (`6.1`) for the OMNeT++ and INET slots or a qualified
//! `tool-version` pair (`veins-5.2`) for auxiliary tools. The only structure
//! assumed beyond string equality is the trailing-digit-group ordering used
//! to pick a default.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Label shown for an empty optional selection.
pub const NONE_LABEL: &str = "NONE";

static RE_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Opaque identifier for one installable unit or version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VersionTag(String);

impl VersionTag {
    /// Create a tag from any string-like value.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Create a `tool-version` qualified tag.
    pub fn qualified(tool: &str, version: &str) -> Self {
        Self(format!("{}-{}", tool, version))
    }

    /// The tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ordering key: the tag's digit groups as an integer tuple.
    ///
    /// `omnetpp-6.0.1` yields `[6, 0, 1]`, so tuple comparison ranks
    /// versions the way a human reads them. Non-numeric text is ignored.
    pub fn version_key(&self) -> Vec<u64> {
        RE_DIGITS
            .find_iter(&self.0)
            .filter_map(|m| m.as_str().parse().ok())
            .collect()
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionTag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The greatest tag under the digit-tuple ordering (the newest-looking one).
pub fn newest(tags: &[VersionTag]) -> Option<&VersionTag> {
    tags.iter().max_by(|a, b| a.version_key().cmp(&b.version_key()))
}

/// The current value of one slot: either a tag or the explicit `NONE`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Tag(VersionTag),
}

impl Selection {
    /// Parse a display label back into a selection.
    pub fn parse(label: &str) -> Self {
        if label == NONE_LABEL {
            Self::None
        } else {
            Self::Tag(VersionTag::new(label))
        }
    }

    /// The selected tag, if any.
    pub fn tag(&self) -> Option<&VersionTag> {
        match self {
            Self::None => None,
            Self::Tag(t) => Some(t),
        }
    }

    /// Whether this is the explicit `NONE` selection.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str(NONE_LABEL),
            Self::Tag(t) => t.fmt(f),
        }
    }
}

/// One selection slot: a current value plus its allowed set.
///
/// Insertion order of `allowed` is preserved for display. `optional` slots
/// accept the explicit `NONE` choice; the mandatory OMNeT++ slot does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    current: Selection,
    allowed: Vec<VersionTag>,
    optional: bool,
}

impl Slot {
    /// Create a slot whose value is required (no `NONE` choice).
    pub fn mandatory() -> Self {
        Self {
            current: Selection::None,
            allowed: Vec::new(),
            optional: false,
        }
    }

    /// Create a slot that may be left at `NONE`.
    pub fn optional() -> Self {
        Self {
            current: Selection::None,
            allowed: Vec::new(),
            optional: true,
        }
    }

    /// Current selection.
    pub fn current(&self) -> &Selection {
        &self.current
    }

    /// Currently selected tag, if any.
    pub fn current_tag(&self) -> Option<&VersionTag> {
        self.current.tag()
    }

    /// Allowed tags in display order (without the `NONE` entry).
    pub fn allowed(&self) -> &[VersionTag] {
        &self.allowed
    }

    /// Whether `NONE` is a legal choice for this slot.
    pub fn allows_none(&self) -> bool {
        self.optional
    }

    /// Replace the allowed set and reconcile the current value against it.
    ///
    /// Duplicates are dropped, first occurrence wins.
    pub fn replace_allowed(&mut self, tags: Vec<VersionTag>) {
        let mut seen = Vec::with_capacity(tags.len());
        for tag in tags {
            if !seen.contains(&tag) {
                seen.push(tag);
            }
        }
        self.allowed = seen;
        self.reconcile();
    }

    /// Set the current value to the newest allowed tag, or `NONE` if empty.
    pub fn reset_to_newest(&mut self) {
        self.current = match newest(&self.allowed) {
            Some(tag) => Selection::Tag(tag.clone()),
            None => Selection::None,
        };
    }

    /// Set the current value back to `NONE`.
    pub fn reset_to_none(&mut self) {
        self.current = Selection::None;
    }

    /// Try to select a value; returns false if it is not a legal choice.
    pub fn select(&mut self, selection: Selection) -> bool {
        let legal = match &selection {
            Selection::None => self.optional || self.allowed.is_empty(),
            Selection::Tag(t) => self.allowed.contains(t),
        };
        if legal {
            self.current = selection;
        }
        legal
    }

    /// Labels for a selection prompt: `NONE` first when the slot permits it.
    pub fn display_choices(&self) -> Vec<String> {
        let mut choices = Vec::with_capacity(self.allowed.len() + 1);
        if self.optional {
            choices.push(NONE_LABEL.to_string());
        }
        choices.extend(self.allowed.iter().map(|t| t.to_string()));
        choices
    }

    /// Reset an invalidated current value to a member of the allowed set.
    ///
    /// A selected tag that is absent from the new allowed set becomes `NONE`
    /// for optional slots, or the first allowed tag for mandatory ones.
    fn reconcile(&mut self) {
        if let Selection::Tag(tag) = &self.current {
            if !self.allowed.contains(tag) {
                self.current = if self.optional {
                    Selection::None
                } else {
                    match self.allowed.first() {
                        Some(first) => Selection::Tag(first.clone()),
                        None => Selection::None,
                    }
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<VersionTag> {
        names.iter().map(|n| VersionTag::new(*n)).collect()
    }

    #[test]
    fn version_key_extracts_digit_groups() {
        assert_eq!(VersionTag::new("6.0.1").version_key(), vec![6, 0, 1]);
        assert_eq!(VersionTag::new("omnetpp-6.1").version_key(), vec![6, 1]);
        assert_eq!(VersionTag::new("veins-5.2").version_key(), vec![5, 2]);
        assert!(VersionTag::new("git").version_key().is_empty());
    }

    #[test]
    fn newest_picks_greatest_tuple_not_source_order() {
        let list = tags(&["6.1", "6.0.3", "5.7", "6.0"]);
        assert_eq!(newest(&list).unwrap().as_str(), "6.1");
    }

    #[test]
    fn newest_handles_multi_component_versions() {
        let list = tags(&["4.4.1", "4.4", "4.5"]);
        assert_eq!(newest(&list).unwrap().as_str(), "4.5");
    }

    #[test]
    fn newest_of_empty_is_none() {
        assert!(newest(&[]).is_none());
    }

    #[test]
    fn selection_parse_roundtrip() {
        assert!(Selection::parse("NONE").is_none());
        assert_eq!(Selection::parse("6.1").to_string(), "6.1");
        assert_eq!(Selection::None.to_string(), "NONE");
    }

    #[test]
    fn replace_allowed_keeps_valid_current() {
        let mut slot = Slot::optional();
        slot.replace_allowed(tags(&["4.4", "4.5"]));
        assert!(slot.select(Selection::parse("4.4")));
        slot.replace_allowed(tags(&["4.4"]));
        assert_eq!(slot.current().to_string(), "4.4");
    }

    #[test]
    fn reconcile_resets_optional_slot_to_none() {
        let mut slot = Slot::optional();
        slot.replace_allowed(tags(&["4.4", "4.5"]));
        slot.select(Selection::parse("4.5"));
        slot.replace_allowed(tags(&["4.4"]));
        assert!(slot.current().is_none());
    }

    #[test]
    fn reconcile_resets_mandatory_slot_to_first_allowed() {
        let mut slot = Slot::mandatory();
        slot.replace_allowed(tags(&["6.0", "6.1"]));
        slot.select(Selection::parse("6.1"));
        slot.replace_allowed(tags(&["5.7", "6.0"]));
        assert_eq!(slot.current().to_string(), "5.7");
    }

    #[test]
    fn reconcile_empties_mandatory_slot_when_nothing_allowed() {
        let mut slot = Slot::mandatory();
        slot.replace_allowed(tags(&["6.0"]));
        slot.select(Selection::parse("6.0"));
        slot.replace_allowed(Vec::new());
        assert!(slot.current().is_none());
    }

    #[test]
    fn select_rejects_values_outside_allowed_set() {
        let mut slot = Slot::optional();
        slot.replace_allowed(tags(&["4.4"]));
        assert!(!slot.select(Selection::parse("9.9")));
        assert!(slot.current().is_none());
    }

    #[test]
    fn mandatory_slot_rejects_none_while_choices_exist() {
        let mut slot = Slot::mandatory();
        slot.replace_allowed(tags(&["6.0"]));
        slot.select(Selection::parse("6.0"));
        assert!(!slot.select(Selection::None));
        assert_eq!(slot.current().to_string(), "6.0");
    }

    #[test]
    fn display_choices_lead_with_none_for_optional_slots() {
        let mut slot = Slot::optional();
        slot.replace_allowed(tags(&["4.4", "4.5"]));
        assert_eq!(slot.display_choices(), vec!["NONE", "4.4", "4.5"]);

        let mut mandatory = Slot::mandatory();
        mandatory.replace_allowed(tags(&["6.0"]));
        assert_eq!(mandatory.display_choices(), vec!["6.0"]);
    }

    #[test]
    fn replace_allowed_drops_duplicates_preserving_order() {
        let mut slot = Slot::optional();
        slot.replace_allowed(tags(&["4.4", "4.5", "4.4"]));
        assert_eq!(slot.allowed(), tags(&["4.4", "4.5"]).as_slice());
    }
}
