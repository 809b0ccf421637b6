//! Parsers for opp_env's plain-text output.
//!
//! opp_env speaks no structured protocol; these parsers turn its two text
//! shapes into [`ToolListing`] and [`CompatibilitySet`]. The format is an
//! observed contract, not a documented one, so parsing is defensive:
//! malformed lines are skipped, never fatal.

use crate::selector::VersionTag;

use super::{CompatibilitySet, ToolListing};

/// Tool name backing the mandatory primary slot.
pub const PRIMARY_TOOL: &str = "omnetpp";

/// Tool name backing the secondary slot.
pub const SECONDARY_TOOL: &str = "inet";

/// Version token opp_env uses for the latest development snapshot.
/// Snapshot builds are not offered as installable choices.
const SNAPSHOT_PLACEHOLDER: &str = "git";

/// Parse `opp_env list` output into the three option groups.
///
/// One line per tool, whitespace-separated: `<tool> <v1> <v2> ...`.
/// Lines with fewer than two tokens are ignored. The `omnetpp` row becomes
/// the primary group and the `inet` row the secondary group, both as bare
/// versions; every other row's versions become qualified `tool-version`
/// auxiliary tags. Rows left empty after dropping the snapshot placeholder
/// disappear entirely.
pub fn parse_listing(output: &str) -> ToolListing {
    let mut listing = ToolListing::default();

    for line in output.lines() {
        let mut tokens = line.split_whitespace();
        let Some(tool) = tokens.next() else {
            continue;
        };
        let versions: Vec<&str> = tokens.filter(|v| *v != SNAPSHOT_PLACEHOLDER).collect();
        if versions.is_empty() {
            continue;
        }

        match tool {
            PRIMARY_TOOL => {
                listing.primary = versions.into_iter().map(VersionTag::new).collect();
            }
            SECONDARY_TOOL => {
                listing.secondary = versions.into_iter().map(VersionTag::new).collect();
            }
            other => {
                listing
                    .auxiliary
                    .extend(versions.into_iter().map(|v| VersionTag::qualified(other, v)));
            }
        }
    }

    listing
}

/// Parse `opp_env info <id>` output into the compatible option sets.
///
/// Only the `Requires:` block is considered. Inside it, bullets of the
/// shape `- <tool>: <v1> / <v2> / ...` feed the primary/secondary groups
/// (bare versions) or the auxiliary group (qualified tags). Scanning stops
/// at the first non-bullet line after the block starts, so unrelated
/// bullets elsewhere in the report are never picked up. Bullets without a
/// `:` are skipped.
pub fn parse_requirements(output: &str) -> CompatibilitySet {
    let mut set = CompatibilitySet::default();
    let mut in_requires = false;

    for line in output.lines() {
        let trimmed = line.trim();

        if !in_requires {
            if trimmed.starts_with("Requires:") {
                in_requires = true;
            }
            continue;
        }

        let Some(bullet) = trimmed.strip_prefix("- ") else {
            break;
        };
        let Some((tool, versions)) = bullet.split_once(':') else {
            continue;
        };

        let tool = tool.trim();
        let versions: Vec<&str> = versions
            .split('/')
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != SNAPSHOT_PLACEHOLDER)
            .collect();

        match tool {
            PRIMARY_TOOL => {
                set.primary_allowed = versions.into_iter().map(VersionTag::new).collect();
            }
            SECONDARY_TOOL => {
                set.secondary_allowed = versions.into_iter().map(VersionTag::new).collect();
            }
            other => {
                set.auxiliary_allowed
                    .extend(versions.into_iter().map(|v| VersionTag::qualified(other, v)));
            }
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tags: &[VersionTag]) -> Vec<&str> {
        tags.iter().map(|t| t.as_str()).collect()
    }

    #[test]
    fn listing_partitions_rows_into_three_groups() {
        let listing = parse_listing("omnetpp 6.0 6.1\ninet 4.4 4.5\nveins 5.2\n");
        assert_eq!(names(&listing.primary), vec!["6.0", "6.1"]);
        assert_eq!(names(&listing.secondary), vec!["4.4", "4.5"]);
        assert_eq!(names(&listing.auxiliary), vec!["veins-5.2"]);
    }

    #[test]
    fn listing_ignores_short_lines() {
        let listing = parse_listing("omnetpp 6.0\n\nveins\nnote\n");
        assert_eq!(names(&listing.primary), vec!["6.0"]);
        assert!(listing.auxiliary.is_empty());
    }

    #[test]
    fn listing_drops_snapshot_placeholder_tokens() {
        let listing = parse_listing("omnetpp git 6.0\nsimulte git\n");
        assert_eq!(names(&listing.primary), vec!["6.0"]);
        assert!(listing.auxiliary.is_empty());
    }

    #[test]
    fn listing_qualifies_auxiliary_tools_per_version() {
        let listing = parse_listing("veins 5.2 5.1\nsimulte 1.2.0\n");
        assert_eq!(
            names(&listing.auxiliary),
            vec!["veins-5.2", "veins-5.1", "simulte-1.2.0"]
        );
    }

    #[test]
    fn requirements_reads_only_the_requires_block() {
        let report = "\
omnetpp-6.0
Some description text.
- stray: 1.0
Requires:
- inet: 4.4 / 4.5
- veins: 5.2
Installed: no
- trailing: 9.9
";
        let set = parse_requirements(report);
        assert!(set.primary_allowed.is_empty());
        assert_eq!(names(&set.secondary_allowed), vec!["4.4", "4.5"]);
        assert_eq!(names(&set.auxiliary_allowed), vec!["veins-5.2"]);
    }

    #[test]
    fn requirements_stop_at_first_non_bullet_line() {
        let report = "Requires:\n- inet: 4.4\n\n- veins: 5.2\n";
        let set = parse_requirements(report);
        assert_eq!(names(&set.secondary_allowed), vec!["4.4"]);
        assert!(set.auxiliary_allowed.is_empty());
    }

    #[test]
    fn requirements_fill_primary_from_omnetpp_bullet() {
        let set = parse_requirements("Requires:\n- omnetpp: 6.0 / 6.0.1 / 6.1\n");
        assert_eq!(names(&set.primary_allowed), vec!["6.0", "6.0.1", "6.1"]);
    }

    #[test]
    fn requirements_skip_malformed_bullets() {
        let set = parse_requirements("Requires:\n- not a bullet with colon\n- inet: 4.4\n");
        assert_eq!(names(&set.secondary_allowed), vec!["4.4"]);
    }

    #[test]
    fn requirements_drop_snapshot_versions() {
        let set = parse_requirements("Requires:\n- inet: git / 4.4\n");
        assert_eq!(names(&set.secondary_allowed), vec!["4.4"]);
    }

    #[test]
    fn requirements_of_output_without_block_are_empty() {
        let set = parse_requirements("omnetpp-6.0\nNothing required.\n");
        assert!(set.primary_allowed.is_empty());
        assert!(set.secondary_allowed.is_empty());
        assert!(set.auxiliary_allowed.is_empty());
    }
}
