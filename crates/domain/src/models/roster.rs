//! Roster aggregation: sorted view and summary statistics over guest groups.
//!
//! Everything here is recomputed from the in-memory collection on every
//! call; nothing is cached and no counters live in the store.

use serde::Serialize;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use super::guest_group::GuestGroup;
use super::rsvp::rsvp_link;

/// Bus seats requested by the attending guests of one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BusBreakdown {
    pub bus_1630: usize,
    pub bus_1700: usize,
    pub total: usize,
}

impl BusBreakdown {
    pub fn for_group(group: &GuestGroup) -> Self {
        let (bus_1630, bus_1700) = group.bus_counts();
        Self {
            bus_1630,
            bus_1700,
            total: bus_1630 + bus_1700,
        }
    }
}

/// One row of the roster table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GroupSummary {
    #[serde(flatten)]
    pub group: GuestGroup,
    pub party_size: usize,
    pub coming: usize,
    pub responded: bool,
    pub bus_requested: bool,
    pub bus: BusBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsvp_link: Option<String>,
}

impl GroupSummary {
    fn new(group: GuestGroup) -> Self {
        Self {
            party_size: group.party_size(),
            coming: group.coming_count(),
            responded: group.has_responded(),
            bus_requested: group.bus_requested(),
            bus: BusBreakdown::for_group(&group),
            rsvp_link: None,
            group,
        }
    }
}

/// Headline numbers for the dashboard.
///
/// `total_responded_invited == total_coming + total_not_coming` for any input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RosterStats {
    pub total_invited: usize,
    pub total_coming: usize,
    pub total_responded_invited: usize,
    pub total_not_coming: usize,
    pub total_needing_bus: usize,
}

impl RosterStats {
    pub fn compute(groups: &[GuestGroup]) -> Self {
        let total_invited = groups.iter().map(GuestGroup::party_size).sum();
        let total_coming = groups.iter().map(GuestGroup::coming_count).sum();
        let total_responded_invited = groups
            .iter()
            .filter(|g| g.has_responded())
            .map(GuestGroup::party_size)
            .sum();
        let total_needing_bus = groups
            .iter()
            .map(|g| BusBreakdown::for_group(g).total)
            .sum();

        // Attending guests always belong to responded groups, so this cannot underflow.
        let total_not_coming = total_responded_invited - total_coming;

        Self {
            total_invited,
            total_coming,
            total_responded_invited,
            total_not_coming,
            total_needing_bus,
        }
    }
}

/// Sorted, annotated roster for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RosterView {
    pub stats: RosterStats,
    pub groups: Vec<GroupSummary>,
}

impl RosterView {
    /// Fills in the public RSVP link of every group that has a code.
    pub fn with_links(mut self, origin: &str) -> Self {
        for summary in &mut self.groups {
            summary.rsvp_link = summary
                .group
                .rsvp_code
                .as_deref()
                .map(|code| rsvp_link(origin, code));
        }
        self
    }
}

/// Sort key for names: decomposed, accents stripped, lowercased.
fn name_key(name: &str) -> String {
    name.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Orders responded groups first, then by name ignoring case and accents.
///
/// Used with a stable sort, so equal names keep their insertion order.
pub fn compare_groups(a: &GuestGroup, b: &GuestGroup) -> Ordering {
    b.has_responded()
        .cmp(&a.has_responded())
        .then_with(|| name_key(&a.group_invite).cmp(&name_key(&b.group_invite)))
        .then_with(|| a.group_invite.cmp(&b.group_invite))
}

/// Derives the roster view from the current collection.
pub fn derive_view(groups: &[GuestGroup]) -> RosterView {
    let mut sorted = groups.to_vec();
    sorted.sort_by(compare_groups);

    RosterView {
        stats: RosterStats::compute(groups),
        groups: sorted.into_iter().map(GroupSummary::new).collect(),
    }
}

/// In-memory guest list held by the dashboard.
///
/// Changes are whole-collection replacement or a single-record patch,
/// applied only after the corresponding store write succeeded.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    groups: Vec<GuestGroup>,
}

impl Roster {
    pub fn new(groups: Vec<GuestGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[GuestGroup] {
        &self.groups
    }

    pub fn find(&self, id: Uuid) -> Option<&GuestGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn view(&self) -> RosterView {
        derive_view(&self.groups)
    }

    /// Returns a roster with the created group appended.
    pub fn with_added(&self, group: GuestGroup) -> Self {
        let mut groups = self.groups.clone();
        groups.push(group);
        Self { groups }
    }

    /// Returns a roster where the record with the same id is replaced.
    /// Unknown ids leave the roster unchanged.
    pub fn with_patched(&self, group: GuestGroup) -> Self {
        let groups = self
            .groups
            .iter()
            .map(|g| {
                if g.id == group.id {
                    group.clone()
                } else {
                    g.clone()
                }
            })
            .collect();
        Self { groups }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::guest::BusTime;
    use crate::models::guest_group::fixtures::{group, guest};
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn names(view: &RosterView) -> Vec<&str> {
        view.groups
            .iter()
            .map(|s| s.group.group_invite.as_str())
            .collect()
    }

    #[test]
    fn test_responded_groups_sort_first() {
        let zed = group("Zed", vec![guest("Zed", None, None)]);
        let ann = group("Ann", vec![guest("Ann", Some(true), None)]);

        let view = derive_view(&[zed.clone(), ann.clone()]);
        assert_eq!(names(&view), vec!["Ann", "Zed"]);

        let view = derive_view(&[ann, zed]);
        assert_eq!(names(&view), vec!["Ann", "Zed"]);
    }

    #[test]
    fn test_responded_partition_beats_name_order() {
        let aaron = group("Aaron", vec![guest("Aaron", None, None)]);
        let zoe = group("Zoe", vec![guest("Zoe", Some(false), None)]);

        let view = derive_view(&[aaron, zoe]);
        assert_eq!(names(&view), vec!["Zoe", "Aaron"]);
    }

    #[test]
    fn test_name_order_ignores_case() {
        let groups = vec![
            group("charlie", vec![]),
            group("Bravo", vec![]),
            group("alpha", vec![]),
        ];
        let view = derive_view(&groups);
        assert_eq!(names(&view), vec!["alpha", "Bravo", "charlie"]);
    }

    #[test]
    fn test_name_order_ignores_accents() {
        let groups = vec![
            group("Zed", vec![]),
            group("Émile", vec![]),
            group("Dvořák", vec![]),
            group("Eve", vec![]),
        ];
        let view = derive_view(&groups);
        assert_eq!(names(&view), vec!["Dvořák", "Émile", "Eve", "Zed"]);
    }

    #[test]
    fn test_identical_names_keep_insertion_order() {
        let first = group("Smith", vec![]);
        let second = group("Smith", vec![]);
        let view = derive_view(&[first.clone(), second.clone()]);
        assert_eq!(view.groups[0].group.id, first.id);
        assert_eq!(view.groups[1].group.id, second.id);
    }

    #[test]
    fn test_stats() {
        let groups = vec![
            group(
                "Smith",
                vec![
                    guest("A", Some(true), Some(BusTime::Early)),
                    guest("B", Some(false), Some(BusTime::Late)),
                    guest("C", Some(true), None),
                ],
            ),
            group("Jones", vec![guest("D", None, None), guest("E", None, None)]),
            group("Brown", vec![guest("F", Some(false), None)]),
        ];

        let stats = RosterStats::compute(&groups);
        assert_eq!(stats.total_invited, 6);
        assert_eq!(stats.total_coming, 2);
        assert_eq!(stats.total_responded_invited, 4);
        assert_eq!(stats.total_not_coming, 2);
        assert_eq!(stats.total_needing_bus, 1);
    }

    #[test]
    fn test_partially_answered_group_counts_unanswered_as_not_coming() {
        let groups = vec![group(
            "Lee",
            vec![guest("A", Some(true), None), guest("B", None, None)],
        )];
        let stats = RosterStats::compute(&groups);
        assert_eq!(stats.total_responded_invited, 2);
        assert_eq!(stats.total_coming, 1);
        assert_eq!(stats.total_not_coming, 1);
    }

    #[test]
    fn test_group_bus_breakdown() {
        let g = group(
            "Smith",
            vec![
                guest("A", Some(true), Some(BusTime::Early)),
                guest("B", Some(false), Some(BusTime::Late)),
                guest("C", Some(true), None),
            ],
        );
        let view = derive_view(&[g]);
        let summary = &view.groups[0];
        assert_eq!(
            summary.bus,
            BusBreakdown {
                bus_1630: 1,
                bus_1700: 0,
                total: 1
            }
        );
        assert!(summary.bus_requested);
        assert_eq!(summary.coming, 2);
        assert_eq!(summary.party_size, 3);
    }

    #[test]
    fn test_stats_identity_holds_for_generated_rosters() {
        let answers = [None, Some(true), Some(false)];
        let buses = [None, Some(BusTime::Early), Some(BusTime::Late)];

        for seed in 0..50usize {
            let groups: Vec<GuestGroup> = (0..(seed % 7))
                .map(|i| {
                    let guests = (0..((seed + i) % 4))
                        .map(|j| {
                            let name: String = Name().fake();
                            guest(
                                &name,
                                answers[(seed + i + j) % 3],
                                buses[(seed * 7 + j) % 3],
                            )
                        })
                        .collect();
                    let name: String = Name().fake();
                    group(&name, guests)
                })
                .collect();

            let stats = RosterStats::compute(&groups);
            assert_eq!(
                stats.total_responded_invited,
                stats.total_coming + stats.total_not_coming
            );
            assert!(stats.total_needing_bus <= stats.total_coming);
            assert!(stats.total_responded_invited <= stats.total_invited);
        }
    }

    #[test]
    fn test_with_links() {
        let mut coded = group("Coded", vec![]);
        coded.rsvp_code = Some("abcd1234".to_string());
        let plain = group("Plain", vec![]);

        let view = derive_view(&[coded, plain]).with_links("https://wedding.example/");
        assert_eq!(
            view.groups[0].rsvp_link.as_deref(),
            Some("https://wedding.example/?code=abcd1234")
        );
        assert!(view.groups[1].rsvp_link.is_none());
    }

    #[test]
    fn test_roster_patching_returns_new_state() {
        let a = group("A", vec![]);
        let roster = Roster::new(vec![a.clone()]);

        let mut coded = a.clone();
        coded.rsvp_code = Some("zzzz9999".to_string());
        let patched = roster.with_patched(coded);

        assert!(roster.find(a.id).unwrap().rsvp_code.is_none());
        assert_eq!(
            patched.find(a.id).unwrap().rsvp_code.as_deref(),
            Some("zzzz9999")
        );

        let b = group("B", vec![]);
        let grown = patched.with_added(b.clone());
        assert_eq!(grown.groups().len(), 2);
        assert_eq!(patched.groups().len(), 1);
        assert_eq!(grown.groups()[1].id, b.id);
    }

    #[test]
    fn test_patching_unknown_id_is_noop() {
        let roster = Roster::new(vec![group("A", vec![])]);
        let stranger = group("Stranger", vec![]);
        let patched = roster.with_patched(stranger);
        assert_eq!(patched.groups(), roster.groups());
    }
}
