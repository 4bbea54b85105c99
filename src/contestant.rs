//! Contestants (entrants in the pool): their remaining teams and the shape
//! of picks still owed per week, plus duplicate-contestant detection.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::errors::{CoreError, CoreResult};
use crate::permutors::IdenticalPermutor;
use crate::team::TeamId;

/// One entrant still in the pool.
///
/// `picks_per_week` is taken as given (which remaining weeks are
/// double-down weeks is contestant state, not something this search
/// re-derives); only the *order* in which the remaining teams fill those
/// slots is searched.
#[derive(Debug, Clone)]
pub struct Contestant {
    pub name: String,
    remaining_teams: Vec<TeamId>,
    distinct_teams: Vec<TeamId>,
    group_sizes: Vec<usize>,
    picks_per_week: Vec<usize>,
    distinct_pick_counts: Vec<usize>,
    pick_count_group_sizes: Vec<usize>,
    /// An opaque external identifier (e.g. from an upstream roster system),
    /// carried through to results but never interpreted here.
    pub external_ref: Option<String>,
}

impl Contestant {
    pub fn new(
        name: impl Into<String>,
        mut remaining_teams: Vec<TeamId>,
        picks_per_week: Vec<usize>,
        external_ref: Option<String>,
    ) -> CoreResult<Self> {
        let name = name.into();
        let picks_owed: usize = picks_per_week.iter().sum();
        if picks_owed != remaining_teams.len() {
            return Err(CoreError::InvalidInput(format!(
                "contestant \"{name}\" owes {picks_owed} picks but has {} remaining teams",
                remaining_teams.len()
            )));
        }
        remaining_teams.sort();

        let mut distinct_teams = Vec::new();
        let mut group_sizes = Vec::new();
        for &team in &remaining_teams {
            if distinct_teams.last() == Some(&team) {
                *group_sizes.last_mut().unwrap() += 1;
            } else {
                distinct_teams.push(team);
                group_sizes.push(1);
            }
        }

        let mut sorted_picks = picks_per_week.clone();
        sorted_picks.sort_unstable();
        let mut distinct_pick_counts = Vec::new();
        let mut pick_count_group_sizes = Vec::new();
        for &k in &sorted_picks {
            if distinct_pick_counts.last() == Some(&k) {
                *pick_count_group_sizes.last_mut().unwrap() += 1;
            } else {
                distinct_pick_counts.push(k);
                pick_count_group_sizes.push(1);
            }
        }

        Ok(Contestant {
            name,
            remaining_teams,
            distinct_teams,
            group_sizes,
            picks_per_week,
            distinct_pick_counts,
            pick_count_group_sizes,
            external_ref,
        })
    }

    pub fn remaining_teams(&self) -> &[TeamId] {
        &self.remaining_teams
    }

    pub fn picks_per_week(&self) -> &[usize] {
        &self.picks_per_week
    }

    pub fn num_remaining_weeks(&self) -> usize {
        self.picks_per_week.len()
    }

    /// An iterator over the distinct arrangements of remaining teams into
    /// pick slots, deduplicating permutations that only swap between
    /// copies of the same team.
    pub fn team_order_iterator(&self) -> IdenticalPermutor {
        IdenticalPermutor::new(&self.group_sizes)
    }

    /// Expands a type sequence from [`Contestant::team_order_iterator`]
    /// (group indices into `distinct_teams`) into an actual team order.
    pub fn expand_team_order(&self, type_sequence: &[usize]) -> Vec<TeamId> {
        type_sequence.iter().map(|&t| self.distinct_teams[t]).collect()
    }

    /// `n! / (n1! * n2! * ...)` over the remaining-team multiset: the
    /// number of distinct arrangements this contestant's search space has.
    pub fn num_team_orders(&self) -> u128 {
        IdenticalPermutor::count_total(&self.group_sizes)
    }

    /// An iterator over the distinct arrangements of the contestant's
    /// pick-type budget into the remaining weeks — which remaining weeks
    /// are the byes, which are doubles, and so on.
    pub fn picks_per_week_order_iterator(&self) -> IdenticalPermutor {
        IdenticalPermutor::new(&self.pick_count_group_sizes)
    }

    /// Expands a type sequence from
    /// [`Contestant::picks_per_week_order_iterator`] into an actual
    /// picks-per-week vector.
    pub fn expand_picks_per_week(&self, type_sequence: &[usize]) -> Vec<usize> {
        type_sequence.iter().map(|&t| self.distinct_pick_counts[t]).collect()
    }

    /// The size of the picks-per-week arrangement space, analogous to
    /// [`Contestant::num_team_orders`].
    pub fn num_picks_per_week_orders(&self) -> u128 {
        IdenticalPermutor::count_total(&self.pick_count_group_sizes)
    }

    /// The full search space this contestant's exhaustive search must
    /// cover: every distinct team order times every distinct arrangement
    /// of the pick-type budget across the remaining weeks.
    pub fn search_space_size(&self) -> u128 {
        self.num_team_orders() * self.num_picks_per_week_orders()
    }

    /// Whether any remaining week still requires more than one pick (a
    /// double-down or higher).
    pub fn has_double_down_remaining(&self) -> bool {
        self.picks_per_week.iter().any(|&k| k >= 2)
    }

    /// A content hash over the sorted remaining teams and the pick-type
    /// multiset: two contestants with the same hash have an identical
    /// search space and only one of them needs to be searched.
    ///
    /// Hashes `distinct_pick_counts`/`pick_count_group_sizes` rather than
    /// `picks_per_week` directly — since the search explores every distinct
    /// arrangement of the pick-type budget across weeks itself, two
    /// contestants whose `picks_per_week` differ only in *which* week is
    /// the double-down still cover the exact same space.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.remaining_teams.hash(&mut hasher);
        self.distinct_pick_counts.hash(&mut hasher);
        self.pick_count_group_sizes.hash(&mut hasher);
        hasher.finish()
    }
}

/// Groups contestants that share a [`Contestant::content_hash`], each group
/// keyed by the lexicographically smallest name among its members — that
/// member is the one actually searched, with the rest along for the ride.
pub fn group_duplicates(contestants: &[Contestant]) -> HashMap<String, Vec<String>> {
    let mut by_hash: HashMap<u64, Vec<&Contestant>> = HashMap::new();
    for c in contestants {
        by_hash.entry(c.content_hash()).or_default().push(c);
    }

    let mut groups = HashMap::new();
    for mut members in by_hash.into_values() {
        members.sort_by(|a, b| a.name.cmp(&b.name));
        let representative = members[0].name.clone();
        let names = members.into_iter().map(|c| c.name.clone()).collect();
        groups.insert(representative, names);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_pick_counts() {
        assert!(Contestant::new("A", vec![TeamId(0), TeamId(1)], vec![1], None).is_err());
    }

    #[test]
    fn remaining_teams_are_sorted_on_construction() {
        let c = Contestant::new("A", vec![TeamId(2), TeamId(0), TeamId(1)], vec![3], None).unwrap();
        assert_eq!(c.remaining_teams(), &[TeamId(0), TeamId(1), TeamId(2)]);
    }

    #[test]
    fn team_order_iterator_dedups_repeated_teams() {
        let c = Contestant::new(
            "A",
            vec![TeamId(0), TeamId(0), TeamId(1)],
            vec![1, 1, 1],
            None,
        )
        .unwrap();
        let orders: Vec<_> = c.team_order_iterator().collect();
        // 3!/(2!1!) = 3 distinct arrangements of {0,0,1}.
        assert_eq!(orders.len(), 3);
        assert_eq!(c.num_team_orders(), 3);
        for seq in orders {
            let expanded = c.expand_team_order(&seq);
            let mut sorted = expanded.clone();
            sorted.sort();
            assert_eq!(sorted, vec![TeamId(0), TeamId(0), TeamId(1)]);
        }
    }

    #[test]
    fn picks_per_week_order_iterator_dedups_equal_counts() {
        // [0, 1, 1] has two equal entries (the two single-pick weeks), so
        // only 3!/(1!2!) = 3 distinct arrangements, not 3! = 6.
        let c = Contestant::new("A", vec![TeamId(0), TeamId(1)], vec![0, 1, 1], None).unwrap();
        let orders: Vec<_> = c.picks_per_week_order_iterator().collect();
        assert_eq!(orders.len(), 3);
        assert_eq!(c.num_picks_per_week_orders(), 3);
        for seq in orders {
            let mut expanded = c.expand_picks_per_week(&seq);
            expanded.sort_unstable();
            assert_eq!(expanded, vec![0, 1, 1]);
        }
    }

    #[test]
    fn double_down_remaining_reflects_the_pick_budget() {
        let with = Contestant::new("A", vec![TeamId(0), TeamId(1), TeamId(2)], vec![2, 1], None).unwrap();
        assert!(with.has_double_down_remaining());
        let without = Contestant::new("B", vec![TeamId(0)], vec![1], None).unwrap();
        assert!(!without.has_double_down_remaining());
    }

    #[test]
    fn identical_contestants_share_a_content_hash() {
        let a = Contestant::new("Alice", vec![TeamId(0), TeamId(1)], vec![1, 1], None).unwrap();
        let b = Contestant::new("Bob", vec![TeamId(1), TeamId(0)], vec![1, 1], None).unwrap();
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn content_hash_ignores_pick_count_order() {
        // Same remaining teams, same pick-type multiset {1, 2}, but the
        // input order of which week is the double-down differs. The
        // search explores every arrangement of that multiset itself, so
        // these two cover an identical space and must dedup together.
        let a = Contestant::new("A", vec![TeamId(0), TeamId(1), TeamId(2)], vec![1, 2], None).unwrap();
        let b = Contestant::new("B", vec![TeamId(0), TeamId(1), TeamId(2)], vec![2, 1], None).unwrap();
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn distinct_remaining_teams_do_not_collide() {
        let a = Contestant::new("Alice", vec![TeamId(0), TeamId(1)], vec![1, 1], None).unwrap();
        let b = Contestant::new("Bob", vec![TeamId(2), TeamId(3)], vec![1, 1], None).unwrap();
        assert_ne!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn group_duplicates_picks_lexicographically_smallest_representative() {
        let contestants = vec![
            Contestant::new("Zoe", vec![TeamId(0), TeamId(1)], vec![1, 1], None).unwrap(),
            Contestant::new("Amy", vec![TeamId(1), TeamId(0)], vec![1, 1], None).unwrap(),
            Contestant::new("Unique", vec![TeamId(5)], vec![1], None).unwrap(),
        ];
        let groups = group_duplicates(&contestants);
        assert_eq!(groups.len(), 2);
        let dup_group = groups.get("Amy").expect("Amy should represent the duplicate group");
        assert_eq!(dup_group.len(), 2);
        assert!(groups.contains_key("Unique"));
    }
}
