use crate::{MatchRecord, Phase, Seed, Stage, to_seeds};
use std::collections::BTreeMap;

/// Matches split by tournament phase, borrowed from the loaded list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StageGroups<'a> {
    /// Keyed by pool name; iteration is in ascending name order.
    pub pools: BTreeMap<&'a str, Vec<&'a MatchRecord>>,
    pub brackets: Vec<&'a MatchRecord>,
    /// Rows whose pool or round is unknown, in input order.
    pub ungrouped: Vec<&'a MatchRecord>,
}

impl StageGroups<'_> {
    pub fn pool_names(&self) -> Vec<&str> {
        self.pools.keys().copied().collect()
    }

    pub fn ungrouped_in(&self, phase: Phase) -> usize {
        self.ungrouped.iter().filter(|m| m.stage.phase() == phase).count()
    }
}

/// One bracket round as shown in a round tab.
#[derive(Debug, PartialEq, Eq)]
pub struct RoundGroup<'a> {
    pub round: u32,
    pub title: &'a str,
    pub matches: Vec<&'a MatchRecord>,
}

impl RoundGroup<'_> {
    pub fn seeds(&self) -> Vec<Seed> {
        to_seeds(&self.matches)
    }
}

pub fn group_by_stage(rows: &[MatchRecord]) -> StageGroups<'_> {
    let mut groups = StageGroups::default();
    for row in rows {
        match &row.stage {
            Stage::Pool { pool_name } => groups.pools.entry(pool_name.as_str()).or_default().push(row),
            Stage::Brackets { .. } => groups.brackets.push(row),
            Stage::Ungrouped(_) => groups.ungrouped.push(row),
        }
    }
    groups
}

/// Group bracket matches by round.
///
/// Rounds come out in the order their first match appears in `rows`, not in
/// numeric order; round tabs are laid out in that order. The title of a
/// round is the bracket name of its first match. Pool and ungrouped matches
/// are skipped.
pub fn group_by_round(rows: &[MatchRecord]) -> Vec<RoundGroup<'_>> {
    let mut rounds: Vec<RoundGroup<'_>> = Vec::new();
    for row in rows {
        let Stage::Brackets { round, bracket_name } = &row.stage else {
            continue;
        };
        match rounds.iter_mut().find(|g| g.round == *round) {
            Some(group) => group.matches.push(row),
            None => rounds.push(RoundGroup {
                round: *round,
                title: bracket_name,
                matches: vec![row],
            }),
        }
    }
    rounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bracket, pool};

    #[test]
    fn empty_input_gives_empty_groups() {
        let groups = group_by_stage(&[]);
        assert!(groups.pools.is_empty());
        assert!(groups.brackets.is_empty());
        assert!(groups.ungrouped.is_empty());
        assert!(group_by_round(&[]).is_empty());
    }

    #[test]
    fn pool_names_are_sorted_regardless_of_input_order() {
        let rows = vec![
            pool("Thalassa", 13, "Airbenders", 9, "B"),
            pool("Stonefish", 11, "Hammers", 12, "A"),
        ];
        let groups = group_by_stage(&rows);
        assert_eq!(groups.pool_names(), vec!["A", "B"]);
    }

    #[test]
    fn rows_within_a_pool_keep_input_order() {
        let rows = vec![
            pool("T1", 1, "T2", 0, "A"),
            pool("T3", 1, "T4", 0, "B"),
            pool("T5", 1, "T6", 0, "A"),
            bracket("T1", 15, "T5", 13, 1, "Quarters"),
            pool("T7", 1, "T8", 0, "A"),
        ];
        let groups = group_by_stage(&rows);
        let a: Vec<_> = groups.pools["A"].iter().map(|m| m.team_a.as_str()).collect();
        assert_eq!(a, vec!["T1", "T5", "T7"]);
        assert_eq!(groups.pools["B"].len(), 1);
        assert_eq!(groups.brackets, vec![&rows[3]]);
    }

    #[test]
    fn rounds_follow_first_occurrence_not_numeric_order() {
        let rows = vec![
            bracket("A", 1, "B", 0, 2, "Semis"),
            bracket("C", 1, "D", 0, 2, "Semis"),
            bracket("E", 1, "F", 0, 1, "Quarters"),
            bracket("G", 1, "H", 0, 1, "Quarters"),
        ];
        let rounds = group_by_round(&rows);
        let order: Vec<_> = rounds.iter().map(|r| r.round).collect();
        assert_eq!(order, vec![2, 1]);
        assert_eq!(rounds[0].title, "Semis");
        assert_eq!(rounds[1].title, "Quarters");
        assert_eq!(rounds[1].matches.len(), 2);
    }

    #[test]
    fn round_title_comes_from_first_match_of_round() {
        let rows = vec![
            bracket("A", 1, "B", 0, 3, "Finals"),
            bracket("C", 1, "D", 0, 3, "3rd Place"),
        ];
        let rounds = group_by_round(&rows);
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].title, "Finals");
    }

    #[test]
    fn round_grouping_skips_pool_rows() {
        let rows = vec![
            pool("A", 1, "B", 0, "P"),
            bracket("C", 1, "D", 0, 1, "Quarters"),
            pool("E", 1, "F", 0, "P"),
        ];
        let rounds = group_by_round(&rows);
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].matches, vec![&rows[1]]);
    }

    #[test]
    fn rows_without_pool_or_round_are_kept_apart() {
        let mut rows = vec![
            pool("A", 1, "B", 0, "P"),
            pool("C", 1, "D", 0, "P"),
            bracket("E", 1, "F", 0, 1, "Quarters"),
            bracket("G", 1, "H", 0, 1, "Quarters"),
        ];
        rows[1].stage = Stage::Ungrouped(Phase::Pool);
        rows[3].stage = Stage::Ungrouped(Phase::Brackets);

        let groups = group_by_stage(&rows);
        assert_eq!(groups.pools["P"], vec![&rows[0]]);
        assert_eq!(groups.brackets, vec![&rows[2]]);
        assert_eq!(groups.ungrouped, vec![&rows[1], &rows[3]]);
        assert_eq!(groups.ungrouped_in(Phase::Pool), 1);
        assert_eq!(groups.ungrouped_in(Phase::Brackets), 1);

        let rounds = group_by_round(&rows);
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].matches, vec![&rows[2]]);
    }
}
