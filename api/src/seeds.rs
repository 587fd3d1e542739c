use crate::MatchRecord;
use std::collections::HashMap;

/// A single bracket matchup ready for the bracket view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    /// `"{round}-{position}"`, unique within a round.
    pub id: String,
    pub teams: [SeedTeam; 2],
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTeam {
    pub name: String,
    pub score: u32,
}

impl Seed {
    /// Index into `teams` of the higher score. `None` on a tie.
    pub fn winner(&self) -> Option<usize> {
        let [home, away] = &self.teams;
        match home.score.cmp(&away.score) {
            std::cmp::Ordering::Greater => Some(0),
            std::cmp::Ordering::Less => Some(1),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// One seed per match, in input order.
///
/// Positions are counted per round, so matches of different rounds may be
/// mixed in `matches`. Matches without a round are treated as round 0.
pub fn to_seeds(matches: &[&MatchRecord]) -> Vec<Seed> {
    let mut positions: HashMap<u32, usize> = HashMap::new();
    matches
        .iter()
        .map(|m| {
            let round = m.bracket_round().unwrap_or(0);
            let position = positions.entry(round).or_insert(0);
            let id = format!("{round}-{position}");
            *position += 1;
            Seed {
                id,
                teams: [
                    SeedTeam { name: m.team_a.clone(), score: m.score_a },
                    SeedTeam { name: m.team_b.clone(), score: m.score_b },
                ],
                video_url: m.video_url.clone(),
            }
        })
        .collect()
}
