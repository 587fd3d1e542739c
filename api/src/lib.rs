pub mod client;
pub mod error;
pub mod group;
pub mod seeds;
pub mod table;
pub mod wire;

pub use error::{ApiError, ApiResult, RecordError};
pub use group::{RoundGroup, StageGroups, group_by_round, group_by_stage};
pub use seeds::{Seed, SeedTeam, to_seeds};
pub use table::{SortKey, TableControls, view};

use chrono::NaiveDate;

const SHEETS_BASE: &str = "https://docs.google.com/spreadsheets/d";

// ---------------------------------------------------------------------------
// Domain types: validated model, independent of the JSON wire format
// ---------------------------------------------------------------------------

/// One entry of the tournaments index document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TournamentSummary {
    pub slug: String,
    pub name: String,
    /// Last day the tournament is considered current. Older entries are kept
    /// in the index but no longer refreshed by the data pipeline.
    pub expiry: Option<NaiveDate>,
}

impl TournamentSummary {
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry.is_some_and(|expiry| today > expiry)
    }
}

/// A fully loaded tournament: header plus every recorded match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tournament {
    pub metadata: TournamentMetadata,
    pub scores: Vec<MatchRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TournamentMetadata {
    pub slug: String,
    pub name: String,
    pub date: String,
    pub venue: String,
    pub division: String,
    pub sheet_id: Option<String>,
    pub photos_url: Option<String>,
    pub uc_url: Option<String>,
    pub rankings: Vec<RankEntry>,
    pub seedings: Vec<RankEntry>,
}

impl TournamentMetadata {
    /// Link to the spreadsheet the scores were exported from.
    pub fn sheet_url(&self) -> Option<String> {
        self.sheet_id
            .as_deref()
            .map(|id| format!("{SHEETS_BASE}/{id}/"))
    }

    /// Labelled rows for the tournament info card. Empty values are skipped.
    pub fn display_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(6);
        if let Some(url) = self.sheet_url() {
            fields.push(("source", url));
        }
        for (label, value) in [
            ("date", &self.date),
            ("venue", &self.venue),
            ("division", &self.division),
        ] {
            if !value.trim().is_empty() {
                fields.push((label, value.clone()));
            }
        }
        if let Some(url) = &self.photos_url {
            fields.push(("photos", url.clone()));
        }
        if let Some(url) = &self.uc_url {
            fields.push(("ultimate central", url.clone()));
        }
        fields
    }
}

/// A team's position in a ranking or seeding list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankEntry {
    pub rank: u32,
    pub team: String,
}

/// One played or scheduled game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub team_a: String,
    pub score_a: u32,
    pub team_b: String,
    pub score_b: u32,
    pub stage: Stage,
    pub time: Option<String>, // slot label from the schedule sheet, e.g. "09:30"
    pub video_url: Option<String>,
}

impl MatchRecord {
    pub fn is_bracket(&self) -> bool {
        self.stage.phase() == Phase::Brackets
    }

    pub fn pool_name(&self) -> Option<&str> {
        match &self.stage {
            Stage::Pool { pool_name } => Some(pool_name),
            _ => None,
        }
    }

    pub fn bracket_round(&self) -> Option<u32> {
        match self.stage {
            Stage::Brackets { round, .. } => Some(round),
            _ => None,
        }
    }

    /// True when `team` won this match on score. Draws have no winner.
    pub fn won_by(&self, team: &str) -> bool {
        if self.team_a == team {
            self.score_a > self.score_b
        } else if self.team_b == team {
            self.score_b > self.score_a
        } else {
            false
        }
    }
}

/// Tournament phase a match belongs to. Each grouped variant carries the
/// only grouping field that is meaningful for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Pool { pool_name: String },
    Brackets { round: u32, bracket_name: String },
    /// The sheet export names the phase but not the pool or round, as the
    /// score scraper does. Such rows are listed but never grouped.
    Ungrouped(Phase),
}

impl Stage {
    pub fn phase(&self) -> Phase {
        match self {
            Stage::Pool { .. } => Phase::Pool,
            Stage::Brackets { .. } => Phase::Brackets,
            Stage::Ungrouped(phase) => *phase,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.phase().as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pool,
    Brackets,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Pool => "pool",
            Phase::Brackets => "brackets",
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{MatchRecord, Stage};

    pub fn pool(team_a: &str, score_a: u32, team_b: &str, score_b: u32, pool: &str) -> MatchRecord {
        MatchRecord {
            team_a: team_a.into(),
            score_a,
            team_b: team_b.into(),
            score_b,
            stage: Stage::Pool { pool_name: pool.into() },
            time: None,
            video_url: None,
        }
    }

    pub fn bracket(
        team_a: &str,
        score_a: u32,
        team_b: &str,
        score_b: u32,
        round: u32,
        name: &str,
    ) -> MatchRecord {
        MatchRecord {
            team_a: team_a.into(),
            score_a,
            team_b: team_b.into(),
            score_b,
            stage: Stage::Brackets { round, bracket_name: name.into() },
            time: None,
            video_url: None,
        }
    }
}
