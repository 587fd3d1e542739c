//! Wire types for the static tournament documents.
//!
//! Index:  `{base}/tournaments.json`  -> `[IndexEntry]`
//! Detail: `{base}/{slug}.json`       -> `TournamentDocument`
//!
//! Everything the sheet export may omit is optional here; `Tournament::try_from`
//! turns the document into validated domain types or refuses it.
use crate::error::RecordError;
use crate::{MatchRecord, Phase, RankEntry, Stage, Tournament, TournamentMetadata, TournamentSummary};
use chrono::NaiveDate;
use log::warn;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Deserialize, Default, Debug, Clone)]
pub struct IndexEntry {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub expiry: Option<NaiveDate>,
}

impl From<IndexEntry> for TournamentSummary {
    fn from(entry: IndexEntry) -> Self {
        Self { slug: entry.slug, name: entry.name, expiry: entry.expiry }
    }
}

#[derive(Deserialize, Default, Debug, Clone)]
pub struct TournamentDocument {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub sheet_id: Option<String>,
    #[serde(default, alias = "photos_url")]
    pub photos: Option<String>,
    #[serde(default, alias = "uc")]
    pub uc_url: Option<String>,
    #[serde(default)]
    pub rankings: Vec<RawRank>,
    #[serde(default)]
    pub seedings: Vec<RawRank>,
    /// Older exports store the match list under `data`.
    #[serde(default, alias = "data")]
    pub scores: Vec<RawMatch>,
}

#[derive(Deserialize, Default, Debug, Clone)]
pub struct RawRank {
    pub rank: u32,
    pub team: String,
}

#[derive(Deserialize, Default, Debug, Clone)]
pub struct RawMatch {
    pub team_a: Option<String>,
    pub score_a: Option<u32>,
    pub team_b: Option<String>,
    pub score_b: Option<u32>,
    pub stage: Option<String>,
    pub pool_name: Option<String>,
    pub bracket_round: Option<u32>,
    pub bracket_name: Option<String>,
    #[serde(alias = "video_url")]
    pub videos: Option<String>,
    pub time: Option<String>,
}

// ---------------------------------------------------------------------------
// Mapping: wire types -> domain types
// ---------------------------------------------------------------------------

impl TryFrom<TournamentDocument> for Tournament {
    type Error = RecordError;

    fn try_from(document: TournamentDocument) -> Result<Self, Self::Error> {
        let TournamentDocument {
            slug,
            name,
            date,
            venue,
            division,
            sheet_id,
            photos,
            uc_url,
            rankings,
            seedings,
            scores,
        } = document;

        let scores = scores
            .into_iter()
            .enumerate()
            .map(|(index, raw)| map_match(index, raw))
            .collect::<Result<Vec<MatchRecord>, _>>()?;

        let ungrouped = scores.iter().filter(|m| matches!(m.stage, Stage::Ungrouped(_))).count();
        if ungrouped > 0 {
            warn!("{slug}: {ungrouped} of {} matches have no pool or round", scores.len());
        }

        let metadata = TournamentMetadata {
            slug,
            name,
            date,
            venue,
            division,
            sheet_id: non_blank(sheet_id),
            photos_url: non_blank(photos),
            uc_url: non_blank(uc_url),
            rankings: map_ranks("rankings", rankings)?,
            seedings: map_ranks("seedings", seedings)?,
        };

        Ok(Tournament { metadata, scores })
    }
}

fn map_match(index: usize, raw: RawMatch) -> Result<MatchRecord, RecordError> {
    let missing = |field| RecordError::MissingField { index, field };

    let team_a = non_blank(raw.team_a).ok_or_else(|| missing("team_a"))?;
    let team_b = non_blank(raw.team_b).ok_or_else(|| missing("team_b"))?;
    let score_a = raw.score_a.ok_or_else(|| missing("score_a"))?;
    let score_b = raw.score_b.ok_or_else(|| missing("score_b"))?;

    if team_a == team_b {
        return Err(RecordError::SameTeam { index, team: team_a });
    }

    // A phase without its grouping fields is still a valid row.
    let stage = match raw.stage.as_deref().map(str::trim) {
        Some("pool") => match non_blank(raw.pool_name) {
            Some(pool_name) => Stage::Pool { pool_name },
            None => Stage::Ungrouped(Phase::Pool),
        },
        Some("brackets") => match (raw.bracket_round, non_blank(raw.bracket_name)) {
            (Some(round), Some(bracket_name)) => Stage::Brackets { round, bracket_name },
            _ => Stage::Ungrouped(Phase::Brackets),
        },
        Some(other) => {
            return Err(RecordError::UnknownStage { index, stage: other.to_string() });
        }
        None => return Err(missing("stage")),
    };

    Ok(MatchRecord {
        team_a,
        score_a,
        team_b,
        score_b,
        stage,
        time: non_blank(raw.time),
        video_url: non_blank(raw.videos),
    })
}

fn map_ranks(list: &'static str, raw: Vec<RawRank>) -> Result<Vec<RankEntry>, RecordError> {
    let mut seen = HashSet::with_capacity(raw.len());
    raw.into_iter()
        .enumerate()
        .map(|(index, r)| {
            if r.rank == 0 {
                return Err(RecordError::ZeroRank { list, index });
            }
            if !seen.insert(r.rank) {
                return Err(RecordError::DuplicateRank { list, index, rank: r.rank });
            }
            Ok(RankEntry { rank: r.rank, team: r.team.trim().to_string() })
        })
        .collect()
}

/// Sheet exports write blank cells as empty strings; treat them as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Result<Tournament, RecordError> {
        let document: TournamentDocument = serde_json::from_str(json).expect("document should decode");
        Tournament::try_from(document)
    }

    #[test]
    fn full_document_maps_to_domain() {
        let t = decode(
            r#"{
                "slug": "regionals-south",
                "name": "Regionals South",
                "date": "14-15 Jan 2023",
                "venue": "Bengaluru",
                "division": "Mixed",
                "sheet_id": "18eJUX",
                "photos": "",
                "rankings": [{"rank": 1, "team": "Thalassa"}, {"rank": 2, "team": "Airbenders"}],
                "scores": [
                    {"team_a": "Thalassa", "score_a": 13, "team_b": "Airbenders", "score_b": 9,
                     "stage": "pool", "pool_name": "A", "videos": null, "time": "09:30"},
                    {"team_a": "Thalassa", "score_a": 15, "team_b": "Airbenders", "score_b": 11,
                     "stage": "brackets", "bracket_round": 4, "bracket_name": "Finals",
                     "videos": "https://youtu.be/final"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(t.metadata.slug, "regionals-south");
        assert_eq!(t.metadata.photos_url, None, "blank photos link is absent");
        assert_eq!(t.metadata.rankings.len(), 2);
        assert!(t.metadata.seedings.is_empty());
        assert_eq!(t.scores.len(), 2);
        assert_eq!(t.scores[0].pool_name(), Some("A"));
        assert_eq!(t.scores[0].time.as_deref(), Some("09:30"));
        assert_eq!(t.scores[1].bracket_round(), Some(4));
        assert_eq!(t.scores[1].video_url.as_deref(), Some("https://youtu.be/final"));
    }

    #[test]
    fn legacy_data_key_is_accepted() {
        let t = decode(
            r#"{"slug": "s", "name": "S", "data": [
                {"team_a": "A", "score_a": 1, "team_b": "B", "score_b": 0, "stage": "pool", "pool_name": "P"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(t.scores.len(), 1);
    }

    #[test]
    fn grouping_field_of_other_stage_is_ignored() {
        let t = decode(
            r#"{"slug": "s", "name": "S", "scores": [
                {"team_a": "A", "score_a": 1, "team_b": "B", "score_b": 0,
                 "stage": "pool", "pool_name": "P", "bracket_round": 2, "bracket_name": "Quarters"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(t.scores[0].stage, Stage::Pool { pool_name: "P".into() });
    }

    #[test]
    fn missing_team_is_refused_with_index() {
        let err = decode(
            r#"{"slug": "s", "name": "S", "scores": [
                {"team_a": "A", "score_a": 1, "team_b": "B", "score_b": 0, "stage": "pool", "pool_name": "P"},
                {"team_a": "A", "score_a": 1, "score_b": 0, "stage": "pool", "pool_name": "P"}
            ]}"#,
        )
        .unwrap_err();
        assert_eq!(err, RecordError::MissingField { index: 1, field: "team_b" });
    }

    #[test]
    fn scraped_rows_without_grouping_fields_load_ungrouped() {
        let t = decode(
            r#"{"slug": "s", "name": "S", "expiry": "2023-01-31", "data": [
                {"team_a": "Thalassa", "score_a": 13, "team_b": "Airbenders", "score_b": 9,
                 "stage": "pool", "time": "09:30"},
                {"team_a": "Thalassa", "score_a": 15, "team_b": "Hammers", "score_b": 11,
                 "stage": "brackets", "time": ""}
            ]}"#,
        )
        .unwrap();
        assert_eq!(t.scores.len(), 2);
        assert_eq!(t.scores[0].stage, Stage::Ungrouped(Phase::Pool));
        assert_eq!(t.scores[0].time.as_deref(), Some("09:30"));
        assert_eq!(t.scores[1].stage, Stage::Ungrouped(Phase::Brackets));
        assert_eq!(t.scores[1].time, None);
    }

    #[test]
    fn partial_grouping_fields_leave_row_ungrouped() {
        let t = decode(
            r#"{"slug": "s", "name": "S", "scores": [
                {"team_a": "A", "score_a": 1, "team_b": "B", "score_b": 0, "stage": "pool", "pool_name": " "},
                {"team_a": "A", "score_a": 1, "team_b": "B", "score_b": 0, "stage": "brackets", "bracket_name": "Finals"},
                {"team_a": "A", "score_a": 1, "team_b": "B", "score_b": 0, "stage": "brackets", "bracket_round": 2}
            ]}"#,
        )
        .unwrap();
        assert_eq!(t.scores[0].stage, Stage::Ungrouped(Phase::Pool));
        assert_eq!(t.scores[1].stage, Stage::Ungrouped(Phase::Brackets));
        assert_eq!(t.scores[2].stage, Stage::Ungrouped(Phase::Brackets));
    }

    #[test]
    fn scraped_row_without_score_is_still_refused() {
        let err = decode(
            r#"{"slug": "s", "name": "S", "data": [
                {"team_a": "Thalassa", "team_b": "Airbenders", "score_b": 9, "stage": "pool", "time": "09:30"}
            ]}"#,
        )
        .unwrap_err();
        assert_eq!(err, RecordError::MissingField { index: 0, field: "score_a" });
    }

    #[test]
    fn unknown_stage_and_self_match_are_refused() {
        let err = decode(
            r#"{"slug": "s", "name": "S", "scores": [
                {"team_a": "A", "score_a": 1, "team_b": "B", "score_b": 0, "stage": "friendly"}
            ]}"#,
        )
        .unwrap_err();
        assert_eq!(err, RecordError::UnknownStage { index: 0, stage: "friendly".into() });

        let err = decode(
            r#"{"slug": "s", "name": "S", "scores": [
                {"team_a": "A", "score_a": 1, "team_b": "A", "score_b": 0, "stage": "pool", "pool_name": "P"}
            ]}"#,
        )
        .unwrap_err();
        assert_eq!(err, RecordError::SameTeam { index: 0, team: "A".into() });
    }

    #[test]
    fn negative_score_fails_to_decode() {
        let result = serde_json::from_str::<TournamentDocument>(
            r#"{"slug": "s", "name": "S", "scores": [{"team_a": "A", "score_a": -1}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_and_zero_ranks_are_refused() {
        let err = decode(
            r#"{"slug": "s", "name": "S", "seedings": [{"rank": 1, "team": "A"}, {"rank": 1, "team": "B"}]}"#,
        )
        .unwrap_err();
        assert_eq!(err, RecordError::DuplicateRank { list: "seedings", index: 1, rank: 1 });

        let err = decode(r#"{"slug": "s", "name": "S", "rankings": [{"rank": 0, "team": "A"}]}"#)
            .unwrap_err();
        assert_eq!(err, RecordError::ZeroRank { list: "rankings", index: 0 });
    }

    #[test]
    fn empty_document_is_valid() {
        let t = decode(r#"{"slug": "s", "name": "S"}"#).unwrap();
        assert!(t.scores.is_empty());
        assert!(t.metadata.rankings.is_empty());
    }

    #[test]
    fn index_entry_parses_optional_expiry() {
        let entries: Vec<IndexEntry> = serde_json::from_str(
            r#"[{"slug": "a", "name": "A", "expiry": "2023-01-31"}, {"slug": "b", "name": "B"}]"#,
        )
        .unwrap();
        let summaries: Vec<TournamentSummary> = entries.into_iter().map(Into::into).collect();
        assert_eq!(summaries[0].expiry, NaiveDate::from_ymd_opt(2023, 1, 31));
        assert_eq!(summaries[1].expiry, None);
    }
}
