use crate::MatchRecord;
use std::borrow::Cow;
use std::cmp::Ordering;

/// Reads the display text of one column from a match.
pub type FieldAccessor = for<'r> fn(&'r MatchRecord) -> Cow<'r, str>;

/// Columns a match table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    TeamA,
    ScoreA,
    ScoreB,
    TeamB,
    Stage,
}

impl SortKey {
    /// Column order of the match tables.
    pub const ALL: [SortKey; 5] = [
        SortKey::TeamA,
        SortKey::ScoreA,
        SortKey::ScoreB,
        SortKey::TeamB,
        SortKey::Stage,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::TeamA | SortKey::TeamB => "Team",
            SortKey::ScoreA | SortKey::ScoreB => "Score",
            SortKey::Stage => "Stage",
        }
    }

    pub fn accessor(self) -> FieldAccessor {
        match self {
            SortKey::TeamA => team_a,
            SortKey::ScoreA => score_a,
            SortKey::ScoreB => score_b,
            SortKey::TeamB => team_b,
            SortKey::Stage => stage,
        }
    }

    pub fn text(self, row: &MatchRecord) -> Cow<'_, str> {
        (self.accessor())(row)
    }
}

fn team_a(row: &MatchRecord) -> Cow<'_, str> {
    Cow::Borrowed(&row.team_a)
}

fn team_b(row: &MatchRecord) -> Cow<'_, str> {
    Cow::Borrowed(&row.team_b)
}

// Scores are compared in their decimal string form, so "10" sorts before "2".
fn score_a(row: &MatchRecord) -> Cow<'_, str> {
    Cow::Owned(row.score_a.to_string())
}

fn score_b(row: &MatchRecord) -> Cow<'_, str> {
    Cow::Owned(row.score_b.to_string())
}

fn stage(row: &MatchRecord) -> Cow<'_, str> {
    Cow::Borrowed(row.stage.as_str())
}

/// Sort and search settings of one table view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableControls {
    pub sort_key: Option<SortKey>,
    pub reversed: bool,
    pub search: String,
}

impl TableControls {
    /// Selecting the active column again flips the direction; a new column
    /// starts ascending.
    pub fn toggle(&mut self, key: SortKey) {
        self.reversed = self.sort_key == Some(key) && !self.reversed;
        self.sort_key = Some(key);
    }

    pub fn apply<'a, I>(&self, rows: I) -> Vec<&'a MatchRecord>
    where
        I: IntoIterator<Item = &'a MatchRecord>,
    {
        view(rows, self.sort_key, self.reversed, &self.search)
    }

    /// `Some(reversed)` when the table is sorted by `key`.
    pub fn direction(&self, key: SortKey) -> Option<bool> {
        (self.sort_key == Some(key)).then_some(self.reversed)
    }
}

/// Filter `rows` by team name and optionally sort them by one column.
///
/// `search` is trimmed and matched case-insensitively as a substring of
/// either team; an empty search keeps every row. Sorting compares the text
/// of the `sort_key` column with [`collate`], descending when `reversed`.
/// The input is never modified; the result borrows from it.
pub fn view<'a, I>(
    rows: I,
    sort_key: Option<SortKey>,
    reversed: bool,
    search: &str,
) -> Vec<&'a MatchRecord>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let query = search.trim().to_lowercase();
    let mut out: Vec<&MatchRecord> = rows
        .into_iter()
        .filter(|row| matches_search(row, &query))
        .collect();

    if let Some(key) = sort_key {
        let text = key.accessor();
        out.sort_by(|a, b| {
            if reversed {
                collate(&text(b), &text(a))
            } else {
                collate(&text(a), &text(b))
            }
        });
    }
    out
}

fn matches_search(row: &MatchRecord, query: &str) -> bool {
    query.is_empty()
        || row.team_a.to_lowercase().contains(query)
        || row.team_b.to_lowercase().contains(query)
}

/// Locale-style string comparison: case-insensitive first, lowercase before
/// uppercase on ties.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}
