use crate::app::MenuItem;
use scores_api::{SortKey, TableControls, Tournament, TournamentSummary};

/// Columns of the all-matches table.
pub const MATCH_COLUMNS: [SortKey; 5] = SortKey::ALL;
/// Columns of a pool table; every row has the same stage.
pub const POOL_COLUMNS: [SortKey; 4] = [SortKey::TeamA, SortKey::ScoreA, SortKey::ScoreB, SortKey::TeamB];

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub index: IndexState,
    pub picker: PickerState,
    pub tournament: TournamentState,
    pub matches: TableViewState,
    /// True while keystrokes go to the match search box.
    pub editing_search: bool,
    pub pools: PoolsState,
    pub bracket: BracketState,
    /// Last failed background refresh; the displayed data is still valid.
    pub last_error: Option<String>,
}

impl AppState {
    /// Forget everything derived from the previous tournament.
    pub fn reset_views(&mut self) {
        self.matches = TableViewState::default();
        self.editing_search = false;
        self.pools = PoolsState::default();
        self.bracket = BracketState::default();
        self.last_error = None;
    }
}

// ---------------------------------------------------------------------------
// Tournament index / picker
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub enum IndexState {
    #[default]
    Loading,
    Loaded(Vec<TournamentSummary>),
    Failed(String),
}

impl IndexState {
    pub fn tournaments(&self) -> &[TournamentSummary] {
        match self {
            IndexState::Loaded(list) => list,
            _ => &[],
        }
    }
}

#[derive(Debug, Default)]
pub struct PickerState {
    pub open: bool,
    pub selected: usize,
}

impl PickerState {
    pub fn down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Selected tournament
// ---------------------------------------------------------------------------

/// What the dashboard shows for the current selection. A failed load is its
/// own state so it never looks like a tournament without matches.
#[derive(Debug, Default)]
pub enum TournamentState {
    #[default]
    NotSelected,
    Loading { slug: String },
    /// `slug` is the requested one; the document's own slug may differ.
    Loaded { slug: String, tournament: Tournament },
    Failed { slug: String, message: String },
}

impl TournamentState {
    pub fn active_slug(&self) -> Option<&str> {
        match self {
            TournamentState::NotSelected => None,
            TournamentState::Loading { slug }
            | TournamentState::Loaded { slug, .. }
            | TournamentState::Failed { slug, .. } => Some(slug),
        }
    }

    pub fn loaded(&self) -> Option<&Tournament> {
        match self {
            TournamentState::Loaded { tournament, .. } => Some(tournament),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Table views
// ---------------------------------------------------------------------------

/// Sort/search settings plus cursor position of one match table.
#[derive(Debug, Default)]
pub struct TableViewState {
    pub controls: TableControls,
    /// Index into the table's column list.
    pub column: usize,
    pub selected_row: usize,
}

impl TableViewState {
    pub fn column_next(&mut self, columns: &[SortKey]) {
        if self.column + 1 < columns.len() {
            self.column += 1;
        }
    }

    pub fn column_prev(&mut self) {
        self.column = self.column.saturating_sub(1);
    }

    pub fn sort_by_cursor(&mut self, columns: &[SortKey]) {
        if let Some(key) = columns.get(self.column) {
            self.controls.toggle(*key);
            self.selected_row = 0;
        }
    }

    pub fn row_down(&mut self, len: usize) {
        if self.selected_row + 1 < len {
            self.selected_row += 1;
        }
    }

    pub fn row_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    pub fn push_search(&mut self, c: char) {
        self.controls.search.push(c);
        self.selected_row = 0;
    }

    pub fn pop_search(&mut self) {
        self.controls.search.pop();
        self.selected_row = 0;
    }
}

#[derive(Debug, Default)]
pub struct PoolsState {
    pub selected_pool: usize,
    /// Shared by every pool; switching pools keeps the sort order.
    pub table: TableViewState,
}

impl PoolsState {
    pub fn next_pool(&mut self, pool_count: usize) {
        if self.selected_pool + 1 < pool_count {
            self.selected_pool += 1;
            self.table.selected_row = 0;
        }
    }

    pub fn prev_pool(&mut self) {
        if self.selected_pool > 0 {
            self.selected_pool -= 1;
            self.table.selected_row = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// Bracket view
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct BracketState {
    /// Index into the round tabs, which follow first-occurrence order.
    pub selected_round: usize,
    pub selected_seed: usize,
}

impl BracketState {
    pub fn next_round(&mut self, round_count: usize) {
        if self.selected_round + 1 < round_count {
            self.selected_round += 1;
            self.selected_seed = 0;
        }
    }

    pub fn prev_round(&mut self) {
        if self.selected_round > 0 {
            self.selected_round -= 1;
            self.selected_seed = 0;
        }
    }

    pub fn seed_down(&mut self, seed_count: usize) {
        if self.selected_seed + 1 < seed_count {
            self.selected_seed += 1;
        }
    }

    pub fn seed_up(&mut self) {
        self.selected_seed = self.selected_seed.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorting_by_cursor_toggles_direction() {
        let mut table = TableViewState::default();
        table.column_next(&POOL_COLUMNS);
        table.column_next(&POOL_COLUMNS);
        table.column_next(&POOL_COLUMNS);
        table.column_next(&POOL_COLUMNS);
        assert_eq!(table.column, 3, "cursor stops at the last column");

        table.selected_row = 5;
        table.sort_by_cursor(&POOL_COLUMNS);
        assert_eq!(table.controls.direction(SortKey::TeamB), Some(false));
        assert_eq!(table.selected_row, 0);
        table.sort_by_cursor(&POOL_COLUMNS);
        assert_eq!(table.controls.direction(SortKey::TeamB), Some(true));

        table.column_prev();
        table.sort_by_cursor(&POOL_COLUMNS);
        assert_eq!(table.controls.direction(SortKey::ScoreB), Some(false));
    }

    #[test]
    fn search_editing_resets_row() {
        let mut table = TableViewState { selected_row: 3, ..Default::default() };
        table.push_search('t');
        table.push_search('h');
        assert_eq!(table.controls.search, "th");
        assert_eq!(table.selected_row, 0);
        table.pop_search();
        assert_eq!(table.controls.search, "t");
    }

    #[test]
    fn bracket_navigation_is_clamped() {
        let mut bracket = BracketState::default();
        bracket.prev_round();
        assert_eq!(bracket.selected_round, 0);
        bracket.seed_down(2);
        bracket.seed_down(2);
        assert_eq!(bracket.selected_seed, 1);
        bracket.next_round(2);
        assert_eq!((bracket.selected_round, bracket.selected_seed), (1, 0));
        bracket.next_round(2);
        assert_eq!(bracket.selected_round, 1);
    }

    #[test]
    fn active_slug_follows_state() {
        assert_eq!(TournamentState::NotSelected.active_slug(), None);
        let loading = TournamentState::Loading { slug: "a".into() };
        assert_eq!(loading.active_slug(), Some("a"));
        assert!(loading.loaded().is_none());
        let failed = TournamentState::Failed { slug: "b".into(), message: "gone".into() };
        assert_eq!(failed.active_slug(), Some("b"));
    }
}
