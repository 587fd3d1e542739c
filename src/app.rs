use crate::state::app_settings::AppSettings;
use crate::state::app_state::{
    AppState, IndexState, MATCH_COLUMNS, POOL_COLUMNS, TournamentState,
};
use log::{debug, warn};
use scores_api::{Tournament, TournamentSummary, group_by_round, group_by_stage};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Matches,
    Pools,
    Bracket,
    Rankings,
    Info,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn with_settings(settings: AppSettings) -> Self {
        let app = Self { state: AppState::default(), settings };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers: called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_index_loaded(&mut self, tournaments: Vec<TournamentSummary>) {
        let current = self.state.tournament.active_slug();
        self.state.picker.selected = current
            .and_then(|slug| tournaments.iter().position(|t| t.slug == slug))
            .unwrap_or(0);
        self.state.index = IndexState::Loaded(tournaments);
        if current.is_none() {
            self.state.picker.open = true;
        }
    }

    pub fn on_index_failed(&mut self, message: String) {
        self.state.index = IndexState::Failed(message);
    }

    /// Apply a loaded tournament if it still belongs to the active selection.
    /// Returns false when the response was stale and has been dropped.
    pub fn on_tournament_loaded(&mut self, slug: String, tournament: Tournament) -> bool {
        if self.state.tournament.active_slug() != Some(slug.as_str()) {
            debug!("dropping stale response for {slug}");
            return false;
        }
        self.state.last_error = None;
        self.state.tournament = TournamentState::Loaded { slug, tournament };
        self.clamp_selections();
        true
    }

    pub fn on_tournament_failed(&mut self, slug: String, message: String) -> bool {
        if self.state.tournament.active_slug() != Some(slug.as_str()) {
            debug!("dropping stale failure for {slug}");
            return false;
        }
        self.state.tournament = TournamentState::Failed { slug, message };
        true
    }

    /// A failed refresh keeps the data already on screen.
    pub fn on_refresh_failed(&mut self, slug: String, message: String) {
        if self.state.tournament.active_slug() != Some(slug.as_str()) {
            return;
        }
        warn!("refresh of {slug} failed: {message}");
        if self.state.tournament.loaded().is_some() {
            self.state.last_error = Some(message);
        } else {
            self.state.tournament = TournamentState::Failed { slug, message };
        }
    }

    // -----------------------------------------------------------------------
    // Tournament selection
    // -----------------------------------------------------------------------

    /// Start showing `slug`. The caller sends the matching load request.
    pub fn select_tournament(&mut self, slug: String) {
        self.state.reset_views();
        self.settings.last_tournament = Some(slug.clone());
        self.settings.save();
        self.state.tournament = TournamentState::Loading { slug };
    }

    /// Tournament to load at startup, if any.
    pub fn startup_selection(&self) -> Option<String> {
        self.settings.last_tournament.clone()
    }

    /// Slug to reload on a refresh tick; only a tournament already on screen
    /// is refreshed.
    pub fn refresh_target(&self) -> Option<String> {
        match &self.state.tournament {
            TournamentState::Loaded { slug, .. } => Some(slug.clone()),
            _ => None,
        }
    }

    pub fn open_picker(&mut self) {
        self.state.picker.open = true;
        self.state.editing_search = false;
    }

    pub fn close_picker(&mut self) {
        self.state.picker.open = false;
    }

    pub fn picker_down(&mut self) {
        let len = self.state.index.tournaments().len();
        self.state.picker.down(len);
    }

    pub fn picker_up(&mut self) {
        self.state.picker.up();
    }

    /// Select the highlighted index entry. Returns the slug to load.
    pub fn picker_confirm(&mut self) -> Option<String> {
        let slug = self
            .state
            .index
            .tournaments()
            .get(self.state.picker.selected)?
            .slug
            .clone();
        self.state.picker.open = false;
        self.select_tournament(slug.clone());
        Some(slug)
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.editing_search = false;
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
        self.settings.save();
    }

    // -----------------------------------------------------------------------
    // Matches table
    // -----------------------------------------------------------------------

    pub fn start_search(&mut self) {
        self.state.editing_search = true;
    }

    pub fn finish_search(&mut self) {
        self.state.editing_search = false;
    }

    pub fn matches_column_next(&mut self) {
        self.state.matches.column_next(&MATCH_COLUMNS);
    }

    pub fn matches_column_prev(&mut self) {
        self.state.matches.column_prev();
    }

    pub fn matches_sort(&mut self) {
        self.state.matches.sort_by_cursor(&MATCH_COLUMNS);
    }

    pub fn matches_row_down(&mut self) {
        let len = self.visible_match_count();
        self.state.matches.row_down(len);
    }

    pub fn matches_row_up(&mut self) {
        self.state.matches.row_up();
    }

    fn visible_match_count(&self) -> usize {
        self.state
            .tournament
            .loaded()
            .map(|t| self.state.matches.controls.apply(&t.scores).len())
            .unwrap_or(0)
    }

    // -----------------------------------------------------------------------
    // Pools
    // -----------------------------------------------------------------------

    pub fn pools_next(&mut self) {
        let count = self.pool_sizes().len();
        self.state.pools.next_pool(count);
    }

    pub fn pools_prev(&mut self) {
        self.state.pools.prev_pool();
    }

    pub fn pools_column_next(&mut self) {
        self.state.pools.table.column_next(&POOL_COLUMNS);
    }

    pub fn pools_column_prev(&mut self) {
        self.state.pools.table.column_prev();
    }

    pub fn pools_sort(&mut self) {
        self.state.pools.table.sort_by_cursor(&POOL_COLUMNS);
    }

    pub fn pools_row_down(&mut self) {
        let len = self
            .pool_sizes()
            .get(self.state.pools.selected_pool)
            .copied()
            .unwrap_or(0);
        self.state.pools.table.row_down(len);
    }

    pub fn pools_row_up(&mut self) {
        self.state.pools.table.row_up();
    }

    /// Match count per pool, in pool-name order.
    fn pool_sizes(&self) -> Vec<usize> {
        self.state
            .tournament
            .loaded()
            .map(|t| group_by_stage(&t.scores).pools.values().map(Vec::len).collect())
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Bracket
    // -----------------------------------------------------------------------

    pub fn bracket_next_round(&mut self) {
        let count = self.round_sizes().len();
        self.state.bracket.next_round(count);
    }

    pub fn bracket_prev_round(&mut self) {
        self.state.bracket.prev_round();
    }

    pub fn bracket_seed_down(&mut self) {
        let len = self
            .round_sizes()
            .get(self.state.bracket.selected_round)
            .copied()
            .unwrap_or(0);
        self.state.bracket.seed_down(len);
    }

    pub fn bracket_seed_up(&mut self) {
        self.state.bracket.seed_up();
    }

    fn round_sizes(&self) -> Vec<usize> {
        self.state
            .tournament
            .loaded()
            .map(|t| group_by_round(&t.scores).iter().map(|r| r.matches.len()).collect())
            .unwrap_or_default()
    }

    /// Keep cursors inside the data after a refresh shrank it.
    fn clamp_selections(&mut self) {
        let pools = self.pool_sizes();
        let pool = &mut self.state.pools;
        pool.selected_pool = pool.selected_pool.min(pools.len().saturating_sub(1));
        let rows = pools.get(pool.selected_pool).copied().unwrap_or(0);
        pool.table.selected_row = pool.table.selected_row.min(rows.saturating_sub(1));

        let rounds = self.round_sizes();
        let bracket = &mut self.state.bracket;
        bracket.selected_round = bracket.selected_round.min(rounds.len().saturating_sub(1));
        let seeds = rounds.get(bracket.selected_round).copied().unwrap_or(0);
        bracket.selected_seed = bracket.selected_seed.min(seeds.saturating_sub(1));

        let matches = self.visible_match_count();
        let view = &mut self.state.matches;
        view.selected_row = view.selected_row.min(matches.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scores_api::{MatchRecord, Stage, TournamentMetadata};

    fn app() -> App {
        App::with_settings(AppSettings::default())
    }

    fn tournament(slug: &str, pools: &[&str]) -> Tournament {
        Tournament {
            metadata: TournamentMetadata {
                slug: slug.into(),
                name: slug.to_uppercase(),
                ..Default::default()
            },
            scores: pools
                .iter()
                .enumerate()
                .map(|(i, pool)| MatchRecord {
                    team_a: format!("Team {i}"),
                    score_a: 13,
                    team_b: format!("Team {}", i + 100),
                    score_b: 7,
                    stage: Stage::Pool { pool_name: (*pool).into() },
                    time: None,
                    video_url: None,
                })
                .collect(),
        }
    }

    fn summary(slug: &str) -> TournamentSummary {
        TournamentSummary { slug: slug.into(), name: slug.into(), expiry: None }
    }

    // `select_tournament` persists the slug; keep tests off the real config dir.
    fn select(app: &mut App, slug: &str) {
        app.state.reset_views();
        app.state.tournament = TournamentState::Loading { slug: slug.into() };
    }

    #[test]
    fn late_response_for_previous_selection_is_dropped() {
        let mut app = app();
        select(&mut app, "first");
        select(&mut app, "second");

        assert!(!app.on_tournament_loaded("first".into(), tournament("first", &["A"])));
        assert!(matches!(app.state.tournament, TournamentState::Loading { ref slug } if slug == "second"));

        assert!(app.on_tournament_loaded("second".into(), tournament("second", &["A"])));
        assert_eq!(app.state.tournament.loaded().unwrap().metadata.slug, "second");

        assert!(!app.on_tournament_loaded("first".into(), tournament("first", &["B"])));
        assert_eq!(app.state.tournament.loaded().unwrap().metadata.slug, "second");
    }

    #[test]
    fn stale_failure_does_not_replace_current_selection() {
        let mut app = app();
        select(&mut app, "first");
        select(&mut app, "second");
        assert!(!app.on_tournament_failed("first".into(), "boom".into()));
        assert!(matches!(app.state.tournament, TournamentState::Loading { .. }));

        assert!(app.on_tournament_failed("second".into(), "boom".into()));
        assert!(matches!(app.state.tournament, TournamentState::Failed { ref message, .. } if message == "boom"));
    }

    #[test]
    fn failed_refresh_keeps_loaded_data() {
        let mut app = app();
        select(&mut app, "t");
        app.on_tournament_loaded("t".into(), tournament("t", &["A", "B"]));
        assert_eq!(app.refresh_target().as_deref(), Some("t"));

        app.on_refresh_failed("t".into(), "timeout".into());
        assert!(app.state.tournament.loaded().is_some());
        assert_eq!(app.state.last_error.as_deref(), Some("timeout"));

        app.on_tournament_loaded("t".into(), tournament("t", &["A"]));
        assert_eq!(app.state.last_error, None);
    }

    #[test]
    fn no_refresh_while_loading_or_failed() {
        let mut app = app();
        assert_eq!(app.refresh_target(), None);
        select(&mut app, "t");
        assert_eq!(app.refresh_target(), None);
        app.on_tournament_failed("t".into(), "gone".into());
        assert_eq!(app.refresh_target(), None);
    }

    #[test]
    fn index_opens_picker_when_nothing_is_selected() {
        let mut app = app();
        app.on_index_loaded(vec![summary("a"), summary("b")]);
        assert!(app.state.picker.open);
        app.picker_down();
        app.picker_down();
        assert_eq!(app.state.picker.selected, 1);
    }

    #[test]
    fn index_points_picker_at_current_selection() {
        let mut app = app();
        select(&mut app, "b");
        app.on_index_loaded(vec![summary("a"), summary("b")]);
        assert!(!app.state.picker.open);
        assert_eq!(app.state.picker.selected, 1);
    }

    #[test]
    fn refresh_clamps_cursors_to_smaller_data() {
        let mut app = app();
        select(&mut app, "t");
        app.on_tournament_loaded("t".into(), tournament("t", &["A", "B", "C"]));
        app.pools_next();
        app.pools_next();
        assert_eq!(app.state.pools.selected_pool, 2);

        app.on_tournament_loaded("t".into(), tournament("t", &["A"]));
        assert_eq!(app.state.pools.selected_pool, 0);
    }

    #[test]
    fn refresh_clamps_row_and_seed_within_smaller_groups() {
        let mut app = app();
        select(&mut app, "t");
        app.on_tournament_loaded("t".into(), tournament("t", &["A", "A", "A", "B"]));
        app.pools_row_down();
        app.pools_row_down();
        assert_eq!(app.state.pools.table.selected_row, 2);

        let mut bracket_rows = tournament("t", &["A"]);
        for i in 0..4 {
            let mut m = bracket_rows.scores[0].clone();
            m.team_a = format!("Seed {i}");
            m.stage = Stage::Brackets { round: 1, bracket_name: "Quarters".into() };
            bracket_rows.scores.push(m);
        }
        app.on_tournament_loaded("t".into(), bracket_rows);
        app.bracket_seed_down();
        app.bracket_seed_down();
        app.bracket_seed_down();
        assert_eq!(app.state.bracket.selected_seed, 3);

        let mut smaller = tournament("t", &["A", "B"]);
        let mut semi = smaller.scores[0].clone();
        semi.stage = Stage::Brackets { round: 1, bracket_name: "Quarters".into() };
        smaller.scores.push(semi.clone());
        semi.team_a = "Seed 9".into();
        smaller.scores.push(semi);
        app.on_tournament_loaded("t".into(), smaller);

        assert_eq!(app.state.pools.selected_pool, 0);
        assert_eq!(app.state.pools.table.selected_row, 0, "pool A now has one match");
        assert_eq!(app.state.bracket.selected_round, 0);
        assert_eq!(app.state.bracket.selected_seed, 1, "round now has two seeds");
    }

    #[test]
    fn matches_cursor_stays_within_filtered_rows() {
        let mut app = app();
        select(&mut app, "t");
        app.on_tournament_loaded("t".into(), tournament("t", &["A", "A", "B"]));
        app.matches_row_down();
        app.matches_row_down();
        app.matches_row_down();
        assert_eq!(app.state.matches.selected_row, 2);

        app.state.matches.push_search('1');
        app.state.matches.push_search('0');
        app.state.matches.push_search('2');
        app.matches_row_down();
        assert_eq!(app.state.matches.selected_row, 0, "only one row matches \"102\"");
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = app();
        app.update_tab(MenuItem::Bracket);
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Bracket);
    }
}
