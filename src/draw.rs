use chrono::Local;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{
    Block, BorderType, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table,
    TableState, Tabs, Wrap,
};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::bracket::{BracketGrid, BracketView};
use crate::components::match_table::MatchTable;
use crate::state::app_state::{IndexState, MATCH_COLUMNS, POOL_COLUMNS, TournamentState};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use scores_api::{MatchRecord, Phase, RankEntry, Seed, Tournament, group_by_round, group_by_stage};

static TABS: &[&str; 5] = &["Matches", "Pools", "Bracket", "Rankings", "Info"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let _ = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Matches => draw_matches(f, layout.main, app),
            MenuItem::Pools => draw_pools(f, layout.main, app),
            MenuItem::Bracket => draw_bracket(f, layout.main, app),
            MenuItem::Rankings => draw_rankings(f, layout.main, app),
            MenuItem::Info => draw_info(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        if app.state.picker.open {
            draw_picker(f, f.area(), app);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = |tab: MenuItem| match tab {
        MenuItem::Matches => Some(0),
        MenuItem::Pools => Some(1),
        MenuItem::Bracket => Some(2),
        MenuItem::Rankings => Some(3),
        MenuItem::Info => Some(4),
        MenuItem::Help => None,
    };
    let selected = tab_index(app.state.active_tab).or(tab_index(app.state.previous_tab));

    let title = match &app.state.tournament {
        TournamentState::Loaded { tournament, .. } => format!(" {} ", tournament.metadata.name),
        TournamentState::Loading { slug } | TournamentState::Failed { slug, .. } => format!(" {slug} "),
        TournamentState::NotSelected => " scores ".to_string(),
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(selected)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Render the placeholder for anything but a loaded tournament.
fn loaded_or_status<'a>(f: &mut Frame, area: Rect, app: &'a App) -> Option<&'a Tournament> {
    let (message, color) = match &app.state.tournament {
        TournamentState::Loaded { tournament, .. } => return Some(tournament),
        TournamentState::NotSelected => match &app.state.index {
            IndexState::Failed(err) => {
                (format!("Could not load the tournament list:\n{err}"), Color::Red)
            }
            _ => ("No tournament selected.\nPress t to choose one.".to_string(), Color::DarkGray),
        },
        TournamentState::Loading { slug } => (format!("Loading {slug}..."), Color::DarkGray),
        TournamentState::Failed { slug, message } => (
            format!("Could not load {slug}:\n{message}\n\nPress t to pick another tournament."),
            Color::Red,
        ),
    };

    let block = default_border(color);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(message)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
    None
}

fn panel_title(app: &App, title: &str) -> String {
    match &app.state.last_error {
        Some(err) => format!(" {title} (refresh failed: {err}) "),
        None => format!(" {title} "),
    }
}

fn draw_empty(f: &mut Frame, area: Rect, msg: &str) {
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

/// One-line footer: the selected row's video link, or the key hint.
fn draw_footer(f: &mut Frame, area: Rect, video: Option<&str>, hint: &str) {
    let text = match video {
        Some(url) => format!("video: {url}"),
        None => hint.to_string(),
    };
    f.render_widget(Paragraph::new(text).style(Style::default().fg(Color::DarkGray)), area);
}

fn selected_video<'a>(rows: &[&'a MatchRecord], selected: usize) -> Option<&'a str> {
    rows.get(selected).and_then(|m| m.video_url.as_deref())
}

fn ungrouped_note(count: usize, phase: Phase) -> Option<String> {
    let (what, field) = match phase {
        Phase::Pool => ("pool", "pool"),
        Phase::Brackets => ("bracket", "round"),
    };
    (count > 0).then(|| format!("{count} {what} matches have no {field}; they are listed under Matches"))
}

fn draw_matches(f: &mut Frame, area: Rect, app: &App) {
    let Some(tournament) = loaded_or_status(f, area, app) else {
        return;
    };
    let view = &app.state.matches;

    let [search_area, table_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(area);

    let editing = app.state.editing_search;
    let search_block = default_border(if editing { Color::Yellow } else { Color::DarkGray })
        .title(" Search teams (/) ");
    let search_inner = search_block.inner(search_area);
    f.render_widget(
        Paragraph::new(view.controls.search.as_str()).block(search_block),
        search_area,
    );
    if editing {
        let x = search_inner.x + view.controls.search.chars().count() as u16;
        f.set_cursor_position((x.min(search_inner.right().saturating_sub(1)), search_inner.y));
    }

    let block = default_border(Color::White).title(panel_title(app, "Matches"));
    let inner = block.inner(table_area);
    f.render_widget(block, table_area);

    if tournament.scores.is_empty() {
        draw_empty(f, inner, "No matches yet");
        return;
    }
    let rows = view.controls.apply(&tournament.scores);
    if rows.is_empty() {
        draw_empty(f, inner, "Nothing found");
        return;
    }

    let [table_area, footer] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);
    let table = MatchTable {
        rows: &rows,
        columns: &MATCH_COLUMNS,
        controls: &view.controls,
        cursor_column: view.column,
        color_results: false,
        show_time: false,
    }
    .build();
    let mut state = TableState::default().with_selected(Some(view.selected_row));
    f.render_stateful_widget(table, table_area, &mut state);
    draw_footer(
        f,
        footer,
        selected_video(&rows, view.selected_row),
        "h/l column  s sort  j/k row  / search",
    );
}

fn draw_pools(f: &mut Frame, area: Rect, app: &App) {
    let Some(tournament) = loaded_or_status(f, area, app) else {
        return;
    };
    let block = default_border(Color::White).title(panel_title(app, "Pools"));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let groups = group_by_stage(&tournament.scores);
    let ungrouped = ungrouped_note(groups.ungrouped_in(Phase::Pool), Phase::Pool);
    if groups.pools.is_empty() {
        let message = ungrouped.unwrap_or_else(|| "No pool matches yet".to_string());
        draw_empty(f, inner, &message);
        return;
    }

    let [tab_area, legend, table_area, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let names: Vec<Line> = groups.pool_names().into_iter().map(|n| Line::from(format!("Pool {n}"))).collect();
    f.render_widget(
        Tabs::new(names)
            .select(app.state.pools.selected_pool)
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        tab_area,
    );
    let legend_text = ungrouped.unwrap_or_else(|| "[/] pool  h/l column  s sort  j/k row".to_string());
    f.render_widget(
        Paragraph::new(legend_text).style(Style::default().fg(Color::DarkGray)),
        legend,
    );

    let Some(pool) = groups.pools.values().nth(app.state.pools.selected_pool) else {
        return;
    };
    let view = &app.state.pools.table;
    let rows = view.controls.apply(pool.iter().copied());
    let table = MatchTable {
        rows: &rows,
        columns: &POOL_COLUMNS,
        controls: &view.controls,
        cursor_column: view.column,
        color_results: true,
        show_time: true,
    }
    .build();
    let mut state = TableState::default().with_selected(Some(view.selected_row));
    f.render_stateful_widget(table, table_area, &mut state);
    draw_footer(f, footer, selected_video(&rows, view.selected_row), "");
}

fn draw_bracket(f: &mut Frame, area: Rect, app: &App) {
    let Some(tournament) = loaded_or_status(f, area, app) else {
        return;
    };
    let block = default_border(Color::White).title(panel_title(app, "Bracket"));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rounds = group_by_round(&tournament.scores);
    let ungrouped = ungrouped_note(
        group_by_stage(&tournament.scores).ungrouped_in(Phase::Brackets),
        Phase::Brackets,
    );
    if rounds.is_empty() {
        let message = ungrouped.unwrap_or_else(|| "No bracket matches yet".to_string());
        draw_empty(f, inner, &message);
        return;
    }
    let selected_round = app.state.bracket.selected_round.min(rounds.len() - 1);
    let selected_seed = app.state.bracket.selected_seed;

    let [tab_area, grid_area, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let titles: Vec<Line> = rounds.iter().map(|r| Line::from(r.title)).collect();
    f.render_widget(
        Tabs::new(titles)
            .select(selected_round)
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        tab_area,
    );

    let seeds: Vec<Vec<Seed>> = rounds.iter().map(|r| r.seeds()).collect();
    let counts: Vec<usize> = seeds.iter().map(Vec::len).collect();
    let grid = BracketGrid::compute(&counts, selected_round, grid_area.width);
    let visible = &seeds[selected_round..(selected_round + grid.column_x.len()).min(seeds.len())];
    let scroll_offset = grid.scroll_for(selected_seed, grid_area.height);

    f.render_widget(
        BracketView { rounds: visible, grid: &grid, selected_seed, scroll_offset },
        grid_area,
    );

    let video = seeds[selected_round]
        .get(selected_seed)
        .and_then(|s| s.video_url.as_deref());
    let hint = ungrouped.unwrap_or_else(|| "h/l round  j/k seed".to_string());
    draw_footer(f, footer, video, &hint);
}

fn draw_rankings(f: &mut Frame, area: Rect, app: &App) {
    let Some(tournament) = loaded_or_status(f, area, app) else {
        return;
    };
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    draw_rank_list(f, left, "Rankings", &tournament.metadata.rankings);
    draw_rank_list(f, right, "Seedings", &tournament.metadata.seedings);
}

fn draw_rank_list(f: &mut Frame, area: Rect, title: &str, entries: &[RankEntry]) {
    let block = default_border(Color::White).title(format!(" {title} "));
    if entries.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        draw_empty(f, inner, &format!("No {} published", title.to_lowercase()));
        return;
    }
    let rows = entries
        .iter()
        .map(|e| Row::new(vec![Cell::from(format!("{:>3}", e.rank)), Cell::from(e.team.as_str())]));
    let table = Table::new(rows, [Constraint::Length(4), Constraint::Fill(1)])
        .header(
            Row::new(vec!["#", "Team"]).style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(block);
    f.render_widget(table, area);
}

fn draw_info(f: &mut Frame, area: Rect, app: &App) {
    let Some(tournament) = loaded_or_status(f, area, app) else {
        return;
    };
    let block = default_border(Color::White).title(" Info ");
    let metadata = &tournament.metadata;
    let groups = group_by_stage(&tournament.scores);
    let label = Style::default().fg(Color::Gray);

    let mut lines = vec![
        Line::from(Span::styled(
            metadata.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (key, value) in metadata.display_fields() {
        lines.push(Line::from(vec![
            Span::styled(format!("{key:>17}: "), label),
            Span::raw(value),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("{:>17}: ", "matches"), label),
        Span::raw(format!(
            "{} ({} pools, {} bracket, {} ungrouped)",
            tournament.scores.len(),
            groups.pools.len(),
            groups.brackets.len(),
            groups.ungrouped.len()
        )),
    ]));

    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let keys = [
        ("t", "choose tournament"),
        ("1-5", "switch tab"),
        ("?  / Esc", "help / back"),
        ("f", "toggle full screen"),
        ("\"", "toggle log pane"),
        ("q  / Ctrl-C", "quit"),
        ("", ""),
        ("h/l", "move column cursor (tables) or round (bracket)"),
        ("s  / Enter", "sort by column, again to reverse"),
        ("j/k", "move row or seed"),
        ("/", "search teams (Matches); Enter or Esc to finish"),
        ("[ / ]", "previous / next pool"),
    ];
    let lines: Vec<Line> = keys
        .iter()
        .map(|(k, d)| {
            Line::from(vec![
                Span::styled(format!("{k:>12}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*d),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_picker(f: &mut Frame, area: Rect, app: &App) {
    let [popup] = Layout::horizontal([Constraint::Percentage(60)]).flex(Flex::Center).areas(area);
    let [popup] = Layout::vertical([Constraint::Percentage(60)]).flex(Flex::Center).areas(popup);
    f.render_widget(Clear, popup);

    let block = default_border(Color::Yellow).title(" Tournaments (Enter select, Esc close) ");
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let tournaments = match &app.state.index {
        IndexState::Loading => return draw_empty(f, inner, "Loading tournaments..."),
        IndexState::Failed(err) => {
            f.render_widget(
                Paragraph::new(format!("Could not load the tournament list:\n{err}"))
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: true }),
                inner,
            );
            return;
        }
        IndexState::Loaded(list) if list.is_empty() => {
            return draw_empty(f, inner, "No tournaments published");
        }
        IndexState::Loaded(list) => list,
    };

    let today = Local::now().date_naive();
    let items: Vec<ListItem> = tournaments
        .iter()
        .map(|t| {
            let mut spans = vec![Span::raw(t.name.clone())];
            if t.is_expired(today) {
                spans.push(Span::styled(" (final)", Style::default().fg(Color::DarkGray)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.state.picker.selected));
    f.render_stateful_widget(list, inner, &mut state);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .output_target(false)
        .output_file(false)
        .output_line(false);
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
