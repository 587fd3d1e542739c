use scores_api::{MatchRecord, SortKey, TableControls};
use tui::layout::Constraint;
use tui::style::{Color, Modifier, Style};
use tui::text::Span;
use tui::widgets::{Cell, Row, Table};

pub const WINNER_COLOR: Color = Color::Rgb(0x38, 0xD9, 0xA9);
pub const LOSER_COLOR: Color = Color::Rgb(0xFF, 0x87, 0x87);
pub const BRACKET_ROW_COLOR: Color = Color::LightBlue;

const SORT_NONE: &str = "↕";
const SORT_ASC: &str = "▼";
const SORT_DESC: &str = "▲";
const VIDEO_MARKER: &str = "▶";

/// Builds the ratatui table for a filtered, sorted set of matches.
pub struct MatchTable<'a> {
    pub rows: &'a [&'a MatchRecord],
    pub columns: &'a [SortKey],
    pub controls: &'a TableControls,
    /// Column the h/l cursor is on.
    pub cursor_column: usize,
    /// Color each team by result instead of marking bracket rows.
    pub color_results: bool,
    /// Append the schedule slot as a trailing, unsortable column.
    pub show_time: bool,
}

impl<'a> MatchTable<'a> {
    pub fn header_label(key: SortKey, controls: &TableControls) -> String {
        let icon = match controls.direction(key) {
            None => SORT_NONE,
            Some(false) => SORT_ASC,
            Some(true) => SORT_DESC,
        };
        format!("{} {icon}", key.label())
    }

    pub fn build(&self) -> Table<'a> {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut labels = vec![Cell::from("")];
        labels.extend(self.columns.iter().enumerate().map(|(i, key)| {
            let mut style = bold;
            if i == self.cursor_column {
                style = style.fg(Color::Yellow).add_modifier(Modifier::UNDERLINED);
            }
            Cell::from(Span::styled(Self::header_label(*key, self.controls), style))
        }));
        if self.show_time {
            labels.push(Cell::from(Span::styled("Time", bold)));
        }
        let header = Row::new(labels).height(1);

        let rows = self.rows.iter().map(|m| self.row(*m));
        Table::new(rows, self.widths())
            .header(header)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ")
    }

    fn row(&self, m: &'a MatchRecord) -> Row<'a> {
        let cells = self
            .cells(m)
            .into_iter()
            .map(|(text, style)| Cell::from(Span::styled(text, style)));
        let row = Row::new(cells);
        if !self.color_results && m.is_bracket() {
            row.style(Style::default().fg(BRACKET_ROW_COLOR))
        } else {
            row
        }
    }

    /// Text and style of every cell of one row, video marker first.
    fn cells(&self, m: &MatchRecord) -> Vec<(String, Style)> {
        let marker = if m.video_url.is_some() { VIDEO_MARKER } else { "" };
        let mut cells = vec![(marker.to_string(), Style::default().fg(Color::Red))];
        cells.extend(self.columns.iter().map(|key| {
            let style = match key {
                SortKey::TeamA | SortKey::ScoreA if self.color_results => result_style(m, &m.team_a),
                SortKey::TeamB | SortKey::ScoreB if self.color_results => result_style(m, &m.team_b),
                _ => Style::default(),
            };
            (key.text(m).into_owned(), style)
        }));
        if self.show_time {
            cells.push((m.time.clone().unwrap_or_default(), Style::default().fg(Color::Gray)));
        }
        cells
    }

    fn widths(&self) -> Vec<Constraint> {
        let mut widths = vec![Constraint::Length(2)];
        widths.extend(self.columns.iter().map(|key| match key {
            SortKey::TeamA | SortKey::TeamB => Constraint::Fill(3),
            SortKey::ScoreA | SortKey::ScoreB => Constraint::Length(9),
            SortKey::Stage => Constraint::Length(12),
        }));
        if self.show_time {
            widths.push(Constraint::Length(8));
        }
        widths
    }
}

fn result_style(m: &MatchRecord, team: &str) -> Style {
    let other_won = if m.team_a == team { m.won_by(&m.team_b) } else { m.won_by(&m.team_a) };
    if m.won_by(team) {
        Style::default().fg(WINNER_COLOR)
    } else if other_won {
        Style::default().fg(LOSER_COLOR)
    } else {
        Style::default()
    }
}
