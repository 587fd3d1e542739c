use scores_api::{Seed, SeedTeam};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

use crate::components::match_table::WINNER_COLOR;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per seed cell: team line, id/video line, team line.
pub const SEED_HEIGHT: u16 = 3;

/// Width of the connector zone drawn between adjacent round columns.
pub const CONNECTOR_WIDTH: u16 = 3;

const CELL_W_MIN: u16 = 18;
const CELL_W_MAX: u16 = 30;

// ---------------------------------------------------------------------------
// SeedCell: pre-computed position for one seed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedCell {
    /// Row of the middle line, relative to the top of the grid.
    pub center_row: u16,
    /// Visible column this cell sits in (0 = selected round).
    pub column: usize,
    pub seed_idx: usize,
}

// ---------------------------------------------------------------------------
// BracketGrid: layout engine for the visible rounds
// ---------------------------------------------------------------------------

/// Layout of the selected round and the rounds after it that fit the width.
///
/// Each column divides the grid height into equal slots, one per seed, so a
/// round with half the seeds of its predecessor lines up between the pairs
/// that feed it.
#[derive(Debug, Clone)]
pub struct BracketGrid {
    pub cells: Vec<SeedCell>,
    /// Starting x of each visible column, relative to the grid origin.
    pub column_x: Vec<u16>,
    pub cell_width: u16,
    pub total_height: u16,
    seed_counts: Vec<usize>,
}

impl BracketGrid {
    /// `seed_counts` holds the number of seeds of every round, in tab order.
    pub fn compute(seed_counts: &[usize], first_round: usize, width: u16) -> Self {
        let remaining = &seed_counts[first_round.min(seed_counts.len())..];
        let fit = (width.saturating_add(CONNECTOR_WIDTH) / (CELL_W_MIN + CONNECTOR_WIDTH)).max(1) as usize;
        let visible: Vec<usize> = remaining.iter().copied().take(fit).collect();

        let columns = visible.len().max(1) as u16;
        let cell_width = (width.saturating_sub(CONNECTOR_WIDTH * (columns - 1)) / columns)
            .clamp(1, CELL_W_MAX);
        let stride = cell_width + CONNECTOR_WIDTH;
        let column_x = (0..visible.len() as u16).map(|c| c * stride).collect();

        let max_seeds = visible.iter().copied().max().unwrap_or(0) as u16;
        let total_height = max_seeds * (SEED_HEIGHT + 1);

        let mut cells = Vec::new();
        for (column, &count) in visible.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let slot = total_height / count as u16;
            for seed_idx in 0..count {
                cells.push(SeedCell {
                    center_row: seed_idx as u16 * slot + slot / 2,
                    column,
                    seed_idx,
                });
            }
        }

        Self { cells, column_x, cell_width, total_height, seed_counts: visible }
    }

    pub fn column_cells(&self, column: usize) -> impl Iterator<Item = &SeedCell> {
        self.cells.iter().filter(move |c| c.column == column)
    }

    /// Connectors are only drawn where a round halves into the next one.
    pub fn pairs_into_next(&self, column: usize) -> bool {
        match (self.seed_counts.get(column), self.seed_counts.get(column + 1)) {
            (Some(&here), Some(&next)) => next > 0 && here == next * 2,
            _ => false,
        }
    }

    /// Scroll offset that keeps the selected seed of the first column in view.
    pub fn scroll_for(&self, selected_seed: usize, viewport: u16) -> u16 {
        if self.total_height <= viewport {
            return 0;
        }
        let center = self
            .column_cells(0)
            .find(|c| c.seed_idx == selected_seed)
            .map(|c| c.center_row)
            .unwrap_or(0);
        center
            .saturating_sub(viewport / 2)
            .min(self.total_height - viewport)
    }
}

// ---------------------------------------------------------------------------
// BracketView widget
// ---------------------------------------------------------------------------

/// Renders seeds of consecutive rounds as columns joined by connectors.
pub struct BracketView<'a> {
    /// Seeds per visible column, starting with the selected round.
    pub rounds: &'a [Vec<Seed>],
    pub grid: &'a BracketGrid,
    /// Highlighted seed within the first column.
    pub selected_seed: usize,
    pub scroll_offset: u16,
}

impl Widget for BracketView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 10 || area.height < SEED_HEIGHT {
            return;
        }

        for cell in &self.grid.cells {
            let Some(seed) = self.rounds.get(cell.column).and_then(|r| r.get(cell.seed_idx)) else {
                continue;
            };
            let selected = cell.column == 0 && cell.seed_idx == self.selected_seed;
            draw_seed_cell(seed, cell, selected, self.grid, area, self.scroll_offset, buf);
        }

        for column in 0..self.grid.column_x.len() {
            if !self.grid.pairs_into_next(column) {
                continue;
            }
            let children: Vec<u16> = self.grid.column_cells(column).map(|c| c.center_row).collect();
            let conn_x = area.x + self.grid.column_x[column] + self.grid.cell_width;
            for (j, parent) in self.grid.column_cells(column + 1).enumerate() {
                let (Some(&top), Some(&bot)) = (children.get(2 * j), children.get(2 * j + 1)) else {
                    continue;
                };
                draw_connector(top, parent.center_row, bot, conn_x, area, self.scroll_offset, buf);
            }
        }
    }
}

/// Convert a grid row to a screen y, or `None` when scrolled out of view.
fn screen_y(grid_row: u16, scroll: u16, area: Rect) -> Option<u16> {
    let rel = grid_row.checked_sub(scroll)?;
    (rel < area.height).then_some(area.y + rel)
}

fn draw_seed_cell(
    seed: &Seed,
    cell: &SeedCell,
    selected: bool,
    grid: &BracketGrid,
    area: Rect,
    scroll: u16,
    buf: &mut Buffer,
) {
    let x = area.x + grid.column_x[cell.column];
    let limit_x = area.x + area.width;
    if x >= limit_x {
        return;
    }
    let avail = (limit_x - x) as usize;
    let width = grid.cell_width as usize;

    let base = if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Gray)
    };
    let winner = seed.winner();

    let lines = [
        (format_team_line(&seed.teams[0], width), team_style(winner, 0, base)),
        (format_info_line(seed, width), Style::default().fg(Color::DarkGray)),
        (format_team_line(&seed.teams[1], width), team_style(winner, 1, base)),
    ];

    for (dy, (text, style)) in lines.into_iter().enumerate() {
        let row = cell.center_row.saturating_sub(1) + dy as u16;
        let Some(y) = screen_y(row, scroll, area) else {
            continue;
        };
        let clipped: String = text.chars().take(avail).collect();
        buf.set_string(x, y, &clipped, style);
    }
}

fn team_style(winner: Option<usize>, team: usize, base: Style) -> Style {
    if winner == Some(team) {
        base.fg(WINNER_COLOR).add_modifier(Modifier::BOLD)
    } else {
        base
    }
}

/// `"name        score "`, exactly `width` columns.
fn format_team_line(team: &SeedTeam, width: usize) -> String {
    let name_w = width.saturating_sub(5);
    let name: String = team.name.chars().take(name_w).collect();
    let line = format!("{name:<name_w$} {:>3} ", team.score);
    line.chars().take(width).collect()
}

fn format_info_line(seed: &Seed, width: usize) -> String {
    let marker = if seed.video_url.is_some() { "▶ video" } else { "" };
    let id_w = width.saturating_sub(marker.chars().count());
    let line = format!("{:<id_w$}{marker}", seed.id);
    line.chars().take(width).collect()
}

/// Box-drawing connector between two children and their parent:
///
/// ```text
///  child_top  ──┐
///               │
///  parent       ├──
///               │
///  child_bot  ──┘
/// ```
fn draw_connector(
    r_top: u16,
    r_mid: u16,
    r_bot: u16,
    conn_x: u16,
    area: Rect,
    scroll: u16,
    buf: &mut Buffer,
) {
    let style = Style::default().fg(Color::DarkGray);
    let limit_x = area.x + area.width;
    let mut put = |x: u16, row: u16, ch: char| {
        if x < limit_x
            && let Some(y) = screen_y(row, scroll, area)
            && let Some(cell) = buf.cell_mut((x, y))
        {
            cell.set_char(ch);
            cell.set_style(style);
        }
    };

    put(conn_x, r_top, '─');
    put(conn_x + 1, r_top, '┐');
    for row in (r_top + 1)..r_bot {
        put(conn_x + 1, row, '│');
    }
    put(conn_x + 1, r_mid, '├');
    put(conn_x + 2, r_mid, '─');
    put(conn_x, r_bot, '─');
    put(conn_x + 1, r_bot, '┘');
}
