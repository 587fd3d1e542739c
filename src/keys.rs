use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    if let (Char('c'), KeyModifiers::CONTROL) = (key_event.code, key_event.modifiers) {
        crate::cleanup_terminal();
        std::process::exit(0);
    }

    // The picker popup takes every key while open.
    if guard.state.picker.open {
        match key_event.code {
            Char('j') | KeyCode::Down => guard.picker_down(),
            Char('k') | KeyCode::Up => guard.picker_up(),
            KeyCode::Esc | Char('t') => guard.close_picker(),
            Char('q') => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            KeyCode::Enter => {
                if let Some(slug) = guard.picker_confirm() {
                    drop(guard);
                    let _ = network_requests
                        .send(NetworkRequest::LoadTournament { slug })
                        .await;
                }
            }
            _ => {}
        }
        return;
    }

    // So does the search box.
    if guard.state.editing_search {
        match key_event.code {
            KeyCode::Esc | KeyCode::Enter => guard.finish_search(),
            KeyCode::Backspace => guard.state.matches.pop_search(),
            Char(c) => guard.state.matches.push_search(c),
            _ => {}
        }
        return;
    }

    match (guard.state.active_tab, key_event.code) {
        (_, Char('q')) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1')) => guard.update_tab(MenuItem::Matches),
        (_, Char('2')) => guard.update_tab(MenuItem::Pools),
        (_, Char('3')) => guard.update_tab(MenuItem::Bracket),
        (_, Char('4')) => guard.update_tab(MenuItem::Rankings),
        (_, Char('5')) => guard.update_tab(MenuItem::Info),
        (_, Char('?')) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc) => guard.exit_help(),
        (_, Char('t')) => guard.open_picker(),

        // Matches table
        (MenuItem::Matches, Char('/')) => guard.start_search(),
        (MenuItem::Matches, Char('l') | KeyCode::Right) => guard.matches_column_next(),
        (MenuItem::Matches, Char('h') | KeyCode::Left) => guard.matches_column_prev(),
        (MenuItem::Matches, Char('s') | KeyCode::Enter) => guard.matches_sort(),
        (MenuItem::Matches, Char('j') | KeyCode::Down) => guard.matches_row_down(),
        (MenuItem::Matches, Char('k') | KeyCode::Up) => guard.matches_row_up(),

        // Pool tables
        (MenuItem::Pools, Char(']')) => guard.pools_next(),
        (MenuItem::Pools, Char('[')) => guard.pools_prev(),
        (MenuItem::Pools, Char('l') | KeyCode::Right) => guard.pools_column_next(),
        (MenuItem::Pools, Char('h') | KeyCode::Left) => guard.pools_column_prev(),
        (MenuItem::Pools, Char('s') | KeyCode::Enter) => guard.pools_sort(),
        (MenuItem::Pools, Char('j') | KeyCode::Down) => guard.pools_row_down(),
        (MenuItem::Pools, Char('k') | KeyCode::Up) => guard.pools_row_up(),

        // Bracket navigation
        (MenuItem::Bracket, Char('l') | KeyCode::Right) => guard.bracket_next_round(),
        (MenuItem::Bracket, Char('h') | KeyCode::Left) => guard.bracket_prev_round(),
        (MenuItem::Bracket, Char('j') | KeyCode::Down) => guard.bracket_seed_down(),
        (MenuItem::Bracket, Char('k') | KeyCode::Up) => guard.bracket_seed_up(),

        // Global
        (_, Char('f')) => guard.toggle_full_screen(),
        (_, Char('"')) => guard.toggle_show_logs(),

        _ => {}
    }
}
