mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{debug, info};
use scores_api::client::DataSource;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

/// What the command line asked for.
#[derive(Debug, PartialEq)]
enum CliAction {
    Run(CliOptions),
    Help,
    Version,
}

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    data: Option<String>,
    tournament: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = match parse_cli_args(std::env::args().skip(1)) {
        Ok(CliAction::Run(options)) => options,
        Ok(CliAction::Help) => {
            println!("{}", usage_text());
            return Ok(());
        }
        Ok(CliAction::Version) => {
            println!("scores {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Error)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let mut settings = AppSettings::load();
    if let Some(data) = &options.data {
        settings.data_source = DataSource::parse(data);
    }
    if let Some(slug) = options.tournament {
        settings.last_tournament = Some(slug);
    }
    let data_source = settings.data_source.clone();
    let refresh_interval = settings.refresh_interval;
    info!("data source: {data_source}");

    let app = Arc::new(Mutex::new(App::with_settings(settings)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(data_source, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Periodic refresh of the tournament on screen
    let periodic_task = refresh_interval.map(|period| {
        let refresher = PeriodicRefresher::new(ui_event_tx.clone(), period);
        tokio::spawn(refresher.run())
    });

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();
    if let Some(task) = periodic_task {
        task.abort();
    }

    Ok(())
}

fn parse_cli_args<I>(args: I) -> Result<CliAction, String>
where
    I: IntoIterator<Item = String>,
{
    let mut options = CliOptions::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliAction::Help),
            "-V" | "--version" => return Ok(CliAction::Version),
            "-d" | "--data" => {
                options.data = Some(args.next().ok_or("Missing value for --data")?);
            }
            "-t" | "--tournament" => {
                options.tournament = Some(args.next().ok_or("Missing value for --tournament")?);
            }
            _ => return Err(format!("Unknown argument: {arg}")),
        }
    }

    Ok(CliAction::Run(options))
}

fn usage_text() -> &'static str {
    "scores - tournament scores terminal UI

Usage:
  scores [--data <dir|url>] [--tournament <slug>]
  scores --help
  scores --version

Options:
  -d, --data <dir|url>       Directory or base URL holding tournaments.json
  -t, --tournament <slug>    Tournament to open on startup

Environment:
  SCORES_DATA           Same as --data (default ./data)
  SCORES_REFRESH_SECS   Reload interval for the open tournament, 0 disables (default 60)
  SCORES_LOG            Log level: error, warn, info, debug, trace"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = network_requests.send(NetworkRequest::LoadIndex).await;
            let mut guard = app.lock().await;
            if let Some(slug) = guard.startup_selection() {
                guard.select_tournament(slug.clone());
                drop(guard);
                let _ = network_requests.send(NetworkRequest::LoadTournament { slug }).await;
            }
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::RefreshDue => {
            let target = app.lock().await.refresh_target();
            if let Some(slug) = target {
                debug!("refreshing {slug}");
                let _ = network_requests.send(NetworkRequest::RefreshTournament { slug }).await;
            }
            false
        }
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    let mut guard = app.lock().await;
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            true
        }
        NetworkResponse::IndexLoaded { tournaments } => {
            guard.on_index_loaded(tournaments);
            true
        }
        NetworkResponse::IndexFailed { message } => {
            guard.on_index_failed(message);
            true
        }
        NetworkResponse::TournamentLoaded { slug, tournament } => {
            guard.on_tournament_loaded(slug, tournament)
        }
        NetworkResponse::TournamentFailed { slug, message } => {
            guard.on_tournament_failed(slug, message)
        }
        NetworkResponse::RefreshFailed { slug, message } => {
            guard.on_refresh_failed(slug, message);
            true
        }
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
