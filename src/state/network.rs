use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error};
use scores_api::client::{DataSource, ScoresApi};
use scores_api::ApiError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: ScoresApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        source: DataSource,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: ScoresApi::new(source),
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match &request {
                NetworkRequest::LoadIndex => self.handle_load_index().await,
                NetworkRequest::LoadTournament { slug } | NetworkRequest::RefreshTournament { slug } => {
                    self.handle_load_tournament(slug).await
                }
            };

            debug!("network request complete: {request:?}");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| failure_response(request, err));

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_index(&self) -> Result<NetworkResponse, ApiError> {
        debug!("loading tournament index from {}", self.client.source());
        let tournaments = self.client.fetch_index().await?;
        Ok(NetworkResponse::IndexLoaded { tournaments })
    }

    async fn handle_load_tournament(&self, slug: &str) -> Result<NetworkResponse, ApiError> {
        debug!("loading tournament {slug}");
        let tournament = self.client.fetch_tournament(slug).await?;
        Ok(NetworkResponse::TournamentLoaded { slug: slug.to_owned(), tournament })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

/// Tag a failure with the request that caused it.
fn failure_response(request: NetworkRequest, err: ApiError) -> NetworkResponse {
    error!("{err}");
    let message = err.to_string();
    match request {
        NetworkRequest::LoadIndex => NetworkResponse::IndexFailed { message },
        NetworkRequest::LoadTournament { slug } => NetworkResponse::TournamentFailed { slug, message },
        NetworkRequest::RefreshTournament { slug } => NetworkResponse::RefreshFailed { slug, message },
    }
}
