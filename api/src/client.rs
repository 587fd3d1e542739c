use crate::error::{ApiError, ApiResult};
use crate::wire::{IndexEntry, TournamentDocument};
use crate::{Tournament, TournamentSummary};
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

const INDEX_DOCUMENT: &str = "tournaments.json";
const DEFAULT_DATA_DIR: &str = "data";

/// Where the static tournament documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Base URL, without trailing slash.
    Http(String),
    Dir(PathBuf),
}

impl DataSource {
    /// `http://` and `https://` values are URLs, anything else is a directory.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            DataSource::Http(value.trim_end_matches('/').to_string())
        } else {
            DataSource::Dir(PathBuf::from(value))
        }
    }

    fn location(&self, document: &str) -> String {
        match self {
            DataSource::Http(base) => format!("{base}/{document}"),
            DataSource::Dir(dir) => dir.join(document).display().to_string(),
        }
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Dir(PathBuf::from(DEFAULT_DATA_DIR))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Http(base) => write!(f, "{base}"),
            DataSource::Dir(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// Client for the tournament index and per-tournament documents.
#[derive(Debug, Clone)]
pub struct ScoresApi {
    client: Client,
    source: DataSource,
    timeout: Duration,
}

impl Default for ScoresApi {
    fn default() -> Self {
        Self::new(DataSource::default())
    }
}

impl ScoresApi {
    pub fn new(source: DataSource) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("scores-tui/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            source,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Fetch the list of tournaments that can be selected.
    pub async fn fetch_index(&self) -> ApiResult<Vec<TournamentSummary>> {
        let entries: Vec<IndexEntry> = self.get(INDEX_DOCUMENT).await?;
        Ok(entries.into_iter().map(Into::into).collect())
    }

    /// Fetch and validate one tournament.
    ///
    /// A record that breaks the model (missing team, pool row without a pool
    /// name, ...) refuses the whole document with `ApiError::InvalidRecord`.
    pub async fn fetch_tournament(&self, slug: &str) -> ApiResult<Tournament> {
        if !is_valid_slug(slug) {
            return Err(ApiError::NotFound(format!("invalid tournament slug {slug:?}")));
        }
        let document_name = format!("{slug}.json");
        let document: TournamentDocument = self.get(&document_name).await?;
        Tournament::try_from(document).map_err(|source| {
            let location = self.source.location(&document_name);
            warn!("refusing {location}: {source}");
            ApiError::InvalidRecord { location, source }
        })
    }

    async fn get<T: DeserializeOwned>(&self, document: &str) -> ApiResult<T> {
        let location = self.source.location(document);
        debug!("loading {location}");
        let body = match &self.source {
            DataSource::Http(_) => self.get_text(&location).await?,
            DataSource::Dir(_) => read_file(&location)?,
        };
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { location, source })
    }

    async fn get_text(&self, url: &str) -> ApiResult<String> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| ApiError::Network { url: url.to_owned(), source })?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(url.to_owned())),
            status if !status.is_success() => {
                Err(ApiError::Status { url: url.to_owned(), status })
            }
            _ => response
                .text()
                .await
                .map_err(|source| ApiError::Body { url: url.to_owned(), source }),
        }
    }
}

fn read_file(location: &str) -> ApiResult<String> {
    std::fs::read_to_string(location).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ApiError::NotFound(location.to_owned())
        } else {
            ApiError::Io { path: PathBuf::from(location), source }
        }
    })
}

/// Slugs become file names and URL path segments.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
