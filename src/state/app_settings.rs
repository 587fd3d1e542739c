use log::{LevelFilter, warn};
use scores_api::client::DataSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_REFRESH_SECS: u64 = 60;

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub data_source: DataSource,
    /// `None` disables periodic reloads of the active tournament.
    pub refresh_interval: Option<Duration>,
    pub last_tournament: Option<String>,
}

/// The part of the settings that survives restarts.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSettings {
    #[serde(default)]
    pub last_tournament: Option<String>,
    #[serde(default)]
    pub full_screen: bool,
}

impl AppSettings {
    /// Defaults, then the settings file, then `SCORES_*` environment variables.
    pub fn load() -> Self {
        let persisted = settings_path()
            .and_then(|path| PersistedSettings::load_from(&path).ok())
            .unwrap_or_default();

        Self {
            full_screen: persisted.full_screen,
            log_level: env_value("SCORES_LOG").and_then(|v| v.parse().ok()),
            data_source: env_value("SCORES_DATA")
                .map(|v| DataSource::parse(&v))
                .unwrap_or_default(),
            refresh_interval: parse_refresh_interval(env_value("SCORES_REFRESH_SECS").as_deref()),
            last_tournament: persisted.last_tournament,
        }
    }

    pub fn save(&self) {
        let Some(path) = settings_path() else {
            return;
        };
        let persisted = PersistedSettings {
            last_tournament: self.last_tournament.clone(),
            full_screen: self.full_screen,
        };
        if let Err(e) = persisted.save_to(&path) {
            warn!("could not save settings to {}: {e}", path.display());
        }
    }
}

impl PersistedSettings {
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read settings failed: {e}"))?;
        serde_json::from_str(&content).map_err(|e| format!("parse settings failed: {e}"))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| format!("create dir failed: {e}"))?;
        }
        let payload = serde_json::to_string_pretty(self)
            .map_err(|e| format!("serialize settings failed: {e}"))?;
        std::fs::write(path, payload).map_err(|e| format!("write settings failed: {e}"))
    }
}

fn parse_refresh_interval(value: Option<&str>) -> Option<Duration> {
    let secs = match value {
        Some(v) => v.trim().parse::<u64>().unwrap_or(DEFAULT_REFRESH_SECS),
        None => DEFAULT_REFRESH_SECS,
    };
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn settings_path() -> Option<PathBuf> {
    if let Some(config_dir) = env_value("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(config_dir).join("scores").join("settings.json"));
    }
    env_value("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("scores")
            .join("settings.json")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_interval_defaults_and_disables() {
        assert_eq!(parse_refresh_interval(None), Some(Duration::from_secs(60)));
        assert_eq!(parse_refresh_interval(Some("15")), Some(Duration::from_secs(15)));
        assert_eq!(parse_refresh_interval(Some("0")), None);
        assert_eq!(parse_refresh_interval(Some("soon")), Some(Duration::from_secs(60)));
    }

    #[test]
    fn persisted_settings_round_trip_through_disk() {
        let path = std::env::temp_dir()
            .join(format!("scores-settings-{}", std::process::id()))
            .join("settings.json");
        let settings = PersistedSettings {
            last_tournament: Some("regionals-south".into()),
            full_screen: true,
        };
        settings.save_to(&path).unwrap();
        assert_eq!(PersistedSettings::load_from(&path).unwrap(), settings);
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn persisted_settings_tolerate_missing_keys() {
        let parsed: PersistedSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, PersistedSettings::default());
    }
}
