use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::aggregate::{AggregateOptions, FailurePolicy};
use crate::api::{ProviderMode, ProviderSettings, DEFAULT_BASE_URL};
use crate::errors::{Result, ShotError};
use crate::league::{League, Season};

fn default_leagues() -> Vec<String> {
    League::big_five().iter().map(|l| l.tag().to_string()).collect()
}

fn default_season() -> String {
    "2024".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_concurrency() -> usize {
    1
}

/// Run configuration, read from `config.json`
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_leagues")]
    pub leagues: Vec<String>,
    #[serde(default = "default_season")]
    pub season: String,
    /// Defaults to `shot_data_<season>.csv` in the working directory
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub mode: ProviderMode,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            leagues: default_leagues(),
            season: default_season(),
            output: None,
            base_url: default_base_url(),
            mode: ProviderMode::default(),
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
            failure_policy: FailurePolicy::default(),
            user_agent: None,
        }
    }
}

impl AppConfig {
    /// `<config_dir>/config.json` for this application
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "shotmap", "shotmap").map(|p| p.config_dir().join("config.json"))
    }

    /// `path` when given, otherwise the per-user default
    pub fn resolve_path(path: Option<&Path>) -> Option<PathBuf> {
        path.map(Path::to_path_buf).or_else(Self::default_path)
    }

    /// Load from `path`, or from the default location when `None`.
    /// A missing file yields the defaults; an unreadable or invalid one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match Self::resolve_path(path) {
            Some(p) => p,
            None => return Ok(AppConfig::default()),
        };
        if !path.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| ShotError::config(format!("{}: {}", path.display(), e)))
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ShotError::config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Parsed league tags; any unknown tag is a configuration error.
    pub fn leagues(&self) -> Result<Vec<League>> {
        self.leagues.iter().map(|tag| tag.parse()).collect()
    }

    pub fn season(&self) -> Result<Season> {
        Season::new(self.season.clone())
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("shot_data_{}.csv", self.season.trim())))
    }

    pub fn provider_settings(&self) -> ProviderSettings {
        let defaults = ProviderSettings::default();
        ProviderSettings {
            base_url: self.base_url.clone(),
            mode: self.mode,
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }

    pub fn aggregate_options(&self) -> Result<AggregateOptions> {
        if self.concurrency == 0 {
            return Err(ShotError::config("concurrency must be at least 1"));
        }
        Ok(AggregateOptions {
            policy: self.failure_policy,
            concurrency: self.concurrency,
        })
    }
}
