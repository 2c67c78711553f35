use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::dataset::ShotFields;
use crate::errors::{FetchStage, Result, ShotError};
use crate::flex_id::MatchId;
use crate::league::{League, Season};
use crate::parser;

pub const DEFAULT_BASE_URL: &str = "https://understat.com";

/// One entry of a league's fixture list
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RawMatch {
    pub id: MatchId,
    /// "YYYY-MM-DD HH:MM:SS"; validated during discovery
    pub datetime: Option<String>,
}

/// Shots for one match, split by side
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct MatchShots {
    #[serde(rename = "h")]
    pub home: Vec<ShotFields>,
    #[serde(rename = "a")]
    pub away: Vec<ShotFields>,
}

/// The remote statistics provider, as the pipeline sees it.
///
/// Injected into discovery and aggregation so tests can swap in canned data.
#[allow(async_fn_in_trait)]
pub trait ShotProvider {
    /// Full fixture list of a league for one season
    async fn league_matches(&self, league: League, season: &Season) -> Result<Vec<RawMatch>>;

    /// Both shot groups of a single match
    async fn match_shots(&self, id: &MatchId) -> Result<MatchShots>;
}

/// How the client talks to Understat
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderMode {
    /// JSON endpoints (`getLeagueData`, `getMatchData`)
    #[default]
    Api,
    /// Legacy HTML pages with embedded `JSON.parse` payloads
    Page,
}

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub mode: ProviderMode,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mode: ProviderMode::Api,
            timeout: Duration::from_secs(30),
            user_agent: concat!("shotmap/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnderstatClient {
    pub base_url: String,
    pub mode: ProviderMode,
    client: reqwest::Client,
}

impl UnderstatClient {
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ShotError::config("provider base_url must not be empty"));
        }

        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ShotError::data_source(FetchStage::Request, &base_url, e))?;

        Ok(Self {
            base_url,
            mode: settings.mode,
            client,
        })
    }

    pub fn league_url(&self, league: League, season: &Season) -> String {
        match self.mode {
            ProviderMode::Api => format!("{}/getLeagueData/{}/{}", self.base_url, league.tag(), season),
            ProviderMode::Page => format!("{}/league/{}/{}", self.base_url, league.tag(), season),
        }
    }

    pub fn match_url(&self, id: &MatchId) -> String {
        match self.mode {
            ProviderMode::Api => format!("{}/getMatchData/{}", self.base_url, id),
            ProviderMode::Page => format!("{}/match/{}", self.base_url, id),
        }
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let mut req = self.client.get(url);
        if self.mode == ProviderMode::Api {
            req = req.header("X-Requested-With", "XMLHttpRequest");
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ShotError::data_source(FetchStage::Request, url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ShotError::data_source(FetchStage::Status, url, status));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ShotError::data_source(FetchStage::Decode, url, e))?;
        debug!(url, bytes = body.len(), "fetched");
        Ok(body)
    }
}

impl ShotProvider for UnderstatClient {
    async fn league_matches(&self, league: League, season: &Season) -> Result<Vec<RawMatch>> {
        let url = self.league_url(league, season);
        let body = self.get_text(&url).await?;
        match self.mode {
            ProviderMode::Api => parser::parse_league_matches(&body, &url),
            ProviderMode::Page => {
                let json = parser::extract_embedded_json(&body, "datesData")?;
                parser::parse_league_matches(&json, &url)
            }
        }
    }

    async fn match_shots(&self, id: &MatchId) -> Result<MatchShots> {
        let url = self.match_url(id);
        let body = self.get_text(&url).await?;
        match self.mode {
            ProviderMode::Api => parser::parse_match_shots(&body, &url),
            ProviderMode::Page => {
                let json = parser::extract_embedded_json(&body, "shotsData")?;
                parser::parse_match_shots(&json, &url)
            }
        }
    }
}
