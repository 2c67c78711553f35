use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::api::{RawMatch, ShotProvider};
use crate::errors::{FetchStage, Result, ShotError};
use crate::flex_id::MatchId;
use crate::league::{League, Season};

/// Kickoff format used by Understat fixture lists
pub const KICKOFF_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A completed match selected for shot retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchDescriptor {
    pub id: MatchId,
    pub league: League,
    pub kickoff: NaiveDateTime,
}

/// Discover every match of `leagues` in `season` that kicked off before now.
pub async fn discover<P: ShotProvider>(
    provider: &P,
    leagues: &[League],
    season: &Season,
) -> Result<Vec<MatchDescriptor>> {
    discover_at(provider, leagues, season, Utc::now().naive_utc()).await
}

/// Same as [`discover`] with an explicit cutoff. A match is kept iff its kickoff
/// is strictly before `now`.
///
/// Output is grouped by league in the order supplied, then in provider order.
/// Repeated league tags are only queried once.
pub async fn discover_at<P: ShotProvider>(
    provider: &P,
    leagues: &[League],
    season: &Season,
    now: NaiveDateTime,
) -> Result<Vec<MatchDescriptor>> {
    if leagues.is_empty() {
        return Err(ShotError::config("at least one league tag is required"));
    }

    let mut unique: Vec<League> = Vec::with_capacity(leagues.len());
    for league in leagues {
        if !unique.contains(league) {
            unique.push(*league);
        }
    }

    let mut found = Vec::new();
    for league in unique {
        let raw = provider.league_matches(league, season).await?;
        let listed = raw.len();

        for m in raw {
            let kickoff = parse_kickoff(&m, league)?;
            if kickoff < now {
                found.push(MatchDescriptor {
                    id: m.id,
                    league,
                    kickoff,
                });
            }
        }
        debug!(%league, listed, "league fixtures fetched");
    }

    info!(matches = found.len(), %season, "discovered completed matches");
    Ok(found)
}

fn parse_kickoff(m: &RawMatch, league: League) -> Result<NaiveDateTime> {
    let target = format!("{}/{}", league, m.id);
    let raw = m.datetime.as_deref().ok_or_else(|| {
        ShotError::data_source(FetchStage::Record, &target, "match has no datetime field")
    })?;

    NaiveDateTime::parse_from_str(raw.trim(), KICKOFF_FORMAT).map_err(|e| {
        ShotError::data_source(FetchStage::Record, &target, format!("unparseable datetime {:?}: {}", raw, e))
    })
}
