//! Per-match shot retrieval and flattening.
//!
//! Fetches are issued as a lazy stream of independent per-match futures. Up to
//! `concurrency` of them run at once, but `buffered` hands the batches back in
//! input position order, and a single `try_fold` merges them into the dataset in
//! that order. Running with `concurrency > 1` therefore yields exactly the same
//! table as a sequential run. Under [`FailurePolicy::Abort`] the fold stops at
//! the first failing match in input order.

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::{MatchShots, ShotProvider};
use crate::dataset::{ShotDataset, ShotRecord};
use crate::discovery::MatchDescriptor;
use crate::errors::{Result, ShotError};
use crate::flex_id::MatchId;
use crate::league::League;

/// What to do when a single match's shots can't be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the whole aggregation with the first failing match (in input order)
    #[default]
    Abort,
    /// Leave the match out and record it in [`Aggregation::skipped`]
    Skip,
}

#[derive(Debug, Clone, Copy)]
pub struct AggregateOptions {
    pub policy: FailurePolicy,
    /// Maximum number of match fetches in flight at once
    pub concurrency: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            policy: FailurePolicy::Abort,
            concurrency: 1,
        }
    }
}

/// A match left out under [`FailurePolicy::Skip`]
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedMatch {
    pub id: MatchId,
    pub league: League,
    pub error: ShotError,
}

#[derive(Debug, Clone)]
pub struct Aggregation {
    pub dataset: ShotDataset,
    /// Empty unless the skip policy was active and something failed; input order.
    pub skipped: Vec<SkippedMatch>,
}

/// Flatten one match's sides into rows: home group first, then away.
pub fn flatten_match(shots: MatchShots, league: League) -> Vec<ShotRecord> {
    shots
        .home
        .into_iter()
        .chain(shots.away)
        .map(|fields| ShotRecord::new(fields, league))
        .collect()
}

/// Result of fetching one match, after the failure policy has been applied
enum Batch<'a> {
    Rows(&'a MatchDescriptor, Vec<ShotRecord>),
    Skipped(SkippedMatch),
}

/// Fetch and flatten shots for `matches`, preserving their order.
pub async fn aggregate<P: ShotProvider>(
    provider: &P,
    matches: &[MatchDescriptor],
    options: AggregateOptions,
) -> Result<Aggregation> {
    let concurrency = options.concurrency.max(1);

    // try_fold stops at the first Err; dropping the stream cancels fetches still in flight.
    let (dataset, skipped) = stream::iter(matches)
        .map(|m| async move { (m, provider.match_shots(&m.id).await) })
        .buffered(concurrency)
        .map(|(m, result)| match result {
            Ok(shots) => Ok(Batch::Rows(m, flatten_match(shots, m.league))),
            Err(error) => match options.policy {
                FailurePolicy::Abort => Err(error),
                FailurePolicy::Skip => {
                    warn!(id = %m.id, league = %m.league, %error, "skipping match");
                    Ok(Batch::Skipped(SkippedMatch {
                        id: m.id.clone(),
                        league: m.league,
                        error,
                    }))
                }
            },
        })
        .try_fold(
            (ShotDataset::new(), Vec::new()),
            |(dataset, mut skipped), batch| async move {
                match batch {
                    Batch::Rows(m, rows) => {
                        debug!(id = %m.id, rows = rows.len(), "match shots merged");
                        Ok::<_, ShotError>((dataset.extend(rows), skipped))
                    }
                    Batch::Skipped(s) => {
                        skipped.push(s);
                        Ok((dataset, skipped))
                    }
                }
            },
        )
        .await?;

    info!(
        matches = matches.len(),
        rows = dataset.len(),
        skipped = skipped.len(),
        "aggregated shot data"
    );
    Ok(Aggregation { dataset, skipped })
}
