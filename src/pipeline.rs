use std::path::Path;
use tracing::info;

use crate::aggregate::{aggregate, AggregateOptions, Aggregation, SkippedMatch};
use crate::api::ShotProvider;
use crate::dataset::ShotDataset;
use crate::discovery::discover;
use crate::errors::Result;
use crate::export::write_csv;
use crate::league::{League, Season};
use crate::normalize::normalize;

/// Outcome of a full collect + normalize run
#[derive(Debug, Clone)]
pub struct ShotReport {
    pub matches: usize,
    pub dataset: ShotDataset,
    pub skipped: Vec<SkippedMatch>,
}

/// Discover, fetch and normalize shot data through an injected provider.
pub struct ShotDataScraper<P> {
    provider: P,
    options: AggregateOptions,
}

impl<P: ShotProvider> ShotDataScraper<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            options: AggregateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AggregateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Completed matches of `leagues` flattened into one raw (fractional) table.
    pub async fn collect(&self, leagues: &[League], season: &Season) -> Result<(usize, Aggregation)> {
        let matches = discover(&self.provider, leagues, season).await?;
        let aggregation = aggregate(&self.provider, &matches, self.options).await?;
        Ok((matches.len(), aggregation))
    }

    /// Collect then normalize onto the reference pitch.
    pub async fn run(&self, leagues: &[League], season: &Season) -> Result<ShotReport> {
        let (matches, Aggregation { dataset, skipped }) = self.collect(leagues, season).await?;
        let dataset = normalize(dataset)?;
        Ok(ShotReport {
            matches,
            dataset,
            skipped,
        })
    }

    /// Full run ending in a single write of `output`. Nothing is written on failure.
    pub async fn run_to_file(
        &self,
        leagues: &[League],
        season: &Season,
        output: &Path,
    ) -> Result<ShotReport> {
        let report = self.run(leagues, season).await?;
        write_csv(&report.dataset, output)?;
        info!(
            matches = report.matches,
            rows = report.dataset.len(),
            skipped = report.skipped.len(),
            "run complete"
        );
        Ok(report)
    }
}
