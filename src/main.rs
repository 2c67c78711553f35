use std::path::PathBuf;

use anyhow::{anyhow, Context};
use tracing::{error, info};

use shotmap_lib::aggregate::FailurePolicy;
use shotmap_lib::api::{ProviderMode, UnderstatClient};
use shotmap_lib::config::AppConfig;
use shotmap_lib::pipeline::ShotDataScraper;
use shotmap_lib::ShotError;

#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file (defaults to the per-user config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Season start year, e.g. 2024
    #[arg(short, long)]
    season: Option<String>,

    /// League tag (EPL, La_Liga, Bundesliga, Serie_A, Ligue_1, RFPL); repeatable
    #[arg(short, long = "league")]
    leagues: Vec<String>,

    /// Output CSV path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip matches whose shots can't be fetched instead of aborting
    #[arg(long)]
    skip_failed: bool,

    /// Number of match fetches in flight at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Scrape the HTML pages instead of the JSON endpoints
    #[arg(long)]
    page_mode: bool,

    /// Save the effective settings to the config file and exit without scraping
    #[arg(long)]
    write_config: bool,
}

impl Args {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(season) = self.season {
            config.season = season;
        }
        if !self.leagues.is_empty() {
            config.leagues = self.leagues;
        }
        if self.output.is_some() {
            config.output = self.output;
        }
        if self.skip_failed {
            config.failure_policy = FailurePolicy::Skip;
        }
        if let Some(n) = self.concurrency {
            config.concurrency = n;
        }
        if self.page_mode {
            config.mode = ProviderMode::Page;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    use clap::Parser;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shotmap=info,shotmap_lib=info")),
        )
        .init();

    let args = Args::parse();
    let config_path = AppConfig::resolve_path(args.config.as_deref());
    let write_config = args.write_config;
    let config = AppConfig::load(config_path.as_deref()).context("loading config")?;
    let config = args.apply(config);

    if write_config {
        let path = config_path.ok_or_else(|| anyhow!("no config directory available; pass --config"))?;
        config
            .save(&path)
            .with_context(|| format!("writing config to {}", path.display()))?;
        info!(path = %path.display(), "config saved");
        println!("Saved config to {}", path.display());
        return Ok(());
    }

    if let Err(err) = run(&config).await {
        error!("{}", err);
        eprintln!("{}", err.diagnostics());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(config: &AppConfig) -> Result<(), ShotError> {
    let leagues = config.leagues()?;
    let season = config.season()?;
    let output = config.output_path();

    let client = UnderstatClient::new(config.provider_settings())?;
    let scraper = ShotDataScraper::new(client).with_options(config.aggregate_options()?);
    let report = scraper.run_to_file(&leagues, &season, &output).await?;

    println!(
        "Wrote {} shots from {} matches to {}",
        report.dataset.len(),
        report.matches - report.skipped.len(),
        output.display()
    );
    if !report.skipped.is_empty() {
        println!("Skipped {} matches:", report.skipped.len());
        for s in &report.skipped {
            println!("  {} ({}): {}", s.id, s.league, s.error);
        }
    }
    Ok(())
}
