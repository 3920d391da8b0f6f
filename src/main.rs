use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use xmltv_posters::{
    config::Config,
    logo_assets::{GenericPosterMap, GenericPosterStorage},
    observability,
    pipeline::{EnrichmentOptions, EnrichmentPipeline, FileCheckpointSink},
    services::{GuideRefresher, JellyfinRefresher, NoopRefresher, PosterCache},
    sources::TvMazeClient,
    utils::GuideDocument,
};

#[derive(Parser)]
#[command(name = "xmltv-posters")]
#[command(version)]
#[command(about = "Adds show posters to the programmes of an XMLTV guide")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Source guide (overrides config file)
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Enriched guide destination (overrides config file)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Poster cache file (overrides config file)
    #[arg(long, value_name = "PATH")]
    cache: Option<PathBuf>,

    /// Log level (overrides config file)
    #[arg(short = 'v', long)]
    log_level: Option<String>,

    /// Skip the guide refresh request at the end of the run
    #[arg(long)]
    no_refresh: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, created) = Config::load_from_file(&cli.config)?;
    if let Some(input) = cli.input {
        config.paths.input = input;
    }
    if let Some(output) = cli.output {
        config.paths.output = output;
    }
    if let Some(cache) = cli.cache {
        config.paths.cache = cache;
    }
    if let Some(level) = cli.log_level {
        config.behavior.log_level = level;
    }
    if cli.no_refresh {
        config.jellyfin.enabled = false;
    }
    config.validate()?;

    observability::init_logging(&config.paths.log, &config.behavior.log_level)?;

    info!("Starting xmltv-posters v{}", env!("CARGO_PKG_VERSION"));
    if created {
        info!(
            "No configuration found, wrote defaults to: {}",
            cli.config.display()
        );
    } else {
        info!("Configuration loaded from: {}", cli.config.display());
    }

    if let Err(e) = run(&config).await {
        error!("Run failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}

async fn run(config: &Config) -> xmltv_posters::errors::AppResult<()> {
    GenericPosterStorage::new(config.paths.assets.clone()).report_missing_assets(&GenericPosterMap);

    let source = config.source_path();
    info!("Loading XML from {}", source.display());
    let mut document = GuideDocument::load(source)?;
    info!("Found {} programme entries", document.programmes().len());

    let mut cache = PosterCache::load(&config.paths.cache)?;

    let refresher: Box<dyn GuideRefresher> = if config.jellyfin.enabled {
        Box::new(JellyfinRefresher::new(&config.jellyfin)?)
    } else {
        Box::new(NoopRefresher)
    };

    let mut pipeline = EnrichmentPipeline::new(
        Box::new(TvMazeClient::new(&config.lookup)?),
        refresher,
        Box::new(FileCheckpointSink::new(config.paths.output.clone())),
        EnrichmentOptions::from_config(config),
    );

    pipeline.run(&mut document, &mut cache).await?;
    Ok(())
}
