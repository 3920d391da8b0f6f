//! Poster enrichment driver
//!
//! Walks the guide's programmes in document order and gives every programme
//! that has a title but no icon exactly one icon, trying in turn:
//!
//! 1. the poster cache (a cached "no result" is final, no re-query)
//! 2. an upstream lookup, whose outcome is cached either way
//! 3. a generic poster chosen by category
//! 4. the generic "unknown" poster
//!
//! Cache and partial document are persisted together every `batch_size`
//! processed programmes and once more at the end, after which the downstream
//! guide service is asked to refresh.

use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use super::checkpoint::CheckpointSink;
use super::progress::{IconSource, RunStats, RunSummary, checkpoint_message};
use super::throttle::LookupThrottle;
use crate::config::Config;
use crate::errors::AppResult;
use crate::logo_assets::{GenericPosterMap, GenericPosterStorage, normalize_category};
use crate::services::{CacheLookup, GuideRefresher, PosterCache};
use crate::sources::PosterLookup;
use crate::utils::{GuideDocument, Programme, normalize_title};

/// Tunables for a run
#[derive(Debug, Clone)]
pub struct EnrichmentOptions {
    /// Processed programmes between checkpoints
    pub batch_size: usize,
    pub show_eta: bool,
    pub lookup_delay: Duration,
    /// Directory the generic poster paths point into
    pub asset_dir: PathBuf,
}

impl EnrichmentOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            batch_size: config.behavior.batch_size,
            show_eta: config.behavior.show_progress_eta,
            lookup_delay: config.behavior.lookup_delay,
            asset_dir: config.paths.assets.clone(),
        }
    }
}

pub struct EnrichmentPipeline {
    lookup: Box<dyn PosterLookup>,
    refresher: Box<dyn GuideRefresher>,
    sink: Box<dyn CheckpointSink>,
    throttle: LookupThrottle,
    generic_map: GenericPosterMap,
    generic_storage: GenericPosterStorage,
    batch_size: usize,
    show_eta: bool,
}

impl EnrichmentPipeline {
    pub fn new(
        lookup: Box<dyn PosterLookup>,
        refresher: Box<dyn GuideRefresher>,
        sink: Box<dyn CheckpointSink>,
        options: EnrichmentOptions,
    ) -> Self {
        Self {
            lookup,
            refresher,
            sink,
            throttle: LookupThrottle::fixed(options.lookup_delay),
            generic_map: GenericPosterMap,
            generic_storage: GenericPosterStorage::new(options.asset_dir),
            batch_size: options.batch_size.max(1),
            show_eta: options.show_eta,
        }
    }

    /// Enrich `document` in place, consulting and extending `cache`.
    ///
    /// Returns an error only for persistence failures; lookups and the final
    /// refresh never fail the run.
    pub async fn run(
        &mut self,
        document: &mut GuideDocument,
        cache: &mut PosterCache,
    ) -> AppResult<RunSummary> {
        let total = document.programmes().len();
        let mut stats = RunStats::start(total);

        for index in 0..total {
            let position = index + 1;
            let programme = &mut document.programmes_mut()[index];

            let Some(source) = self
                .enrich_programme(position, total, programme, cache, &mut stats)
                .await
            else {
                stats.skipped += 1;
                continue;
            };
            stats.record(source);

            if stats.processed % self.batch_size == 0 {
                self.sink.persist(document, cache)?;
                stats.persists += 1;
                info!(
                    "{}",
                    checkpoint_message(stats.processed, total, stats.elapsed(), self.show_eta)
                );
            }
        }

        self.sink.persist(document, cache)?;
        stats.persists += 1;

        let summary = stats.finish();
        info!("{}", summary.message());

        self.refresher.refresh().await;

        Ok(summary)
    }

    /// Give one programme its icon. `None` means the programme was skipped.
    async fn enrich_programme(
        &self,
        position: usize,
        total: usize,
        programme: &mut Programme,
        cache: &mut PosterCache,
        stats: &mut RunStats,
    ) -> Option<IconSource> {
        let title = match programme.title().map(str::trim) {
            Some(raw) if !raw.is_empty() => normalize_title(raw),
            _ => return None,
        };
        if programme.has_icon() {
            return None;
        }

        let mut source = None;

        // A title that normalizes to nothing ("New") has no usable key
        if !title.is_empty() {
            source = self
                .poster_for_title(position, total, &title, programme, cache, stats)
                .await;
        }

        if source.is_none() {
            let categories: Vec<String> = programme
                .categories()
                .iter()
                .map(|c| normalize_category(c))
                .filter(|c| !c.is_empty())
                .collect();

            if let Some(file) = self.generic_map.match_categories(&categories) {
                programme.set_icon(self.generic_storage.resolve(file));
                info!(
                    "[{}/{}] Added generic poster for {} ({:?})",
                    position, total, title, categories
                );
                source = Some(IconSource::Generic);
            }
        }

        if source.is_none() {
            programme.set_icon(self.generic_storage.resolve(self.generic_map.unknown()));
            info!(
                "[{}/{}] Added generic 'unknown' poster for {}",
                position, total, title
            );
            source = Some(IconSource::Unknown);
        }

        source
    }

    /// Cache first, upstream second. Only a real miss reaches the network and
    /// the throttle.
    async fn poster_for_title(
        &self,
        position: usize,
        total: usize,
        title: &str,
        programme: &mut Programme,
        cache: &mut PosterCache,
        stats: &mut RunStats,
    ) -> Option<IconSource> {
        match cache.lookup(title) {
            CacheLookup::Hit(url) => {
                programme.set_icon(url);
                info!("[{}/{}] (cache) {}", position, total, title);
                Some(IconSource::Cache)
            }
            CacheLookup::NoResult => None,
            CacheLookup::Miss => {
                let poster = self.lookup.lookup(title).await;
                stats.lookups += 1;
                cache.record(title, poster.clone());

                let source = match poster {
                    Some(url) => {
                        programme.set_icon(url);
                        info!("[{}/{}] (new) {}", position, total, title);
                        Some(IconSource::Lookup)
                    }
                    None => {
                        debug!("[{}/{}] No poster found for {}", position, total, title);
                        None
                    }
                };

                self.throttle.wait().await;
                source
            }
        }
    }
}
