//! Poster enrichment pipeline
//!
//! - **Enrichment**: the per-programme cache/lookup/fallback driver
//! - **Checkpoint**: where cache and partial guide are persisted
//! - **Progress**: run statistics, ETA and summary lines
//! - **Throttle**: fixed delay after upstream lookups

pub mod checkpoint;
pub mod enrichment;
pub mod progress;
pub mod throttle;

pub use checkpoint::{CheckpointSink, FileCheckpointSink};
pub use enrichment::{EnrichmentOptions, EnrichmentPipeline};
pub use progress::{IconSource, RunStats, RunSummary};
pub use throttle::LookupThrottle;
