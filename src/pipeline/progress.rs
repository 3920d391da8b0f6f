//! Run statistics and the progress lines logged at checkpoints

use std::time::{Duration, Instant};

use crate::utils::human_format::{format_minutes, format_percentage};

/// How a programme ended up with its icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSource {
    /// Fresh upstream lookup
    Lookup,
    /// Poster URL already in the cache
    Cache,
    /// Generic poster picked by category
    Generic,
    /// Unconditional fallback poster
    Unknown,
}

/// Counters for a single run; never persisted
#[derive(Debug, Clone)]
pub struct RunStats {
    started: Instant,
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    pub added_new: usize,
    pub added_cached: usize,
    pub added_generic: usize,
    pub added_unknown: usize,
    pub lookups: usize,
    pub persists: usize,
}

impl RunStats {
    pub fn start(total: usize) -> Self {
        Self {
            started: Instant::now(),
            total,
            processed: 0,
            skipped: 0,
            added_new: 0,
            added_cached: 0,
            added_generic: 0,
            added_unknown: 0,
            lookups: 0,
            persists: 0,
        }
    }

    pub fn record(&mut self, source: IconSource) {
        self.processed += 1;
        match source {
            IconSource::Lookup => self.added_new += 1,
            IconSource::Cache => self.added_cached += 1,
            IconSource::Generic => self.added_generic += 1,
            IconSource::Unknown => self.added_unknown += 1,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn finish(&self) -> RunSummary {
        RunSummary {
            total: self.total,
            processed: self.processed,
            skipped: self.skipped,
            added_new: self.added_new,
            added_cached: self.added_cached,
            added_generic: self.added_generic,
            added_unknown: self.added_unknown,
            lookups: self.lookups,
            persists: self.persists,
            elapsed: self.elapsed(),
        }
    }
}

/// What a finished run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    pub added_new: usize,
    pub added_cached: usize,
    pub added_generic: usize,
    pub added_unknown: usize,
    pub lookups: usize,
    pub persists: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn message(&self) -> String {
        format!(
            "Done in {}. Posters added: {} new, {} cached ({} generic, {} unknown, {} skipped)",
            format_minutes(self.elapsed),
            self.added_new,
            self.added_cached,
            self.added_generic,
            self.added_unknown,
            self.skipped
        )
    }
}

/// Remaining time extrapolated from the average time per processed item
pub fn estimate_remaining(processed: usize, total: usize, elapsed: Duration) -> Option<Duration> {
    if processed == 0 || elapsed.is_zero() {
        return None;
    }
    let per_item = elapsed.as_secs_f64() / processed as f64;
    let remaining = total.saturating_sub(processed) as f64;
    Some(Duration::from_secs_f64(per_item * remaining))
}

/// Progress line logged after each checkpoint
pub fn checkpoint_message(
    processed: usize,
    total: usize,
    elapsed: Duration,
    show_eta: bool,
) -> String {
    let base = format!(
        "Checkpoint: {}/{} ({})",
        processed,
        total,
        format_percentage(processed, total)
    );

    match estimate_remaining(processed, total, elapsed).filter(|_| show_eta) {
        Some(eta) => format!("{base} | ETA ~ {}", format_minutes(eta)),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_remaining() {
        assert_eq!(
            estimate_remaining(10, 30, Duration::from_secs(60)),
            Some(Duration::from_secs(120))
        );
        assert_eq!(estimate_remaining(0, 30, Duration::from_secs(60)), None);
        assert_eq!(estimate_remaining(10, 30, Duration::ZERO), None);
        assert_eq!(
            estimate_remaining(30, 30, Duration::from_secs(60)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_checkpoint_message_with_eta() {
        assert_eq!(
            checkpoint_message(100, 400, Duration::from_secs(60), true),
            "Checkpoint: 100/400 (25.0%) | ETA ~ 3.0 min"
        );
    }

    #[test]
    fn test_checkpoint_message_without_eta() {
        assert_eq!(
            checkpoint_message(100, 400, Duration::from_secs(60), false),
            "Checkpoint: 100/400 (25.0%)"
        );
        assert_eq!(
            checkpoint_message(2, 5, Duration::ZERO, true),
            "Checkpoint: 2/5 (40.0%)"
        );
    }

    #[test]
    fn test_record_counts_by_source() {
        let mut stats = RunStats::start(4);
        stats.record(IconSource::Lookup);
        stats.record(IconSource::Cache);
        stats.record(IconSource::Generic);
        stats.record(IconSource::Unknown);

        let summary = stats.finish();
        assert_eq!(summary.processed, 4);
        assert_eq!(summary.added_new, 1);
        assert_eq!(summary.added_cached, 1);
        assert_eq!(summary.added_generic, 1);
        assert_eq!(summary.added_unknown, 1);
        assert!(summary.message().contains("1 new, 1 cached"));
    }
}
