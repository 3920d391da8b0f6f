use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

use crate::errors::AppResult;
use crate::services::PosterCache;
use crate::utils::GuideDocument;
use crate::utils::human_format::format_duration;

/// Destination for checkpoints: the cache and the partial document are always
/// persisted together so an interrupted run can resume from either.
pub trait CheckpointSink: Send {
    fn persist(&mut self, document: &GuideDocument, cache: &PosterCache) -> AppResult<()>;
}

/// Writes the cache to its own path and the document to the output path
#[derive(Debug, Clone)]
pub struct FileCheckpointSink {
    output: PathBuf,
}

impl FileCheckpointSink {
    pub fn new(output: PathBuf) -> Self {
        Self { output }
    }
}

impl CheckpointSink for FileCheckpointSink {
    fn persist(&mut self, document: &GuideDocument, cache: &PosterCache) -> AppResult<()> {
        let started = Instant::now();
        cache.save()?;
        document.save(&self.output)?;
        debug!(
            "Persisted {} cache entries to {} and guide to {} in {}",
            cache.len(),
            cache.path().display(),
            self.output.display(),
            format_duration(started.elapsed())
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_persists_cache_and_document() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("cache.json");
        let output_path = temp_dir.path().join("out").join("guide.xml");

        let mut cache = PosterCache::new(cache_path.clone());
        cache.record("Show", None);
        let document = GuideDocument::parse("<tv/>").unwrap();

        let mut sink = FileCheckpointSink::new(output_path.clone());
        sink.persist(&document, &cache).unwrap();

        assert!(cache_path.exists());
        assert!(std::fs::read_to_string(&output_path).unwrap().ends_with("<tv/>"));
    }
}
