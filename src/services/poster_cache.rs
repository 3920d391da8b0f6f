//! Persistent poster cache
//!
//! Maps normalized titles to the poster URL found for them, or to `null` when
//! the lookup came back empty. A present key means "already asked", so titles
//! are never sent upstream twice, across runs too.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::utils::fs::write_atomic;

/// What the cache knows about a title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookup<'a> {
    /// Never looked up
    Miss,
    /// Looked up before, nothing was found
    NoResult,
    /// Looked up before, this poster was found
    Hit(&'a str),
}

#[derive(Debug, Clone)]
pub struct PosterCache {
    path: PathBuf,
    entries: BTreeMap<String, Option<String>>,
}

impl PosterCache {
    /// Empty cache that will be saved to `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            entries: BTreeMap::new(),
        }
    }

    /// Load the cache file; a missing file yields an empty cache, malformed
    /// content is an error.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            info!("No existing cache found. Starting fresh.");
            return Ok(Self::new(path.to_path_buf()));
        }

        let content = std::fs::read(path).map_err(|e| AppError::file_access(path, e))?;
        let entries: BTreeMap<String, Option<String>> =
            serde_json::from_slice(&content).map_err(|e| AppError::cache(path, e))?;
        info!("Loaded cache with {} entries.", entries.len());

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Overwrite the cache file with the full map, pretty-printed UTF-8 JSON
    pub fn save(&self) -> AppResult<()> {
        let mut bytes = serde_json::to_vec_pretty(&self.entries)?;
        bytes.push(b'\n');
        write_atomic(&self.path, &bytes)
    }

    pub fn lookup(&self, key: &str) -> CacheLookup<'_> {
        match self.entries.get(key) {
            None => CacheLookup::Miss,
            Some(None) => CacheLookup::NoResult,
            Some(Some(url)) if url.is_empty() => CacheLookup::NoResult,
            Some(Some(url)) => CacheLookup::Hit(url),
        }
    }

    /// Record the outcome of a lookup, `None` meaning nothing was found
    pub fn record(&mut self, key: impl Into<String>, poster: Option<String>) {
        self.entries.insert(key.into(), poster);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &BTreeMap<String, Option<String>> {
        &self.entries
    }
}
