use std::path::PathBuf;
use tracing::{debug, warn};

use super::generic::GenericPosterMap;

/// Directory of generic fallback posters and the `src` values pointing into it
#[derive(Debug, Clone)]
pub struct GenericPosterStorage {
    asset_dir: PathBuf,
}

impl GenericPosterStorage {
    pub fn new(asset_dir: PathBuf) -> Self {
        Self { asset_dir }
    }

    /// `src` attribute value for a generic poster file
    pub fn resolve(&self, file_name: &str) -> String {
        self.asset_dir.join(file_name).to_string_lossy().into_owned()
    }

    /// Generic poster files the table references but the directory lacks.
    ///
    /// Icons still point at them; this only exists so a misconfigured asset
    /// directory shows up in the log before the run.
    pub fn missing_assets(&self, map: &GenericPosterMap) -> Vec<&'static str> {
        map.asset_files()
            .into_iter()
            .filter(|file| !self.asset_dir.join(file).is_file())
            .collect()
    }

    pub fn report_missing_assets(&self, map: &GenericPosterMap) {
        let missing = self.missing_assets(map);
        if missing.is_empty() {
            debug!(
                "All generic posters present in {}",
                self.asset_dir.display()
            );
        } else {
            warn!(
                "Generic poster directory {} is missing: {}",
                self.asset_dir.display(),
                missing.join(", ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_joins_asset_dir() {
        let storage = GenericPosterStorage::new(PathBuf::from("/srv/assets"));
        assert_eq!(
            storage.resolve("generic_news.png"),
            std::path::Path::new("/srv/assets")
                .join("generic_news.png")
                .to_string_lossy()
        );
    }

    #[test]
    fn test_missing_assets() {
        let temp_dir = TempDir::new().unwrap();
        let storage = GenericPosterStorage::new(temp_dir.path().to_path_buf());
        let map = GenericPosterMap;

        assert_eq!(storage.missing_assets(&map).len(), map.asset_files().len());

        for file in map.asset_files() {
            std::fs::write(temp_dir.path().join(file), b"png").unwrap();
        }
        std::fs::remove_file(temp_dir.path().join("generic_weather.png")).unwrap();

        assert_eq!(storage.missing_assets(&map), vec!["generic_weather.png"]);
    }
}
