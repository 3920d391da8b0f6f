use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{AppError, AppResult};

pub mod defaults;
pub mod duration_serde;

use defaults::*;
use duration_serde::duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub jellyfin: JellyfinConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
}

/// Where the guide, cache, log and generic poster assets live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_input_path")]
    pub input: PathBuf,
    #[serde(default = "default_output_path")]
    pub output: PathBuf,
    #[serde(default = "default_cache_path")]
    pub cache: PathBuf,
    #[serde(default = "default_log_path")]
    pub log: PathBuf,
    /// Directory holding the generic_*.png fallback posters
    #[serde(default = "default_assets_path")]
    pub assets: PathBuf,
}

/// Downstream guide service that is asked to refresh once the output is written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JellyfinConfig {
    #[serde(default = "default_jellyfin_enabled")]
    pub enabled: bool,
    #[serde(default = "default_jellyfin_url")]
    pub url: String,
    #[serde(default)]
    pub apikey: String,
    #[serde(default = "default_refresh_timeout", with = "duration")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Number of processed programmes between checkpoints
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_show_progress_eta")]
    pub show_progress_eta: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Pause after every upstream lookup
    #[serde(default = "default_lookup_delay", with = "duration")]
    pub lookup_delay: Duration,
}

/// Upstream show-search API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_lookup_base_url")]
    pub base_url: String,
    #[serde(default = "default_lookup_timeout", with = "duration")]
    pub timeout: Duration,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_input_path() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT_PATH)
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_PATH)
}

fn default_log_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_PATH)
}

fn default_assets_path() -> PathBuf {
    PathBuf::from(DEFAULT_ASSETS_PATH)
}

fn default_jellyfin_enabled() -> bool {
    DEFAULT_JELLYFIN_ENABLED
}

fn default_jellyfin_url() -> String {
    DEFAULT_JELLYFIN_URL.to_string()
}

fn default_refresh_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REFRESH_TIMEOUT_SECS)
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_show_progress_eta() -> bool {
    DEFAULT_SHOW_PROGRESS_ETA
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_lookup_delay() -> Duration {
    Duration::from_millis(DEFAULT_LOOKUP_DELAY_MS)
}

fn default_lookup_base_url() -> String {
    DEFAULT_LOOKUP_BASE_URL.to_string()
}

fn default_lookup_timeout() -> Duration {
    Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS)
}

fn default_user_agent() -> String {
    format!("xmltv-posters/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: default_input_path(),
            output: default_output_path(),
            cache: default_cache_path(),
            log: default_log_path(),
            assets: default_assets_path(),
        }
    }
}

impl Default for JellyfinConfig {
    fn default() -> Self {
        Self {
            enabled: default_jellyfin_enabled(),
            url: default_jellyfin_url(),
            apikey: String::new(),
            timeout: default_refresh_timeout(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            show_progress_eta: default_show_progress_eta(),
            log_level: default_log_level(),
            lookup_delay: default_lookup_delay(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_lookup_base_url(),
            timeout: default_lookup_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from `config_file`, writing a default file first if
    /// none exists yet.
    ///
    /// Returns the configuration and whether the file was freshly created, so
    /// the caller can report it once logging is up.
    pub fn load_from_file(config_file: &Path) -> AppResult<(Self, bool)> {
        if config_file.exists() {
            let contents = std::fs::read_to_string(config_file)
                .map_err(|e| AppError::file_access(config_file, e))?;
            Ok((toml::from_str(&contents)?, false))
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            if let Some(parent) = config_file.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| AppError::file_access(parent, e))?;
            }
            std::fs::write(config_file, contents)
                .map_err(|e| AppError::file_access(config_file, e))?;
            Ok((default_config, true))
        }
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> AppResult<()> {
        if self.behavior.batch_size == 0 {
            return Err(AppError::configuration(
                "behavior.batch_size must be greater than zero",
            ));
        }

        let level = self.behavior.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(AppError::configuration(format!(
                "behavior.log_level '{}' is not one of {}",
                self.behavior.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        url::Url::parse(&self.lookup.base_url).map_err(|e| {
            AppError::configuration(format!(
                "lookup.base_url '{}' is not a valid URL: {e}",
                self.lookup.base_url
            ))
        })?;

        if self.jellyfin.enabled {
            url::Url::parse(&self.jellyfin.url).map_err(|e| {
                AppError::configuration(format!(
                    "jellyfin.url '{}' is not a valid URL: {e}",
                    self.jellyfin.url
                ))
            })?;
        }

        Ok(())
    }

    /// The document a run starts from: the previous output when present so an
    /// interrupted run resumes, the pristine input otherwise.
    pub fn source_path(&self) -> &Path {
        if self.paths.output.exists() {
            &self.paths.output
        } else {
            &self.paths.input
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let (config, created) = Config::load_from_file(&path).unwrap();
        assert!(created);
        assert!(path.exists());
        assert_eq!(config.behavior.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.behavior.lookup_delay, Duration::from_millis(200));

        let (reloaded, created) = Config::load_from_file(&path).unwrap();
        assert!(!created);
        assert_eq!(reloaded.paths.cache, config.paths.cache);
        assert_eq!(reloaded.lookup.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[paths]
input = "/srv/epg/guide.xml"

[jellyfin]
url = "http://jellyfin:8096"
apikey = "secret"

[behavior]
batch_size = 25
show_progress_eta = false
lookup_delay = "1s"
"#,
        )
        .unwrap();

        let (config, _) = Config::load_from_file(&path).unwrap();
        assert_eq!(config.paths.input, PathBuf::from("/srv/epg/guide.xml"));
        assert_eq!(config.paths.output, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(config.jellyfin.apikey, "secret");
        assert_eq!(config.behavior.batch_size, 25);
        assert!(!config.behavior.show_progress_eta);
        assert_eq!(config.behavior.lookup_delay, Duration::from_secs(1));
        assert_eq!(config.behavior.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = Config::default();
        config.behavior.batch_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut config = Config::default();
        config.behavior.log_level = "chatty".to_string();
        assert!(config.validate().is_err());

        config.behavior.log_level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_disabled_jellyfin_skips_url_check() {
        let mut config = Config::default();
        config.jellyfin.url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.jellyfin.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_source_path_prefers_existing_output() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.input = temp_dir.path().join("guide.xml");
        config.paths.output = temp_dir.path().join("guide_with_posters.xml");

        assert_eq!(config.source_path(), config.paths.input.as_path());

        std::fs::write(&config.paths.output, "<tv/>").unwrap();
        assert_eq!(config.source_path(), config.paths.output.as_path());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[behavior\nbatch_size = ").unwrap();
        assert!(matches!(
            Config::load_from_file(&path),
            Err(AppError::ConfigParse(_))
        ));
    }
}
