/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Path defaults
pub const DEFAULT_INPUT_PATH: &str = "./data/guide.xml";
pub const DEFAULT_OUTPUT_PATH: &str = "./data/guide_with_posters.xml";
pub const DEFAULT_CACHE_PATH: &str = "./data/poster_cache.json";
pub const DEFAULT_LOG_PATH: &str = "./logs/xmltv-posters.log";
pub const DEFAULT_ASSETS_PATH: &str = "./assets/posters";

// Guide service (Jellyfin) defaults
pub const DEFAULT_JELLYFIN_URL: &str = "http://localhost:8096";
pub const DEFAULT_JELLYFIN_ENABLED: bool = true;
pub const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 10;

// Behavior defaults
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_SHOW_PROGRESS_ETA: bool = true;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOOKUP_DELAY_MS: u64 = 200;

// Lookup (TVmaze) defaults
pub const DEFAULT_LOOKUP_BASE_URL: &str = "https://api.tvmaze.com";
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;
