//! Collaborators of the enrichment pipeline that own external state

pub mod guide_refresh;
pub mod poster_cache;

pub use guide_refresh::{GuideRefresher, JellyfinRefresher, NoopRefresher};
pub use poster_cache::{CacheLookup, PosterCache};
