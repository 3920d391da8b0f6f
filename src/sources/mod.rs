//! Upstream poster sources

pub mod tvmaze;

pub use tvmaze::{PosterLookup, ShowSearchResponse, TvMazeClient};
