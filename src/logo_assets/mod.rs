//! Generic fallback posters: the category table and the asset directory it points into

pub mod generic;
pub mod storage;

pub use generic::{GENERIC_UNKNOWN, GenericPosterMap, normalize_category};
pub use storage::GenericPosterStorage;
