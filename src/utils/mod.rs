//! Utility modules shared across the enrichment run

pub mod fs;
pub mod human_format;
pub mod title;
pub mod xmltv_document;

pub use title::normalize_title;
pub use xmltv_document::{GuideDocument, Programme};
