pub mod config;
pub mod errors;
pub mod logo_assets;
pub mod observability;
pub mod pipeline;
pub mod services;
pub mod sources;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
