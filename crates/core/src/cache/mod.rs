//! Time-bounded, content-addressed persistence for discovery results

pub mod store;

// Re-export the main cache type
pub use store::{CacheStore, bin_key};
