mod config;
mod error;
mod tracker;

pub use config::HttpTrackerConfig;
pub use tracker::HttpTracker;
