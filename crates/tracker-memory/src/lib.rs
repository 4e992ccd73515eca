mod store;
mod tracker;

pub use store::{Call, Operation, RecordedRun};
pub use tracker::{MemoryTracker, MemoryTrackerConfig};
