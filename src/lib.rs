//! Platform Catalog Library
//!
//! An in-memory game catalog kept in sync with a tree of per-platform files.

pub mod catalog;
pub mod config;
pub mod curation;
pub mod task_queue;

// Re-export commonly used types for convenience
pub use catalog::{
    CatalogManager, CatalogOptions, ParseError, PlatformFile, PlatformKey, Record, SaveReport,
    UpsertOutcome, WriteError,
};
pub use task_queue::{QueueError, TaskHandle, TaskQueue};
