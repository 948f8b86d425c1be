// rust/split-core/src/storage/mod.rs

//! Storage abstraction for the split planner.
//!
//! This module provides traits and implementations for storage backends,
//! allowing the planner to read descriptor files, look up block placement
//! and write encoded splits through a unified interface.
//!
//! # Example
//!
//! ```no_run
//! use split_core::config::StorageConfig;
//! use split_core::storage::{LocalStorage, StorageBackend};
//! use std::path::Path;
//!
//! let config = StorageConfig::default();
//! let storage = LocalStorage::new(&config).unwrap();
//!
//! let size = storage.metadata(Path::new("input/data.avro")).unwrap().size;
//! for block in storage.block_locations(Path::new("input/data.avro"), 0, size).unwrap() {
//!     println!("{}+{} on {:?}", block.offset, block.length, block.hosts);
//! }
//! ```

mod local;
mod memory;
mod traits;

pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use traits::{BlockLocation, ObjectMeta, StorageBackend, StorageReader, StorageWriter};
