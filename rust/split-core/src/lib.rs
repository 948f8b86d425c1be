// rust/split-core/src/lib.rs

//! Work Split Planner - Core Library
//!
//! This crate groups descriptor files (references to units of work over byte
//! ranges of stored files) into a bounded number of splits, computes for
//! each split the hosts storing most of its data, and provides the codec
//! and reader a worker uses to consume its split.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod locality;
pub mod planner;
pub mod split;
pub mod storage;

// Re-export commonly used types for convenience
pub use config::PlannerConfig;
pub use descriptor::{DescriptorFile, DescriptorResolver, StorageDescriptorResolver, WorkDescriptor};
pub use error::{Result, SplitError};
pub use locality::{HostWeightEstimator, HostWeights};
pub use planner::{discover_references, SplitPlanner};
pub use split::{Codec, Locatable, SequentialReader, SplitRecord};
pub use storage::{BlockLocation, LocalStorage, MemoryStorage, ObjectMeta, StorageBackend};
