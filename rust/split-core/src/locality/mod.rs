// rust/split-core/src/locality/mod.rs

//! Host weighting for data locality.
//!
//! For a set of work descriptors, every host is credited with the bytes it
//! stores of each descriptor's byte range, using the block placement the
//! storage backend reports. The heaviest hosts are then reported as the
//! preferred locations of the split.
//!
//! # Example
//!
//! ```no_run
//! use split_core::descriptor::WorkDescriptor;
//! use split_core::locality::HostWeightEstimator;
//! use split_core::storage::{LocalStorage, StorageBackend};
//! use split_core::config::StorageConfig;
//! use std::sync::Arc;
//!
//! let storage: Arc<dyn StorageBackend> =
//!     Arc::new(LocalStorage::new(&StorageConfig::default()).unwrap());
//! let estimator = HostWeightEstimator::new(storage);
//!
//! let hosts = estimator
//!     .estimate(&[WorkDescriptor::for_file("events/part-0").with_range(0, Some(4096))])
//!     .unwrap();
//! ```

mod estimator;
mod weights;

pub use estimator::HostWeightEstimator;
pub use weights::{select_top_hosts, HostWeights, LOCALITY_THRESHOLD, MIN_LOCATION_NAMES};
