// rust/split-core/src/locality/estimator.rs

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use super::weights::{select_top_hosts, HostWeights, LOCALITY_THRESHOLD, MIN_LOCATION_NAMES};
use crate::config::LocalityConfig;
use crate::descriptor::WorkDescriptor;
use crate::error::{Result, SplitError};
use crate::storage::StorageBackend;

/// Ranks the hosts storing the most bytes of a set of descriptors.
///
/// Each call builds its own [`HostWeights`], so one estimator can be shared
/// across threads.
pub struct HostWeightEstimator {
    storage: Arc<dyn StorageBackend>,
    min_location_names: usize,
    locality_threshold: f64,
}

impl HostWeightEstimator {
    /// Creates an estimator with the default selection tunables.
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            storage,
            min_location_names: MIN_LOCATION_NAMES,
            locality_threshold: LOCALITY_THRESHOLD,
        }
    }

    pub fn with_config(storage: Arc<dyn StorageBackend>, config: &LocalityConfig) -> Self {
        Self {
            storage,
            min_location_names: config.min_location_names,
            locality_threshold: config.locality_threshold,
        }
    }

    /// Returns the preferred hosts for `descriptors`, most weighted first.
    ///
    /// # Errors
    ///
    /// Returns an error if a length or block-location lookup fails, or if a
    /// descriptor's range ends before it starts.
    pub fn estimate(&self, descriptors: &[WorkDescriptor]) -> Result<Vec<String>> {
        let weights = self.accumulate(descriptors)?;
        Ok(select_top_hosts(
            &weights,
            self.min_location_names,
            self.locality_threshold,
        ))
    }

    /// Credits every host with the bytes it stores of each descriptor's range.
    pub fn accumulate(&self, descriptors: &[WorkDescriptor]) -> Result<HostWeights> {
        let mut weights = HostWeights::new();

        for descriptor in descriptors {
            let Some(source) = descriptor.source_file_path.as_deref() else {
                warn!(
                    "Skipping block location retrieval for descriptor with missing source file path - {:?}",
                    descriptor
                );
                continue;
            };
            let path = Path::new(source);

            let start = descriptor.range_start;
            let end = match descriptor.range_end {
                Some(end) => end,
                None => self.storage.metadata(path)?.size,
            };
            if end < start {
                return Err(SplitError::descriptor(
                    source,
                    format!("range end {end} is before range start {start}"),
                ));
            }

            let length = end - start;
            weights.add_range(length);
            if length == 0 {
                continue;
            }

            let blocks = self.storage.block_locations(path, start, length)?;
            debug!("{} [{}, {}) spans {} blocks", source, start, end, blocks.len());

            for block in &blocks {
                let bytes = block.overlap(start, end);
                if bytes == 0 {
                    continue;
                }
                for host in &block.hosts {
                    weights.add(host, bytes);
                }
            }
        }

        Ok(weights)
    }
}
