// rust/split-core/src/planner/mod.rs

//! Split planning.
//!
//! The planner partitions an ordered list of descriptor-file references into
//! at most `max_workers` contiguous groups of near-equal size and attaches
//! to each group the preferred hosts of its members.
//!
//! # Example
//!
//! ```no_run
//! use split_core::config::PlannerConfig;
//! use split_core::planner::SplitPlanner;
//! use split_core::storage::LocalStorage;
//! use std::sync::Arc;
//!
//! let config = PlannerConfig::default();
//! let storage = Arc::new(LocalStorage::new(&config.storage).unwrap());
//! let planner = SplitPlanner::new(storage, &config);
//!
//! let splits = planner
//!     .plan_inputs(&["jobs/pending".to_string()], config.planner.max_workers)
//!     .unwrap();
//! for split in &splits {
//!     println!("{:?} -> {:?}", split.paths(), split.preferred_hosts());
//! }
//! ```

mod discovery;

pub use discovery::discover_references;

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::PlannerConfig;
use crate::descriptor::{DescriptorResolver, StorageDescriptorResolver};
use crate::error::{Result, SplitError};
use crate::locality::HostWeightEstimator;
use crate::split::SplitRecord;
use crate::storage::StorageBackend;

/// Number of references per split for `total` references and an optional
/// worker bound. A bound of zero counts as one; no bound gives one
/// reference per split.
pub fn group_size(total: usize, max_workers: Option<u32>) -> usize {
    let workers = match max_workers {
        Some(bound) => (bound as usize).max(1),
        None => total,
    };
    total.div_ceil(workers.max(1)).max(1)
}

/// Builds locality-annotated splits from descriptor-file references.
pub struct SplitPlanner {
    storage: Arc<dyn StorageBackend>,
    resolver: Arc<dyn DescriptorResolver>,
    estimator: HostWeightEstimator,
}

impl SplitPlanner {
    /// Creates a planner reading descriptor files and block placement from
    /// `storage`.
    pub fn new(storage: Arc<dyn StorageBackend>, config: &PlannerConfig) -> Self {
        let resolver = Arc::new(StorageDescriptorResolver::new(
            Arc::clone(&storage),
            config.planner.container_extension.clone(),
        ));
        let estimator = HostWeightEstimator::with_config(Arc::clone(&storage), &config.locality);
        Self {
            storage,
            resolver,
            estimator,
        }
    }

    /// Replaces the descriptor resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn DescriptorResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Partitions `references` into at most `max_workers` splits.
    ///
    /// Each reference's hosts are estimated from its own descriptors; a
    /// split's preferred hosts are the union of its members' hosts.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::NoInput`] for an empty list. Any resolution or
    /// storage failure aborts planning without a partial result.
    pub fn plan(&self, references: &[String], max_workers: Option<u32>) -> Result<Vec<SplitRecord>> {
        if references.is_empty() {
            return Err(SplitError::NoInput);
        }

        let host_lists = references
            .iter()
            .map(|reference| self.hosts_for(reference))
            .collect::<Result<Vec<_>>>()?;

        let size = group_size(references.len(), max_workers);
        let splits: Vec<SplitRecord> = references
            .chunks(size)
            .zip(host_lists.chunks(size))
            .map(|(paths, hosts)| SplitRecord::new(paths.to_vec(), hosts.iter().flatten().cloned()))
            .collect();

        info!(
            "Planned {} splits of up to {} references from {} references",
            splits.len(),
            size,
            references.len()
        );
        Ok(splits)
    }

    /// Discovers references under `inputs` and plans them.
    ///
    /// # Errors
    ///
    /// See [`discover_references`] and [`plan`](Self::plan).
    pub fn plan_inputs(&self, inputs: &[String], max_workers: Option<u32>) -> Result<Vec<SplitRecord>> {
        let references = discover_references(&*self.storage, inputs)?;
        self.plan(&references, max_workers)
    }

    fn hosts_for(&self, reference: &str) -> Result<Vec<String>> {
        let descriptors = self.resolver.resolve(reference)?;
        let hosts = self.estimator.estimate(&descriptors)?;
        debug!("{} ({} descriptors) prefers {:?}", reference, descriptors.len(), hosts);
        Ok(hosts)
    }
}
