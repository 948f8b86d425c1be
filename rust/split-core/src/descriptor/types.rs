// rust/split-core/src/descriptor/types.rs

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitError};
use crate::storage::StorageBackend;

/// A unit of data-processing work pointing at a byte range of a file.
///
/// Only `source_file_path`, `range_start` and `range_end` are read by the
/// planner; `properties` carries the rest of the job payload untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDescriptor {
    /// File the work reads from. Descriptors without one are still grouped
    /// but take no part in host weighting.
    pub source_file_path: Option<String>,
    /// Inclusive start offset of the byte range.
    pub range_start: u64,
    /// Exclusive end offset; `None` means end of file.
    pub range_end: Option<u64>,
    /// Opaque job properties.
    pub properties: BTreeMap<String, String>,
}

impl WorkDescriptor {
    /// Descriptor covering the whole of `path`.
    pub fn for_file(path: impl Into<String>) -> Self {
        Self {
            source_file_path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Sets the byte range `[start, end)`; `end = None` reads to end of file.
    #[must_use]
    pub fn with_range(mut self, start: u64, end: Option<u64>) -> Self {
        self.range_start = start;
        self.range_end = end;
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Contents of one descriptor file: a lone descriptor or a container of many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DescriptorFile {
    Single(WorkDescriptor),
    Container(Vec<WorkDescriptor>),
}

impl DescriptorFile {
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container(_))
    }

    /// Flattens into descriptors, keeping container order.
    pub fn into_descriptors(self) -> Vec<WorkDescriptor> {
        match self {
            Self::Single(descriptor) => vec![descriptor],
            Self::Container(descriptors) => descriptors,
        }
    }

    /// Serializes with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| {
            SplitError::serialization(format!("failed to serialize descriptor file: {e}"))
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| {
            SplitError::serialization(format!("failed to deserialize descriptor file: {e}"))
        })
    }

    /// Writes the serialized file to `path` in `storage`.
    pub fn write_to(&self, storage: &dyn StorageBackend, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        let mut writer = storage.open_write(path)?;
        writer.write_all(&bytes).map_err(|e| {
            SplitError::storage_with_source(path, "failed to write descriptor file", e)
        })?;
        writer.finish()
    }
}
