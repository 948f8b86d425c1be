// rust/split-core/src/descriptor/resolver.rs

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::types::{DescriptorFile, WorkDescriptor};
use crate::error::{Result, SplitError};
use crate::storage::StorageBackend;

/// Turns a descriptor-file reference into the descriptors it holds.
pub trait DescriptorResolver: Send + Sync {
    /// Resolves `reference` into a flat, ordered list of descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::NotFound`] if the reference does not exist.
    fn resolve(&self, reference: &str) -> Result<Vec<WorkDescriptor>>;
}

impl<F> DescriptorResolver for F
where
    F: Fn(&str) -> Result<Vec<WorkDescriptor>> + Send + Sync,
{
    fn resolve(&self, reference: &str) -> Result<Vec<WorkDescriptor>> {
        self(reference)
    }
}

/// Reads bincode descriptor files through a storage backend.
///
/// References ending in the container extension must hold a
/// [`DescriptorFile::Container`]; all others a [`DescriptorFile::Single`].
pub struct StorageDescriptorResolver {
    storage: Arc<dyn StorageBackend>,
    container_extension: String,
}

impl StorageDescriptorResolver {
    pub fn new(storage: Arc<dyn StorageBackend>, container_extension: impl Into<String>) -> Self {
        Self {
            storage,
            container_extension: container_extension.into(),
        }
    }

    fn is_container_reference(&self, reference: &str) -> bool {
        reference.ends_with(&self.container_extension)
    }

    fn read_file(&self, reference: &str) -> Result<DescriptorFile> {
        let path = Path::new(reference);
        let mut reader = self.storage.open_read(path)?;

        let mut bytes = Vec::with_capacity(reader.size() as usize);
        reader.read_to_end(&mut bytes).map_err(|e| {
            SplitError::storage_with_source(path, "failed to read descriptor file", e)
        })?;

        DescriptorFile::from_bytes(&bytes)
            .map_err(|e| SplitError::descriptor(reference, e.to_string()))
    }
}

impl DescriptorResolver for StorageDescriptorResolver {
    fn resolve(&self, reference: &str) -> Result<Vec<WorkDescriptor>> {
        let file = self.read_file(reference)?;

        let expect_container = self.is_container_reference(reference);
        if file.is_container() != expect_container {
            let expected = if expect_container { "container" } else { "single" };
            return Err(SplitError::descriptor(
                reference,
                format!("expected a {expected} descriptor file"),
            ));
        }

        let descriptors = file.into_descriptors();
        debug!("Resolved {} descriptors from {}", descriptors.len(), reference);
        Ok(descriptors)
    }
}
