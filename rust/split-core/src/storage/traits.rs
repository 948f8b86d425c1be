// rust/split-core/src/storage/traits.rs

//! Storage abstraction traits for the split planner.
//!
//! This module defines the core traits for storage backends, allowing
//! different implementations (local filesystem, in-memory, a distributed
//! block store) to be used interchangeably.

use std::io::{Read, Write};
use std::path::Path;

use crate::error::Result;

/// Metadata about a stored object.
#[derive(Debug, Clone)]
pub struct ObjectMeta {
    /// Size of the object in bytes.
    pub size: u64,
    /// Last modification time, if available.
    pub modified: Option<std::time::SystemTime>,
    /// Whether this object is a directory.
    pub is_dir: bool,
}

/// Placement of one physical block of a stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLocation {
    /// Hosts holding a replica of the block.
    pub hosts: Vec<String>,
    /// Byte offset of the block within the file.
    pub offset: u64,
    /// Length of the block in bytes.
    pub length: u64,
}

impl BlockLocation {
    pub fn new(hosts: Vec<String>, offset: u64, length: u64) -> Self {
        Self {
            hosts,
            offset,
            length,
        }
    }

    /// Exclusive end offset of the block.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.length)
    }

    /// Number of bytes of this block inside `[start, end)`.
    pub fn overlap(&self, start: u64, end: u64) -> u64 {
        self.end().min(end).saturating_sub(self.offset.max(start))
    }
}

/// A handle for reading from storage.
pub trait StorageReader: Read + Send {
    /// Returns the total size of the object in bytes.
    fn size(&self) -> u64;
}

/// A handle for writing to storage.
///
/// This trait extends `Write` with a method to finalize the write operation.
pub trait StorageWriter: Write + Send {
    /// Finishes the write operation, ensuring all data is persisted.
    ///
    /// This method must be called to complete the write. After calling
    /// `finish`, the writer should not be used again.
    ///
    /// # Errors
    ///
    /// Returns an error if the finalization fails.
    fn finish(self: Box<Self>) -> Result<()>;
}

/// The core storage backend trait.
///
/// Besides plain object access, a backend answers the locality lookup the
/// host weighting relies on: which hosts store which blocks of a file.
///
/// # Object Safety
///
/// This trait is object-safe and can be used with `Arc<dyn StorageBackend>`.
pub trait StorageBackend: Send + Sync {
    /// Checks if an object exists at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the existence check fails (e.g., permission denied).
    fn exists(&self, path: &Path) -> Result<bool>;

    /// Retrieves metadata for an object.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::NotFound`](crate::SplitError::NotFound) if the
    /// object doesn't exist, or a storage error if metadata cannot be read.
    fn metadata(&self, path: &Path) -> Result<ObjectMeta>;

    /// Opens an object for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the object doesn't exist or cannot be opened.
    fn open_read(&self, path: &Path) -> Result<Box<dyn StorageReader>>;

    /// Opens an object for writing.
    ///
    /// If the object already exists, it will be overwritten.
    /// Parent directories will be created if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be created or opened.
    fn open_write(&self, path: &Path) -> Result<Box<dyn StorageWriter>>;

    /// Lists the entries of a directory, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::NotFound`](crate::SplitError::NotFound) if the
    /// directory doesn't exist, or an error if the listing fails.
    fn list(&self, prefix: &Path) -> Result<Vec<String>>;

    /// Creates a directory and all parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Returns the blocks of `path` overlapping `[start, start + length)`,
    /// ordered by offset.
    ///
    /// Blocks are reported whole; callers clip them to the requested range.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist or the lookup fails.
    fn block_locations(&self, path: &Path, start: u64, length: u64)
        -> Result<Vec<BlockLocation>>;
}
