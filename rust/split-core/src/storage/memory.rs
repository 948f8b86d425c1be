// rust/split-core/src/storage/memory.rs

//! In-memory storage backend with explicit block placement.
//!
//! Useful when the caller already knows where each block of a file lives,
//! and for exercising the planner without a filesystem. Directories are
//! implicit: a path is a directory when some stored object lies below it.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::traits::{BlockLocation, ObjectMeta, StorageBackend, StorageReader, StorageWriter};
use crate::error::{Result, SplitError};

#[derive(Debug, Clone, Default)]
struct MemoryObject {
    data: Vec<u8>,
    size: u64,
    blocks: Vec<BlockLocation>,
}

type ObjectMap = BTreeMap<PathBuf, MemoryObject>;

/// In-memory storage backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<Mutex<ObjectMap>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` at `path` with no block placement.
    pub fn put(&self, path: impl Into<PathBuf>, data: Vec<u8>) {
        let size = data.len() as u64;
        self.objects.lock().insert(
            path.into(),
            MemoryObject {
                data,
                size,
                blocks: Vec::new(),
            },
        );
    }

    /// Registers a data file of `size` bytes laid out as `blocks`.
    ///
    /// The contents are not kept; only the length and placement matter for
    /// locality lookups.
    pub fn put_blocks(&self, path: impl Into<PathBuf>, size: u64, mut blocks: Vec<BlockLocation>) {
        blocks.sort_by_key(|b| b.offset);
        self.objects.lock().insert(
            path.into(),
            MemoryObject {
                data: Vec::new(),
                size,
                blocks,
            },
        );
    }

    fn is_dir(objects: &ObjectMap, path: &Path) -> bool {
        objects
            .keys()
            .any(|key| key != path && key.starts_with(path))
    }
}

impl StorageBackend for MemoryStorage {
    fn exists(&self, path: &Path) -> Result<bool> {
        let objects = self.objects.lock();
        Ok(objects.contains_key(path) || Self::is_dir(&objects, path))
    }

    fn metadata(&self, path: &Path) -> Result<ObjectMeta> {
        let objects = self.objects.lock();
        if let Some(object) = objects.get(path) {
            return Ok(ObjectMeta {
                size: object.size,
                modified: None,
                is_dir: false,
            });
        }
        if Self::is_dir(&objects, path) {
            return Ok(ObjectMeta {
                size: 0,
                modified: None,
                is_dir: true,
            });
        }
        Err(SplitError::not_found(path))
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn StorageReader>> {
        let objects = self.objects.lock();
        let data = objects
            .get(path)
            .ok_or_else(|| SplitError::not_found(path))?
            .data
            .clone();

        let size = data.len() as u64;
        Ok(Box::new(MemoryReader {
            data: Cursor::new(data),
            size,
        }))
    }

    fn open_write(&self, path: &Path) -> Result<Box<dyn StorageWriter>> {
        Ok(Box::new(MemoryWriter {
            objects: Arc::clone(&self.objects),
            path: path.to_path_buf(),
            data: Vec::new(),
        }))
    }

    fn list(&self, prefix: &Path) -> Result<Vec<String>> {
        let objects = self.objects.lock();
        if objects.contains_key(prefix) {
            return Err(SplitError::storage(prefix, "path is not a directory"));
        }

        let mut entries: Vec<String> = objects
            .keys()
            .filter_map(|key| key.strip_prefix(prefix).ok())
            .filter_map(|rest| rest.components().next())
            .filter_map(|first| first.as_os_str().to_str().map(String::from))
            .collect();
        if entries.is_empty() {
            return Err(SplitError::not_found(prefix));
        }

        entries.sort();
        entries.dedup();
        Ok(entries)
    }

    fn create_dir_all(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn block_locations(
        &self,
        path: &Path,
        start: u64,
        length: u64,
    ) -> Result<Vec<BlockLocation>> {
        let objects = self.objects.lock();
        let object = objects
            .get(path)
            .ok_or_else(|| SplitError::not_found(path))?;

        let end = start.saturating_add(length);
        Ok(object
            .blocks
            .iter()
            .filter(|block| block.overlap(start, end) > 0)
            .cloned()
            .collect())
    }
}

struct MemoryReader {
    data: Cursor<Vec<u8>>,
    size: u64,
}

impl Read for MemoryReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.data.read(buf)
    }
}

impl StorageReader for MemoryReader {
    fn size(&self) -> u64 {
        self.size
    }
}

struct MemoryWriter {
    objects: Arc<Mutex<ObjectMap>>,
    path: PathBuf,
    data: Vec<u8>,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl StorageWriter for MemoryWriter {
    fn finish(self: Box<Self>) -> Result<()> {
        let MemoryWriter { objects, path, data } = *self;
        let size = data.len() as u64;
        objects.lock().insert(
            path,
            MemoryObject {
                data,
                size,
                blocks: Vec::new(),
            },
        );
        Ok(())
    }
}
