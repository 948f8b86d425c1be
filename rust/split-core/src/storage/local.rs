// rust/split-core/src/storage/local.rs

//! Local filesystem storage backend implementation.
//!
//! Files are served from a base directory. A local filesystem has no block
//! placement of its own, so the locality lookup reports fixed-size blocks
//! of `block_size` bytes, each held by the configured host names.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use super::traits::{BlockLocation, ObjectMeta, StorageBackend, StorageReader, StorageWriter};
use crate::config::StorageConfig;
use crate::error::{Result, SplitError};

/// Local filesystem storage backend.
pub struct LocalStorage {
    /// Base path for all storage operations.
    base_path: PathBuf,
    /// Buffer size for buffered I/O operations.
    buffer_size: usize,
    /// Block granularity reported by `block_locations`.
    block_size: u64,
    /// Hosts reported for every block.
    hosts: Vec<String>,
}

impl LocalStorage {
    /// Creates a new `LocalStorage` instance from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base path cannot be created.
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let base_path = config.base_path.clone();

        // Create base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                SplitError::storage_with_source(&base_path, "failed to create base directory", e)
            })?;
        }

        Ok(Self {
            base_path,
            buffer_size: config.buffer_size,
            block_size: config.block_size.max(1),
            hosts: config.hosts.clone(),
        })
    }

    /// Resolves a path relative to the base path.
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }
}

impl StorageBackend for LocalStorage {
    fn exists(&self, path: &Path) -> Result<bool> {
        let full_path = self.resolve_path(path);
        Ok(full_path.exists())
    }

    fn metadata(&self, path: &Path) -> Result<ObjectMeta> {
        let full_path = self.resolve_path(path);
        let meta = fs::metadata(&full_path).map_err(|e| {
            SplitError::storage_with_source(&full_path, "failed to read metadata", e)
        })?;

        Ok(ObjectMeta {
            size: meta.len(),
            modified: meta.modified().ok(),
            is_dir: meta.is_dir(),
        })
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn StorageReader>> {
        let full_path = self.resolve_path(path);
        let file = File::open(&full_path)
            .map_err(|e| SplitError::storage_with_source(&full_path, "failed to open file", e))?;

        let meta = file.metadata().map_err(|e| {
            SplitError::storage_with_source(&full_path, "failed to read file metadata", e)
        })?;
        if meta.is_dir() {
            return Err(SplitError::storage(&full_path, "path is a directory"));
        }

        Ok(Box::new(LocalReader::new(file, meta.len(), self.buffer_size)))
    }

    fn open_write(&self, path: &Path) -> Result<Box<dyn StorageWriter>> {
        let full_path = self.resolve_path(path);

        // Create parent directories if needed
        if let Some(parent) = full_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    SplitError::storage_with_source(
                        parent,
                        "failed to create parent directories",
                        e,
                    )
                })?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&full_path)
            .map_err(|e| {
                SplitError::storage_with_source(&full_path, "failed to create file", e)
            })?;

        Ok(Box::new(LocalWriter::new(file, full_path, self.buffer_size)))
    }

    fn list(&self, prefix: &Path) -> Result<Vec<String>> {
        let full_path = self.resolve_path(prefix);

        if !full_path.exists() {
            return Err(SplitError::not_found(full_path));
        }

        if !full_path.is_dir() {
            return Err(SplitError::storage(&full_path, "path is not a directory"));
        }

        let mut entries = Vec::new();

        for entry in fs::read_dir(&full_path).map_err(|e| {
            SplitError::storage_with_source(&full_path, "failed to read directory", e)
        })? {
            let entry = entry.map_err(|e| {
                SplitError::storage_with_source(&full_path, "failed to read directory entry", e)
            })?;

            if let Some(name) = entry.file_name().to_str() {
                entries.push(name.to_string());
            }
        }

        entries.sort();
        Ok(entries)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let full_path = self.resolve_path(path);
        fs::create_dir_all(&full_path).map_err(|e| {
            SplitError::storage_with_source(&full_path, "failed to create directories", e)
        })
    }

    fn block_locations(
        &self,
        path: &Path,
        start: u64,
        length: u64,
    ) -> Result<Vec<BlockLocation>> {
        let file_size = self.metadata(path)?.size;
        let end = start.saturating_add(length).min(file_size);
        if start >= end {
            return Ok(Vec::new());
        }

        let first = start / self.block_size;
        let last = (end - 1) / self.block_size;

        Ok((first..=last)
            .map(|index| {
                let offset = index * self.block_size;
                let length = self.block_size.min(file_size - offset);
                BlockLocation::new(self.hosts.clone(), offset, length)
            })
            .collect())
    }
}

/// Buffered file reader for local storage.
struct LocalReader {
    reader: BufReader<File>,
    size: u64,
}

impl LocalReader {
    fn new(file: File, size: u64, buffer_size: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(buffer_size, file),
            size,
        }
    }
}

impl Read for LocalReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl StorageReader for LocalReader {
    fn size(&self) -> u64 {
        self.size
    }
}

/// Buffered file writer for local storage.
struct LocalWriter {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl LocalWriter {
    fn new(file: File, path: PathBuf, buffer_size: usize) -> Self {
        Self {
            writer: BufWriter::with_capacity(buffer_size, file),
            path,
        }
    }
}

impl Write for LocalWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl StorageWriter for LocalWriter {
    fn finish(mut self: Box<Self>) -> Result<()> {
        self.writer.flush().map_err(|e| SplitError::Storage {
            path: self.path.clone(),
            message: "failed to flush writer".to_string(),
            source: Some(e),
        })?;

        // Sync to disk
        self.writer
            .get_ref()
            .sync_all()
            .map_err(|e| SplitError::Storage {
                path: self.path.clone(),
                message: "failed to sync file to disk".to_string(),
                source: Some(e),
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage(block_size: u64) -> (LocalStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig {
            base_path: temp_dir.path().to_path_buf(),
            buffer_size: 4096,
            block_size,
            hosts: vec!["node-a".to_string(), "node-b".to_string()],
        };
        let storage = LocalStorage::new(&config).unwrap();
        (storage, temp_dir)
    }

    fn write_file(storage: &LocalStorage, path: &str, data: &[u8]) {
        let mut writer = storage.open_write(Path::new(path)).unwrap();
        writer.write_all(data).unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn test_new_creates_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let new_base = temp_dir.path().join("new_subdir");

        let config = StorageConfig {
            base_path: new_base.clone(),
            ..Default::default()
        };

        let _storage = LocalStorage::new(&config).unwrap();
        assert!(new_base.exists());
    }

    #[test]
    fn test_write_and_read() {
        let (storage, _temp) = create_test_storage(16);
        write_file(&storage, "nested/dir/file.bin", b"hello world");

        let mut reader = storage.open_read(Path::new("nested/dir/file.bin")).unwrap();
        assert_eq!(reader.size(), 11);

        let mut content = Vec::new();
        reader.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"hello world");
    }

    #[test]
    fn test_metadata_and_exists() {
        let (storage, _temp) = create_test_storage(16);
        write_file(&storage, "a.bin", &[0u8; 40]);

        assert!(storage.exists(Path::new("a.bin")).unwrap());
        assert!(!storage.exists(Path::new("b.bin")).unwrap());

        let meta = storage.metadata(Path::new("a.bin")).unwrap();
        assert_eq!(meta.size, 40);
        assert!(!meta.is_dir);
    }

    #[test]
    fn test_missing_paths_are_not_found() {
        let (storage, _temp) = create_test_storage(16);

        assert!(storage.metadata(Path::new("missing")).unwrap_err().is_not_found());
        assert!(matches!(
            storage.open_read(Path::new("missing")),
            Err(e) if e.is_not_found()
        ));
        assert!(storage.list(Path::new("missing")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_sorted() {
        let (storage, _temp) = create_test_storage(16);
        write_file(&storage, "dir/c", b"c");
        write_file(&storage, "dir/a", b"a");
        write_file(&storage, "dir/b", b"b");

        let entries = storage.list(Path::new("dir")).unwrap();
        assert_eq!(entries, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_list_file_is_error() {
        let (storage, _temp) = create_test_storage(16);
        write_file(&storage, "file", b"x");

        let err = storage.list(Path::new("file")).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_block_locations_cover_range() {
        let (storage, _temp) = create_test_storage(10);
        write_file(&storage, "data.bin", &[0u8; 35]);

        let blocks = storage
            .block_locations(Path::new("data.bin"), 5, 20)
            .unwrap();

        let offsets: Vec<(u64, u64)> = blocks.iter().map(|b| (b.offset, b.length)).collect();
        assert_eq!(offsets, vec![(0, 10), (10, 10), (20, 10)]);
        assert!(blocks.iter().all(|b| b.hosts == vec!["node-a", "node-b"]));
    }

    #[test]
    fn test_block_locations_last_block_is_short() {
        let (storage, _temp) = create_test_storage(10);
        write_file(&storage, "data.bin", &[0u8; 35]);

        let blocks = storage
            .block_locations(Path::new("data.bin"), 0, 35)
            .unwrap();

        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[3].offset, 30);
        assert_eq!(blocks[3].length, 5);
    }

    #[test]
    fn test_block_locations_empty_range() {
        let (storage, _temp) = create_test_storage(10);
        write_file(&storage, "data.bin", &[0u8; 35]);

        assert!(storage
            .block_locations(Path::new("data.bin"), 10, 0)
            .unwrap()
            .is_empty());
        assert!(storage
            .block_locations(Path::new("data.bin"), 40, 10)
            .unwrap()
            .is_empty());
    }
}
