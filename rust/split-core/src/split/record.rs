// rust/split-core/src/split/record.rs

//! Split record and its wire format.
//!
//! ```text
//! +----------------------+
//! | path count (i32 BE)  |
//! +----------------------+
//! | path strings         |  <- u16 BE byte length + UTF-8, per path
//! +----------------------+
//! | host count (i32 BE)  |
//! +----------------------+
//! | host strings         |  <- u16 BE byte length + UTF-8, per host
//! +----------------------+
//! ```

use std::io::{Read, Write};
use std::path::Path;

use bytes::{Buf, BufMut};

use crate::error::{Result, SplitError};
use crate::storage::StorageBackend;

/// Reports the hosts a unit of work would prefer to run on.
pub trait Locatable {
    /// Preferred host names, best first.
    fn locations(&self) -> &[String];

    /// Size hint for schedulers that order work by length.
    fn length(&self) -> u64 {
        0
    }
}

/// Binary encoding for values exchanged between processes.
pub trait Codec: Sized {
    /// Encodes `self` into a new buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented in the format.
    fn encode(&self) -> Result<Vec<u8>>;

    /// Decodes a complete value from `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::CorruptRecord`] if `bytes` is not a valid encoding.
    fn decode(bytes: &[u8]) -> Result<Self>;
}

/// A group of descriptor-file references assigned to one worker, with the
/// hosts that store most of their data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitRecord {
    paths: Vec<String>,
    preferred_hosts: Vec<String>,
}

impl SplitRecord {
    /// Creates a record, dropping repeated hosts after their first occurrence.
    pub fn new(paths: Vec<String>, hosts: impl IntoIterator<Item = String>) -> Self {
        let mut preferred_hosts: Vec<String> = Vec::new();
        for host in hosts {
            if !preferred_hosts.contains(&host) {
                preferred_hosts.push(host);
            }
        }
        Self {
            paths,
            preferred_hosts,
        }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn preferred_hosts(&self) -> &[String] {
        &self.preferred_hosts
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Encodes the record and writes it to `path`.
    pub fn write_to(&self, storage: &dyn StorageBackend, path: &Path) -> Result<()> {
        let bytes = self.encode()?;
        let mut writer = storage.open_write(path)?;
        writer
            .write_all(&bytes)
            .map_err(|e| SplitError::storage_with_source(path, "failed to write split", e))?;
        writer.finish()
    }

    /// Reads and decodes a record previously written with [`write_to`](Self::write_to).
    pub fn read_from(storage: &dyn StorageBackend, path: &Path) -> Result<Self> {
        let mut reader = storage.open_read(path)?;
        let mut bytes = Vec::with_capacity(reader.size() as usize);
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| SplitError::storage_with_source(path, "failed to read split", e))?;
        Self::decode(&bytes)
    }

    fn encoded_len(&self) -> usize {
        let strings: usize = self
            .paths
            .iter()
            .chain(&self.preferred_hosts)
            .map(|s| 2 + s.len())
            .sum();
        8 + strings
    }
}

impl Locatable for SplitRecord {
    fn locations(&self) -> &[String] {
        &self.preferred_hosts
    }
}

impl Codec for SplitRecord {
    fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        put_strings(&mut buf, &self.paths, "path")?;
        put_strings(&mut buf, &self.preferred_hosts, "host")?;
        Ok(buf)
    }

    fn decode(mut bytes: &[u8]) -> Result<Self> {
        let paths = get_strings(&mut bytes, "path")?;
        let hosts = get_strings(&mut bytes, "host")?;

        if bytes.has_remaining() {
            return Err(SplitError::corrupt_record(format!(
                "{} trailing bytes after host list",
                bytes.remaining()
            )));
        }

        Ok(Self::new(paths, hosts))
    }
}

fn put_strings(buf: &mut Vec<u8>, values: &[String], what: &str) -> Result<()> {
    let count = i32::try_from(values.len())
        .map_err(|_| SplitError::serialization(format!("too many {what}s: {}", values.len())))?;
    buf.put_i32(count);

    for value in values {
        let len = u16::try_from(value.len()).map_err(|_| {
            SplitError::serialization(format!(
                "{what} is {} bytes, longer than the {} byte limit",
                value.len(),
                u16::MAX
            ))
        })?;
        buf.put_u16(len);
        buf.put_slice(value.as_bytes());
    }
    Ok(())
}

fn get_strings(buf: &mut &[u8], what: &str) -> Result<Vec<String>> {
    if buf.remaining() < 4 {
        return Err(SplitError::corrupt_record(format!(
            "truncated before {what} count"
        )));
    }
    let count = buf.get_i32();
    if count < 0 {
        return Err(SplitError::corrupt_record(format!(
            "negative {what} count {count}"
        )));
    }

    // Every string takes at least its 2-byte prefix.
    let mut values = Vec::with_capacity((count as usize).min(buf.remaining() / 2));
    for index in 0..count {
        if buf.remaining() < 2 {
            return Err(SplitError::corrupt_record(format!(
                "truncated before {what} {index}"
            )));
        }
        let len = buf.get_u16() as usize;
        if buf.remaining() < len {
            return Err(SplitError::corrupt_record(format!(
                "{what} {index} needs {len} bytes, {} left",
                buf.remaining()
            )));
        }

        let value = std::str::from_utf8(&buf[..len]).map_err(|e| {
            SplitError::corrupt_record(format!("{what} {index} is not valid UTF-8: {e}"))
        })?;
        values.push(value.to_string());
        buf.advance(len);
    }
    Ok(values)
}
