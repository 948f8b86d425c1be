// rust/split-core/src/split/mod.rs

//! Splits: the unit of work handed to a single worker.
//!
//! A [`SplitRecord`] is built by the planner, encoded with [`Codec`],
//! shipped to exactly one worker, decoded there and consumed through a
//! [`SequentialReader`].
//!
//! # Example
//!
//! ```
//! use split_core::split::{Codec, SequentialReader, SplitRecord};
//!
//! let record = SplitRecord::new(
//!     vec!["jobs/a.wu".to_string(), "jobs/b.wu".to_string()],
//!     vec!["dn-1".to_string()],
//! );
//! let bytes = record.encode().unwrap();
//!
//! let mut reader = SequentialReader::new(SplitRecord::decode(&bytes).unwrap());
//! while reader.advance() {
//!     let (index, reference) = reader.current().unwrap();
//!     println!("{index}: {reference}");
//! }
//! ```

mod reader;
mod record;

pub use reader::{ReaderState, SequentialReader};
pub use record::{Codec, Locatable, SplitRecord};
