// rust/split-core/src/descriptor/mod.rs

//! Work descriptors and their resolution from descriptor files.
//!
//! A descriptor file holds either one [`WorkDescriptor`] or a container of
//! many. A [`DescriptorResolver`] flattens a reference to such a file into
//! the ordered list of descriptors it contains.

mod resolver;
mod types;

pub use resolver::{DescriptorResolver, StorageDescriptorResolver};
pub use types::{DescriptorFile, WorkDescriptor};
