// rust/split-core/src/planner/discovery.rs

use std::path::Path;

use tracing::info;

use crate::error::{Result, SplitError};
use crate::storage::StorageBackend;

/// Expands input paths into descriptor-file references.
///
/// A directory contributes each of its entries, in listing order; a file
/// contributes itself.
///
/// # Errors
///
/// Returns [`SplitError::NoInput`] if nothing is found, or
/// [`SplitError::NotFound`] if an input path does not exist.
pub fn discover_references(storage: &dyn StorageBackend, inputs: &[String]) -> Result<Vec<String>> {
    if inputs.is_empty() {
        return Err(SplitError::NoInput);
    }

    let mut references = Vec::new();
    for input in inputs {
        let path = Path::new(input);
        let meta = storage.metadata(path)?;

        let found: Vec<String> = if meta.is_dir {
            storage
                .list(path)?
                .into_iter()
                .map(|entry| path.join(entry).display().to_string())
                .collect()
        } else {
            vec![input.clone()]
        };

        info!("Found {} input files at {}: {:?}", found.len(), input, found);
        references.extend(found);
    }

    if references.is_empty() {
        return Err(SplitError::NoInput);
    }
    Ok(references)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn inputs(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_directory_expands_sorted() {
        let storage = MemoryStorage::new();
        storage.put("in/b.wu", vec![]);
        storage.put("in/a.wu", vec![]);

        let references = discover_references(&storage, &inputs(&["in"])).unwrap();
        assert_eq!(references, vec!["in/a.wu", "in/b.wu"]);
    }

    #[test]
    fn test_file_is_its_own_reference() {
        let storage = MemoryStorage::new();
        storage.put("in/a.wu", vec![]);
        storage.put("other/x.mwu", vec![]);

        let references = discover_references(&storage, &inputs(&["other/x.mwu", "in"])).unwrap();
        assert_eq!(references, vec!["other/x.mwu", "in/a.wu"]);
    }

    #[test]
    fn test_no_inputs() {
        let storage = MemoryStorage::new();
        let err = discover_references(&storage, &[]).unwrap_err();
        assert!(matches!(err, SplitError::NoInput));
    }

    #[test]
    fn test_missing_input() {
        let storage = MemoryStorage::new();
        storage.put("in/a.wu", vec![]);

        let err = discover_references(&storage, &inputs(&["in", "gone"])).unwrap_err();
        assert!(err.is_not_found());
    }
}
