use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use split_core::descriptor::{DescriptorFile, WorkDescriptor};
use split_core::split::{SequentialReader, SplitRecord};
use split_core::storage::{LocalStorage, StorageBackend};
use split_core::{PlannerConfig, Result, SplitError, SplitPlanner};

/// Plans splits for `inputs` and writes them as `split-NNNNN.bin` under `output`.
///
/// Returns the paths written, in split order.
pub fn plan(
    config: &PlannerConfig,
    inputs: &[String],
    max_workers: Option<u32>,
    output: &Path,
) -> Result<Vec<PathBuf>> {
    let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new(&config.storage)?);
    let planner = SplitPlanner::new(Arc::clone(&storage), config);

    tracing::info!("Planning splits");
    tracing::info!("  Inputs: {:?}", inputs);
    match max_workers {
        Some(bound) => tracing::info!("  Max workers: {}", bound),
        None => tracing::info!("  Max workers: unbounded"),
    }

    let splits = planner.plan_inputs(inputs, max_workers)?;

    storage.create_dir_all(output)?;
    let mut written = Vec::with_capacity(splits.len());
    for (index, split) in splits.iter().enumerate() {
        let path = output.join(format!("split-{index:05}.bin"));
        split.write_to(&*storage, &path)?;
        tracing::info!(
            "Wrote {} ({} references, hosts {:?})",
            path.display(),
            split.len(),
            split.preferred_hosts()
        );
        written.push(path);
    }

    Ok(written)
}

/// Prints a split's preferred hosts and every `(index, reference)` it yields.
pub fn inspect(config: &PlannerConfig, split: &Path, out: &mut impl Write) -> Result<()> {
    let storage = LocalStorage::new(&config.storage)?;
    let record = SplitRecord::read_from(&storage, split)?;

    let print_err =
        |e: std::io::Error| SplitError::storage_with_source(split, "failed to print split", e);

    writeln!(out, "hosts: {}", record.preferred_hosts().join(",")).map_err(print_err)?;
    let mut reader = SequentialReader::new(record);
    while reader.advance() {
        if let Some((index, reference)) = reader.current() {
            writeln!(out, "{index}\t{reference}\t{:.2}", reader.progress()).map_err(print_err)?;
        }
    }
    reader.close();
    Ok(())
}

/// Writes a descriptor file at `output` covering `sources`.
///
/// A container is written when `output` carries the container extension;
/// otherwise exactly one source is accepted.
pub fn describe(config: &PlannerConfig, output: &str, sources: &[String]) -> Result<()> {
    let descriptors = sources
        .iter()
        .map(|source| parse_source(source))
        .collect::<Result<Vec<_>>>()?;

    let file = if output.ends_with(&config.planner.container_extension) {
        DescriptorFile::Container(descriptors)
    } else {
        match <[WorkDescriptor; 1]>::try_from(descriptors) {
            Ok([descriptor]) => DescriptorFile::Single(descriptor),
            Err(descriptors) => {
                return Err(SplitError::descriptor(
                    output,
                    format!(
                        "{} sources given; use the '{}' extension for a container",
                        descriptors.len(),
                        config.planner.container_extension
                    ),
                ))
            }
        }
    };

    let storage = LocalStorage::new(&config.storage)?;
    file.write_to(&storage, Path::new(output))?;
    tracing::info!("Wrote descriptor file {}", output);
    Ok(())
}

/// Parses `PATH`, `PATH:START-END` or `PATH:START-`.
fn parse_source(source: &str) -> Result<WorkDescriptor> {
    let Some((path, range)) = source.rsplit_once(':') else {
        return Ok(WorkDescriptor::for_file(source));
    };

    let invalid = || SplitError::descriptor(source, "expected PATH:START-END or PATH:START-");
    let (start, end) = range.split_once('-').ok_or_else(invalid)?;
    let start: u64 = start.parse().map_err(|_| invalid())?;
    let end: Option<u64> = if end.is_empty() {
        None
    } else {
        Some(end.parse().map_err(|_| invalid())?)
    };

    if matches!(end, Some(end) if end < start) {
        return Err(SplitError::descriptor(source, "range end is before range start"));
    }
    Ok(WorkDescriptor::for_file(path).with_range(start, end))
}
