//! End-to-end planning over the local filesystem backend: descriptor files
//! are discovered, grouped, encoded to disk and read back the way a worker
//! would consume them.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use split_core::config::{PlannerConfig, StorageConfig};
use split_core::descriptor::{DescriptorFile, WorkDescriptor};
use split_core::split::{Codec, Locatable, SequentialReader, SplitRecord};
use split_core::storage::{LocalStorage, StorageBackend};
use split_core::{SplitError, SplitPlanner};
use tempfile::TempDir;

fn setup() -> (Arc<LocalStorage>, PlannerConfig, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let mut config = PlannerConfig::default();
    config.storage = StorageConfig {
        base_path: temp_dir.path().to_path_buf(),
        buffer_size: 4096,
        block_size: 100,
        hosts: vec!["dn-a".to_string(), "dn-b".to_string()],
    };
    let storage = Arc::new(LocalStorage::new(&config.storage).unwrap());
    (storage, config, temp_dir)
}

fn write_data(storage: &LocalStorage, path: &str, len: usize) {
    let mut writer = storage.open_write(Path::new(path)).unwrap();
    writer.write_all(&vec![7u8; len]).unwrap();
    writer.finish().unwrap();
}

fn write_descriptors(storage: &LocalStorage) {
    write_data(storage, "data/events.bin", 450);

    for i in 0..5u64 {
        DescriptorFile::Single(
            WorkDescriptor::for_file("data/events.bin").with_range(i * 90, Some((i + 1) * 90)),
        )
        .write_to(storage, Path::new(&format!("jobs/task-{i}.wu")))
        .unwrap();
    }

    DescriptorFile::Container(vec![
        WorkDescriptor::for_file("data/events.bin"),
        WorkDescriptor::default().with_property("kind", "bookkeeping"),
    ])
    .write_to(storage, Path::new("jobs/task-9.mwu"))
    .unwrap();
}

#[test]
fn test_plan_encode_and_consume() {
    let (storage, config, _temp) = setup();
    write_descriptors(&storage);

    let planner = SplitPlanner::new(storage.clone(), &config);
    let splits = planner.plan_inputs(&["jobs".to_string()], Some(4)).unwrap();

    // 6 references, 4 workers -> groups of 2
    assert_eq!(splits.len(), 3);
    assert!(splits.iter().all(|s| s.len() == 2));
    assert!(splits
        .iter()
        .all(|s| s.locations() == ["dn-a".to_string(), "dn-b".to_string()]));

    for (i, split) in splits.iter().enumerate() {
        split
            .write_to(&*storage, Path::new(&format!("splits/split-{i:05}.bin")))
            .unwrap();
    }

    let mut consumed = Vec::new();
    for i in 0..splits.len() {
        let record =
            SplitRecord::read_from(&*storage, Path::new(&format!("splits/split-{i:05}.bin")))
                .unwrap();
        assert_eq!(record, splits[i]);

        let mut reader = SequentialReader::new(record);
        while reader.advance() {
            let (index, reference) = reader.current().unwrap();
            consumed.push((i, index, reference.to_string()));
        }
        assert_eq!(reader.progress(), 1.0);
    }

    let expected: Vec<(usize, usize, String)> = vec![
        (0, 0, "jobs/task-0.wu"),
        (0, 1, "jobs/task-1.wu"),
        (1, 0, "jobs/task-2.wu"),
        (1, 1, "jobs/task-3.wu"),
        (2, 0, "jobs/task-4.wu"),
        (2, 1, "jobs/task-9.mwu"),
    ]
    .into_iter()
    .map(|(s, i, r)| (s, i, r.to_string()))
    .collect();
    assert_eq!(consumed, expected);
}

#[test]
fn test_unbounded_workers() {
    let (storage, config, _temp) = setup();
    write_descriptors(&storage);

    let planner = SplitPlanner::new(storage, &config);
    let splits = planner.plan_inputs(&["jobs".to_string()], None).unwrap();
    assert_eq!(splits.len(), 6);
}

#[test]
fn test_missing_input_directory() {
    let (storage, config, _temp) = setup();

    let planner = SplitPlanner::new(storage, &config);
    let err = planner
        .plan_inputs(&["does-not-exist".to_string()], Some(2))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_empty_input_directory() {
    let (storage, config, _temp) = setup();
    storage.create_dir_all(Path::new("empty")).unwrap();

    let planner = SplitPlanner::new(storage, &config);
    let err = planner.plan_inputs(&["empty".to_string()], Some(2)).unwrap_err();
    assert!(matches!(err, SplitError::NoInput));
}

#[test]
fn test_descriptor_pointing_at_missing_data() {
    let (storage, config, _temp) = setup();
    DescriptorFile::Single(WorkDescriptor::for_file("data/missing.bin"))
        .write_to(&*storage, Path::new("jobs/orphan.wu"))
        .unwrap();

    let planner = SplitPlanner::new(storage, &config);
    let err = planner.plan_inputs(&["jobs".to_string()], Some(1)).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_corrupt_split_file() {
    let (storage, _config, _temp) = setup();
    let mut writer = storage.open_write(Path::new("splits/bad.bin")).unwrap();
    writer.write_all(&(-3i32).to_be_bytes()).unwrap();
    writer.finish().unwrap();

    let err = SplitRecord::read_from(&*storage, Path::new("splits/bad.bin")).unwrap_err();
    assert!(matches!(err, SplitError::CorruptRecord { .. }));

    let bytes = SplitRecord::new(vec!["a".to_string()], Vec::new()).encode().unwrap();
    assert!(SplitRecord::decode(&bytes[..bytes.len() - 1]).is_err());
}
