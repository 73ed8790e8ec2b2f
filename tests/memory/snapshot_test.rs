/*!
 * Save State Tests
 * Snapshots written to disk and restored into a fresh manager
 */

use pretty_assertions::assert_eq;
use std::io::Write;
use sysmem_kernel::{
    AllocFamily, AllocationRequest, MemoryError, MemoryManager, PartitionId, Placement,
    SnapshotError, SysMemSnapshot,
};

const USER: PartitionId = PartitionId(2);

#[test]
fn test_save_state_file_round_trip() {
    let manager = MemoryManager::new();
    let heap = manager
        .allocate_with(
            AllocationRequest::new(USER, 0x4000)
                .named("heap")
                .with_family(AllocFamily::MemoryBlock),
        )
        .unwrap();
    let stack = manager
        .allocate(USER, "stack", Placement::High, 0x8000, None)
        .unwrap();
    let kernel = manager
        .allocate(PartitionId(1), "ktbl", Placement::Addr, 0x100, Some(0x8800_1000))
        .unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&manager.snapshot().to_bytes().unwrap())
        .unwrap();

    let bytes = std::fs::read(file.path()).unwrap();
    let restored = MemoryManager::restore(SysMemSnapshot::from_bytes(&bytes).unwrap())
        .expect("Failed to restore save state");

    for id in [heap, stack, kernel] {
        assert_eq!(restored.block_info(id), manager.block_info(id));
    }
    assert_eq!(restored.partitions(), manager.partitions());

    // Family typing survives the round trip
    assert_eq!(
        restored.free_as(heap, AllocFamily::Partition),
        Err(MemoryError::UnknownBlock(heap))
    );
    assert!(restored.free_as(heap, AllocFamily::MemoryBlock).is_ok());

    // The source manager is untouched by activity on the copy
    assert!(manager.is_live(heap));
}

#[test]
fn test_ids_from_other_managers_are_unknown() {
    let first = MemoryManager::new();
    let second = MemoryManager::new();
    let id = first.allocate(USER, "a", Placement::Low, 16, None).unwrap();
    assert_eq!(second.free(id), Err(MemoryError::UnknownBlock(id)));
}

#[test]
fn test_ids_stay_unique_across_many_managers() {
    let first = MemoryManager::new();
    let id = first.allocate(USER, "a", Placement::Low, 16, None).unwrap();

    let mut seen = std::collections::HashSet::from([id]);
    for _ in 0..300 {
        let other = MemoryManager::new();
        let own = other.allocate(USER, "b", Placement::Low, 16, None).unwrap();
        assert!(seen.insert(own), "id {} was issued twice", own);
        assert_eq!(other.free(id), Err(MemoryError::UnknownBlock(id)));
    }

    // The block in the first manager survived every foreign free
    assert!(first.is_live(id));
    assert!(first.free(id).is_ok());
}

#[test]
fn test_truncated_save_state_is_rejected() {
    let manager = MemoryManager::new();
    manager.allocate(USER, "a", Placement::Low, 16, None).unwrap();
    let bytes = manager.snapshot().to_bytes().unwrap();

    assert!(matches!(
        SysMemSnapshot::from_bytes(&bytes[..bytes.len() / 2]),
        Err(SnapshotError::Encoding(_))
    ));
}

#[test]
fn test_snapshot_json_is_readable() {
    let manager = MemoryManager::new();
    manager.allocate(USER, "readable", Placement::Low, 16, None).unwrap();
    let json = serde_json::to_value(manager.snapshot()).unwrap();

    assert_eq!(json["config"]["user_partition"], 2);
    assert_eq!(json["blocks"][0]["name"], "readable");
    assert_eq!(json["blocks"][0]["placement"], "low");
    assert_eq!(json["blocks"][0]["base"], 0x0880_0000);
}
