/*!
 * Address Recycling Test
 * Verifies that freed ranges coalesce and are handed out again
 */

use sysmem_kernel::{MemoryManager, PartitionId, Placement, SysMemConfig};

const USER: PartitionId = PartitionId(2);

#[test]
fn test_address_recycling() {
    let manager = MemoryManager::with_config(SysMemConfig::single(0x1000, 0x1000, 0x100))
        .expect("Failed to build manager");

    // Allocate three adjacent blocks
    let id1 = manager
        .allocate(USER, "one", Placement::Low, 0x100, None)
        .expect("Failed to allocate block 1");
    let id2 = manager
        .allocate(USER, "two", Placement::Low, 0x200, None)
        .expect("Failed to allocate block 2");
    let id3 = manager
        .allocate(USER, "three", Placement::Low, 0x100, None)
        .expect("Failed to allocate block 3");

    let addr1 = manager.resolve_address(id1).unwrap();
    let addr2 = manager.resolve_address(id2).unwrap();
    let addr3 = manager.resolve_address(id3).unwrap();
    println!("Initial allocations: 0x{:x} 0x{:x} 0x{:x}", addr1, addr2, addr3);

    assert_eq!(addr1, 0x1000);
    assert_eq!(addr2, 0x1100);
    assert_eq!(addr3, 0x1300);

    // Free the middle block; a smaller Low request lands in the hole
    manager.free(id2).expect("Failed to free block 2");
    let id4 = manager
        .allocate(USER, "four", Placement::Low, 0x100, None)
        .expect("Failed to allocate block 4");
    assert_eq!(
        manager.resolve_address(id4).unwrap(),
        addr2,
        "Lowest free range should be reused"
    );

    // A High request takes the top of the partition, not the hole
    let id5 = manager
        .allocate(USER, "five", Placement::High, 0x100, None)
        .expect("Failed to allocate block 5");
    assert_eq!(manager.resolve_address(id5).unwrap(), 0x1f00);
}

#[test]
fn test_free_coalesces_with_both_neighbours() {
    let manager = MemoryManager::with_config(SysMemConfig::single(0, 1000, 1))
        .expect("Failed to build manager");

    let ids: Vec<_> = (0..10)
        .map(|i| {
            manager
                .allocate(USER, &format!("b{}", i), Placement::Low, 100, None)
                .expect("Failed to allocate")
        })
        .collect();
    assert_eq!(manager.total_free(USER).unwrap(), 0);

    // Free every other block: five separate 100-byte holes
    for id in ids.iter().step_by(2) {
        manager.free(*id).unwrap();
    }
    assert_eq!(manager.free_ranges(USER).unwrap().len(), 5);
    assert_eq!(manager.largest_free_contiguous(USER).unwrap(), 100);

    // Freeing a block between two holes joins all three
    manager.free(ids[1]).unwrap();
    assert_eq!(manager.largest_free_contiguous(USER).unwrap(), 300);
    assert_eq!(manager.free_ranges(USER).unwrap()[0], (0, 300));

    for id in ids.iter().skip(3).step_by(2) {
        manager.free(*id).unwrap();
    }
    assert_eq!(manager.free_ranges(USER).unwrap(), vec![(0, 1000)]);
}

#[test]
fn test_identifiers_not_reused_across_cycles() {
    let manager = MemoryManager::with_config(SysMemConfig::single(0, 256, 1))
        .expect("Failed to build manager");
    let mut seen = std::collections::HashSet::new();

    for _ in 0..1000 {
        let id = manager
            .allocate(USER, "cycle", Placement::Low, 256, None)
            .expect("Failed to allocate");
        assert!(seen.insert(id), "id {} was issued twice", id);
        assert!(id.raw() > 0);
        manager.free(id).unwrap();
    }
}
