/*!
 * Syscall ABI Tests
 * Raw return conventions of both allocation families
 */

use pretty_assertions::assert_eq;
use sysmem_kernel::{
    ErrorCode, MemoryBlockOptParam, MemoryManager, SysMemConfig, SyscallExecutor,
};

fn executor() -> SyscallExecutor {
    SyscallExecutor::new(MemoryManager::new())
}

#[test]
fn test_partition_family_round_trip() {
    let exec = executor();
    let id = exec.alloc_partition_memory(2, "buffer", 0, 0x1000, 0);
    assert!(id > 0, "expected a block id, got {}", id);
    assert_eq!(exec.get_block_head_addr(id), 0x0880_0000);

    let fixed = exec.alloc_partition_memory(5, "vram", 2, 0x200, 0x0840_0100);
    assert_eq!(exec.get_block_head_addr(fixed), 0x0840_0100);
    assert_eq!(
        exec.alloc_partition_memory(5, "vram2", 2, 0x200, 0x0840_0100),
        ErrorCode::AddressUnavailable.raw()
    );
    // Unaligned hint
    assert_eq!(
        exec.alloc_partition_memory(5, "odd", 2, 0x200, 0x0840_0001),
        ErrorCode::InvalidArgument.raw()
    );

    assert_eq!(exec.free_partition_memory(id), 0);
    assert_eq!(exec.free_partition_memory(id), ErrorCode::UnknownBlock.raw());
    assert_eq!(exec.get_block_head_addr(id), 0);
}

#[test]
fn test_memory_block_family_round_trip() {
    let exec = executor();
    let opt = MemoryBlockOptParam::default();
    let id = exec.alloc_memory_block(Some("heap"), 0, 0x2000, Some(&opt));
    assert!(id > 0);

    let mut addr = 0;
    assert_eq!(exec.get_memory_block_addr(id, Some(&mut addr)), 0);
    assert_eq!(addr, 0x0880_0000);
    assert_eq!(exec.total_free_mem_size(), 24 * 1024 * 1024 - 0x2000);

    assert_eq!(exec.free_memory_block(id), 0);
    assert_eq!(exec.free_memory_block(id), ErrorCode::UnknownBlock.raw());
    assert_eq!(exec.total_free_mem_size(), 24 * 1024 * 1024);
}

#[test]
fn test_families_do_not_mix() {
    let exec = executor();
    let partition_block = exec.alloc_partition_memory(2, "p", 0, 64, 0);
    let memory_block = exec.alloc_memory_block(Some("m"), 1, 64, None);

    let mut addr = 0xffff_ffff;
    assert_eq!(
        exec.get_memory_block_addr(partition_block, Some(&mut addr)),
        ErrorCode::UnknownBlock.raw()
    );
    assert_eq!(addr, 0xffff_ffff);
    assert_eq!(exec.get_block_head_addr(memory_block), 0);

    assert_eq!(
        exec.free_memory_block(partition_block),
        ErrorCode::UnknownBlock.raw()
    );
    assert_eq!(
        exec.free_partition_memory(memory_block),
        ErrorCode::UnknownBlock.raw()
    );

    // Both still live through their own family
    assert_eq!(exec.free_partition_memory(partition_block), 0);
    assert_eq!(exec.free_memory_block(memory_block), 0);
}

#[test]
fn test_error_codes_are_distinct() {
    let exec = SyscallExecutor::new(
        MemoryManager::with_config(SysMemConfig::single(0, 1000, 1)).unwrap(),
    );
    let codes = [
        exec.alloc_partition_memory(2, "a", 0, 0, 0),
        exec.alloc_partition_memory(2, "a", 9, 1, 0),
        exec.alloc_partition_memory(3, "a", 0, 1, 0),
        exec.free_partition_memory(12345),
        exec.alloc_partition_memory(2, "a", 0, 2000, 0),
        exec.alloc_partition_memory(2, "a", 2, 10, 995),
        exec.get_memory_block_addr(exec.alloc_memory_block(Some("b"), 0, 1, None), None),
    ];
    assert_eq!(
        codes,
        [
            ErrorCode::InvalidArgument.raw(),
            ErrorCode::IllegalPlacementType.raw(),
            ErrorCode::UnknownPartition.raw(),
            ErrorCode::UnknownBlock.raw(),
            ErrorCode::OutOfMemory.raw(),
            ErrorCode::AddressUnavailable.raw(),
            ErrorCode::IllegalAddress.raw(),
        ]
    );
    for code in codes {
        assert!(ErrorCode::try_from(code).is_ok());
    }
}

#[test]
fn test_memory_blocks_gated_by_firmware() {
    let config = SysMemConfig::default().with_firmware(0x0302_0010);
    let exec = SyscallExecutor::new(MemoryManager::with_config(config).unwrap());

    assert_eq!(
        exec.alloc_memory_block(Some("m"), 0, 64, None),
        ErrorCode::Unsupported.raw()
    );
    let mut addr = 0;
    assert_eq!(
        exec.get_memory_block_addr(1, Some(&mut addr)),
        ErrorCode::Unsupported.raw()
    );
    assert!(exec.alloc_partition_memory(2, "p", 0, 64, 0) > 0);
}

#[test]
fn test_capability_override() {
    let config = SysMemConfig::default().with_firmware(0x0100_0000);
    let memory = MemoryManager::with_config(config)
        .unwrap()
        .with_capabilities(sysmem_kernel::Capabilities::all());
    let exec = SyscallExecutor::new(memory);
    assert!(exec.alloc_memory_block(Some("m"), 0, 64, None) > 0);
}
