/*!
 * Sysmem Kernel Library
 * Partition memory management for a handheld console kernel
 */

pub mod core;
pub mod memory;
pub mod monitoring;
pub mod syscalls;

// Re-exports
pub use crate::core::{
    BlockId, BlockName, Capabilities, ConfigError, ErrorCode, PartitionConfig, PartitionId,
    SysMemConfig,
};
pub use memory::{
    AllocFamily, AllocationRequest, BlockInfo, MemoryError, MemoryInfo, MemoryManager,
    MemoryResult, PartitionAllocator, PartitionInfo, Placement, SnapshotError, SysMemSnapshot,
};
pub use monitoring::init_tracing;
pub use syscalls::{
    BufferConsole, DebugConsole, MemoryBlockOptParam, Syscall, SyscallExecutor, SyscallResult,
    TracingConsole,
};
