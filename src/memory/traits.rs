/*!
 * Memory Traits
 * Memory management abstractions
 */

use super::types::*;
use crate::core::id::{BlockId, PartitionId};
use crate::core::types::{Address, Size};

/// Partition allocator interface
pub trait PartitionAllocator: Send + Sync {
    /// Allocate a block and return its fresh identifier
    fn allocate(&self, request: AllocationRequest) -> MemoryResult<BlockId>;

    /// Free a live block, returning its final metadata
    fn free(&self, id: BlockId) -> MemoryResult<BlockInfo>;

    /// Base address of a live block
    fn resolve_address(&self, id: BlockId) -> MemoryResult<Address>;

    /// Check if an id designates a live block
    fn is_live(&self, id: BlockId) -> bool {
        self.resolve_address(id).is_ok()
    }
}

/// Memory statistics provider
pub trait MemoryInfo: Send + Sync {
    fn total_free(&self, partition: PartitionId) -> MemoryResult<Size>;

    fn largest_free_contiguous(&self, partition: PartitionId) -> MemoryResult<Size>;

    fn partition_info(&self, partition: PartitionId) -> MemoryResult<PartitionInfo>;

    fn block_info(&self, id: BlockId) -> MemoryResult<BlockInfo>;

    /// Bytes of the partition held by live blocks
    fn used(&self, partition: PartitionId) -> MemoryResult<Size> {
        self.partition_info(partition).map(|info| info.used())
    }
}
