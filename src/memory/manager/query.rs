/*!
 * Memory Queries
 * Read-only views over partitions and live blocks
 */

use super::super::types::{BlockInfo, MemoryError, MemoryResult, PartitionInfo};
use super::partition::Partition;
use super::MemoryManager;
use crate::core::id::{BlockId, PartitionId};
use crate::core::types::{Address, Size};

impl MemoryManager {
    fn partition(&self, id: PartitionId) -> MemoryResult<&Partition> {
        self.partitions
            .get(&id)
            .ok_or(MemoryError::UnknownPartition(id))
    }

    /// Free bytes in a partition
    pub fn total_free(&self, partition: PartitionId) -> MemoryResult<Size> {
        Ok(self.partition(partition)?.state.read().free.total())
    }

    /// Size of the largest single free range in a partition
    pub fn largest_free_contiguous(&self, partition: PartitionId) -> MemoryResult<Size> {
        Ok(self.partition(partition)?.state.read().free.largest())
    }

    pub fn partition_info(&self, partition: PartitionId) -> MemoryResult<PartitionInfo> {
        Ok(self.partition(partition)?.info())
    }

    /// All partitions in id order
    pub fn partitions(&self) -> Vec<PartitionInfo> {
        self.partitions.values().map(Partition::info).collect()
    }

    pub fn block_info(&self, id: BlockId) -> MemoryResult<BlockInfo> {
        self.blocks
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(MemoryError::UnknownBlock(id))
    }

    /// Whether `id` designates a live block
    pub fn is_live(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    /// Number of live blocks across all partitions
    pub fn live_count(&self) -> usize {
        self.blocks.len()
    }

    /// Live blocks of a partition in address order
    pub fn live_blocks(&self, partition: PartitionId) -> MemoryResult<Vec<BlockInfo>> {
        let partition = self.partition(partition)?;
        // Holding the read lock keeps the index and the block table in step
        let state = partition.state.read();
        Ok(state
            .live
            .values()
            .filter_map(|id| self.blocks.get(id).map(|entry| entry.value().clone()))
            .collect())
    }

    /// Free ranges of a partition in address order
    pub fn free_ranges(&self, partition: PartitionId) -> MemoryResult<Vec<(Address, Size)>> {
        Ok(self.partition(partition)?.state.read().free.ranges())
    }
}
