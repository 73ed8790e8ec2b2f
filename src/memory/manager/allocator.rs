/*!
 * Memory Allocator Implementation
 * Allocation and release logic shared by both allocation families
 */

use super::super::types::{
    AllocFamily, AllocationRequest, BlockInfo, MemoryError, MemoryResult, Placement,
};
use super::MemoryManager;
use crate::core::id::{BlockId, PartitionId};
use crate::core::types::{align_up, is_aligned, Address, Size};
use log::{debug, info, warn};

impl MemoryManager {
    /// Allocate a partition memory block
    ///
    /// `address` is required for [`Placement::Addr`] and ignored otherwise.
    /// It must be aligned to the granularity: an unaligned address is
    /// `InvalidArgument` even when the range it names is free.
    pub fn allocate(
        &self,
        partition: PartitionId,
        name: &str,
        placement: Placement,
        size: Size,
        address: Option<Address>,
    ) -> MemoryResult<BlockId> {
        let mut request = AllocationRequest::new(partition, size)
            .named(name)
            .with_placement(placement);
        request.address = address;
        self.allocate_with(request)
    }

    /// Allocate from a fully specified request
    ///
    /// All validation happens before the partition is touched; once the write
    /// lock is held the only failures are "no room" and id exhaustion, both of
    /// which leave the partition as it was.
    pub fn allocate_with(&self, request: AllocationRequest) -> MemoryResult<BlockId> {
        let AllocationRequest {
            partition: partition_id,
            name,
            placement,
            size,
            address,
            family,
        } = request;

        if family == AllocFamily::MemoryBlock && !self.capabilities().memory_blocks {
            return Err(MemoryError::Unsupported {
                operation: "memory block allocation",
                firmware: self.firmware_version(),
            });
        }
        if size == 0 {
            warn!("Rejected zero-size allocation '{}'", name);
            return Err(MemoryError::invalid("size must be nonzero"));
        }

        let partition = self
            .partitions
            .get(&partition_id)
            .ok_or(MemoryError::UnknownPartition(partition_id))?;

        if family == AllocFamily::MemoryBlock && placement == Placement::Addr {
            return Err(MemoryError::invalid(
                "fixed-address placement is not allowed for memory blocks",
            ));
        }

        let granularity = self.granularity();
        let rounded = align_up(size, granularity).ok_or(MemoryError::OutOfMemory {
            partition: partition_id,
            requested: size,
            largest_free: 0,
        })?;

        let hint = match placement {
            Placement::Addr => {
                let addr =
                    address.ok_or(MemoryError::invalid("fixed-address placement needs an address"))?;
                if !is_aligned(addr as u64, granularity) {
                    return Err(MemoryError::invalid(
                        "fixed address is not aligned to the allocation granularity",
                    ));
                }
                if !partition.contains(addr, rounded) {
                    warn!(
                        "Fixed range [0x{:08x}, +0x{:x}) lies outside partition {}",
                        addr, rounded, partition_id
                    );
                    return Err(MemoryError::AddressUnavailable {
                        partition: partition_id,
                        address: addr,
                        size: rounded,
                    });
                }
                addr
            }
            Placement::Low | Placement::High => 0,
        };

        let mut state = partition.state.write();

        // Checked up front so an exhausted id space cannot strand a carved range
        if self.ids.exhausted() {
            return Err(MemoryError::IdentifiersExhausted);
        }

        let Some(base) = state.carve(placement, rounded, hint) else {
            let largest_free = state.free.largest();
            drop(state);
            return Err(match placement {
                Placement::Addr => {
                    warn!(
                        "Fixed range [0x{:08x}, +0x{:x}) in partition {} is not free",
                        hint, rounded, partition_id
                    );
                    MemoryError::AddressUnavailable {
                        partition: partition_id,
                        address: hint,
                        size: rounded,
                    }
                }
                _ => {
                    warn!(
                        "OOM: '{}' requested {} bytes ({} placement) from partition {}, largest free range {} bytes",
                        name, rounded, placement, partition_id, largest_free
                    );
                    MemoryError::OutOfMemory {
                        partition: partition_id,
                        requested: rounded,
                        largest_free,
                    }
                }
            });
        };

        // Sequence availability was checked under the lock; generation only
        // races with allocations on other partitions, so roll the carve back
        // if one of them took the last id first.
        let Some(id) = self.ids.next() else {
            state.free.release(base, rounded);
            return Err(MemoryError::IdentifiersExhausted);
        };

        state.live.insert(base, id);
        self.blocks.insert(
            id,
            BlockInfo {
                id,
                partition: partition_id,
                name,
                base,
                size: rounded,
                placement,
                family,
            },
        );
        debug!(
            "Partition {} now has {} free bytes in {} ranges",
            partition_id,
            state.free.total(),
            state.free.len()
        );
        drop(state);

        info!(
            "Allocated block {} at 0x{:08x} ({} bytes, {} placement) in partition {}",
            id, base, rounded, placement, partition_id
        );
        Ok(id)
    }

    /// Free a block regardless of the family it was allocated through
    pub fn free(&self, id: BlockId) -> MemoryResult<BlockInfo> {
        self.release(id, None)
    }

    /// Free a block only if it belongs to `family`
    pub fn free_as(&self, id: BlockId, family: AllocFamily) -> MemoryResult<BlockInfo> {
        self.release(id, Some(family))
    }

    fn release(&self, id: BlockId, family: Option<AllocFamily>) -> MemoryResult<BlockInfo> {
        // Copy out what is needed and drop the shard guard before taking the
        // partition lock
        let (partition_id, block_family) = match self.blocks.get(&id) {
            Some(entry) => (entry.partition, entry.family),
            None => {
                warn!("Attempted to free unknown or already freed block {}", id);
                return Err(MemoryError::UnknownBlock(id));
            }
        };
        if family.is_some_and(|f| f != block_family) {
            warn!(
                "Block {} belongs to the {:?} family, not {:?}",
                id, block_family, family
            );
            return Err(MemoryError::UnknownBlock(id));
        }

        let partition = self
            .partitions
            .get(&partition_id)
            .ok_or(MemoryError::UnknownPartition(partition_id))?;
        let mut state = partition.state.write();

        // A concurrent free of the same id may have won the race
        let Some((_, block)) = self.blocks.remove(&id) else {
            return Err(MemoryError::UnknownBlock(id));
        };
        state.live.remove(&block.base);
        state.free.release(block.base, block.size);
        let (total_free, largest) = (state.free.total(), state.free.largest());
        drop(state);

        info!(
            "Freed block {} '{}' at 0x{:08x} ({} bytes) in partition {}: {} bytes free, largest range {}",
            id, block.name, block.base, block.size, partition_id, total_free, largest
        );
        Ok(block)
    }

    /// Base address of a live block
    pub fn resolve_address(&self, id: BlockId) -> MemoryResult<Address> {
        self.blocks
            .get(&id)
            .map(|entry| entry.base)
            .ok_or(MemoryError::UnknownBlock(id))
    }

    /// Base address of a live block of `family`
    pub fn resolve_address_as(&self, id: BlockId, family: AllocFamily) -> MemoryResult<Address> {
        match self.blocks.get(&id) {
            Some(entry) if entry.family == family => Ok(entry.base),
            _ => Err(MemoryError::UnknownBlock(id)),
        }
    }
}
