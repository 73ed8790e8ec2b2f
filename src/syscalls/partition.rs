/*!
 * Partition Memory Syscalls
 * First-generation allocation family: any partition, address by return value
 */

use crate::core::errors::ErrorCode;
use crate::core::id::{BlockId, PartitionId};
use crate::core::types::{Address, Size};
use crate::memory::{AllocFamily, AllocationRequest, Placement};
use tracing::{instrument, warn};

use super::executor::SyscallExecutor;

impl SyscallExecutor {
    /// Allocate a block from `partition`
    ///
    /// `address` is the exact base for placement 2 (`Addr`) and ignored
    /// otherwise. Returns the positive block id or a negative error code.
    #[instrument(level = "debug", skip(self))]
    pub fn alloc_partition_memory(
        &self,
        partition: u32,
        name: &str,
        placement: i32,
        size: Size,
        address: Address,
    ) -> i32 {
        let placement = match Placement::try_from(placement) {
            Ok(p) => p,
            Err(e) => {
                warn!(placement, "rejected partition allocation: {}", e);
                return ErrorCode::from(&e).raw();
            }
        };

        let mut request = AllocationRequest::new(PartitionId(partition), size)
            .named(name)
            .with_placement(placement)
            .with_family(AllocFamily::Partition);
        if placement == Placement::Addr {
            request.address = Some(address);
        }

        Self::to_raw(self.memory.allocate_with(request), BlockId::raw)
    }

    /// Free a block allocated by [`alloc_partition_memory`](Self::alloc_partition_memory)
    #[instrument(level = "debug", skip(self))]
    pub fn free_partition_memory(&self, block: i32) -> i32 {
        Self::to_raw(
            self.memory.free_as(BlockId(block), AllocFamily::Partition),
            |_| 0,
        )
    }

    /// Lowest address of a partition block, or 0 if the id is not live
    pub fn get_block_head_addr(&self, block: i32) -> Address {
        self.memory
            .resolve_address_as(BlockId(block), AllocFamily::Partition)
            .unwrap_or(0)
    }
}
