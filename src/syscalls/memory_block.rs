/*!
 * Memory Block Syscalls
 * Second-generation allocation family: user partition only, address by
 * out-parameter. Requires firmware 3.50 or later.
 */

use crate::core::id::BlockId;
use crate::core::limits::MEMORY_BLOCK_OPT_PARAM_SIZE;
use crate::core::types::{Address, Size};
use crate::memory::{AllocFamily, AllocationRequest, MemoryError, MemoryResult, Placement};
use tracing::{instrument, warn};

use super::executor::SyscallExecutor;
use super::types::MemoryBlockOptParam;

impl SyscallExecutor {
    /// Allocate a block from the user partition
    ///
    /// `name` must be present. Only placements 0 (`Low`) and 1 (`High`) are
    /// legal. When `opt` is given its `size` field must equal the struct size.
    #[instrument(level = "debug", skip(self))]
    pub fn alloc_memory_block(
        &self,
        name: Option<&str>,
        placement: i32,
        size: Size,
        opt: Option<&MemoryBlockOptParam>,
    ) -> i32 {
        Self::to_raw(
            self.try_alloc_memory_block(name, placement, size, opt),
            BlockId::raw,
        )
    }

    fn try_alloc_memory_block(
        &self,
        name: Option<&str>,
        placement: i32,
        size: Size,
        opt: Option<&MemoryBlockOptParam>,
    ) -> MemoryResult<BlockId> {
        self.require_memory_blocks("memory block allocation")?;

        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(MemoryError::invalid("memory blocks need a name")),
        };
        let placement = Placement::try_from(placement)?;
        if placement == Placement::Addr {
            warn!(name, "fixed-address placement is illegal for memory blocks");
            return Err(MemoryError::invalid(
                "fixed-address placement is not allowed for memory blocks",
            ));
        }
        if let Some(opt) = opt {
            if opt.size != MEMORY_BLOCK_OPT_PARAM_SIZE {
                warn!(size = opt.size, "malformed memory block option struct");
                return Err(MemoryError::invalid("option struct size mismatch"));
            }
        }

        let request = AllocationRequest::new(self.user_partition(), size)
            .named(name)
            .with_placement(placement)
            .with_family(AllocFamily::MemoryBlock);
        self.memory.allocate_with(request)
    }

    /// Free a block allocated by [`alloc_memory_block`](Self::alloc_memory_block)
    #[instrument(level = "debug", skip(self))]
    pub fn free_memory_block(&self, block: i32) -> i32 {
        let result = self
            .require_memory_blocks("memory block free")
            .and_then(|_| self.memory.free_as(BlockId(block), AllocFamily::MemoryBlock));
        Self::to_raw(result, |_| 0)
    }

    /// Write the base address of a memory block into `out`
    ///
    /// A missing destination is `IllegalAddress`; `out` is left untouched on
    /// any error.
    pub fn get_memory_block_addr(&self, block: i32, out: Option<&mut Address>) -> i32 {
        let result = self
            .require_memory_blocks("memory block address query")
            .and_then(|_| {
                self.memory
                    .resolve_address_as(BlockId(block), AllocFamily::MemoryBlock)
            })
            .and_then(|address| match out {
                Some(out) => {
                    *out = address;
                    Ok(())
                }
                None => Err(MemoryError::IllegalAddress),
            });
        Self::to_raw(result, |_| 0)
    }

    fn require_memory_blocks(&self, operation: &'static str) -> MemoryResult<()> {
        if self.memory.capabilities().memory_blocks {
            Ok(())
        } else {
            Err(MemoryError::Unsupported {
                operation,
                firmware: self.memory.firmware_version(),
            })
        }
    }
}
