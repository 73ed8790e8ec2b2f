/*!
 * Syscall Executor
 * ABI-level entry points over the partition memory manager
 */

use super::console::{DebugConsole, TracingConsole};
use super::types::{Syscall, SyscallResult};
use crate::core::errors::ErrorCode;
use crate::core::id::{BlockId, PartitionId};
use crate::memory::{MemoryManager, MemoryResult};
use std::sync::Arc;
use tracing::debug;

/// Syscall front end
///
/// Both allocation families are thin wrappers over one [`MemoryManager`];
/// this layer only converts between raw ABI integers and typed results.
#[derive(Clone)]
pub struct SyscallExecutor {
    pub(super) memory: MemoryManager,
    pub(super) console: Arc<dyn DebugConsole>,
}

impl SyscallExecutor {
    pub fn new(memory: MemoryManager) -> Self {
        Self {
            memory,
            console: Arc::new(TracingConsole),
        }
    }

    /// Route kernel printf output somewhere other than the tracing log
    pub fn with_console(mut self, console: Arc<dyn DebugConsole>) -> Self {
        self.console = console;
        self
    }

    #[inline]
    pub fn memory(&self) -> &MemoryManager {
        &self.memory
    }

    /// Execute a decoded syscall
    pub fn execute(&self, syscall: &Syscall) -> SyscallResult {
        debug!(?syscall, "executing");
        match syscall {
            Syscall::AllocPartitionMemory {
                partition,
                name,
                placement,
                size,
                address,
            } => SyscallResult::code(self.alloc_partition_memory(
                *partition, name, *placement, *size, *address,
            )),
            Syscall::FreePartitionMemory { block } => {
                SyscallResult::code(self.free_partition_memory(*block))
            }
            Syscall::GetBlockHeadAddr { block } => {
                SyscallResult::value(self.get_block_head_addr(*block))
            }
            Syscall::AllocMemoryBlock {
                name,
                placement,
                size,
                opt_size,
            } => {
                let opt = opt_size.map(|size| super::types::MemoryBlockOptParam { size });
                SyscallResult::code(self.alloc_memory_block(
                    name.as_deref(),
                    *placement,
                    *size,
                    opt.as_ref(),
                ))
            }
            Syscall::FreeMemoryBlock { block } => {
                SyscallResult::code(self.free_memory_block(*block))
            }
            Syscall::GetMemoryBlockAddr { block } => {
                let mut address = 0;
                let code = self.get_memory_block_addr(*block, Some(&mut address));
                SyscallResult::address(code, address)
            }
            Syscall::TotalFreeMemSize => SyscallResult::value(self.total_free_mem_size()),
            Syscall::MaxFreeMemSize => SyscallResult::value(self.max_free_mem_size()),
            Syscall::DevkitVersion => SyscallResult::value(self.devkit_version()),
            Syscall::SetCompiledSdkVersion { version } => {
                SyscallResult::code(self.set_compiled_sdk_version(*version))
            }
            Syscall::GetCompiledSdkVersion => {
                SyscallResult::value(self.get_compiled_sdk_version())
            }
            Syscall::KernelPrintf { message } => {
                match self.kernel_printf(format_args!("{}", message)) {
                    Ok(()) => SyscallResult::Done,
                    Err(e) => SyscallResult::code(ErrorCode::from(e).raw()),
                }
            }
            Syscall::QueryPartitions => SyscallResult::Partitions {
                partitions: self.memory.partitions(),
            },
            Syscall::QueryBlock { block } => match self.memory.block_info(BlockId(*block)) {
                Ok(info) => SyscallResult::Block { block: info },
                Err(e) => SyscallResult::code(ErrorCode::from(e).raw()),
            },
            Syscall::Snapshot => SyscallResult::Snapshot {
                snapshot: Box::new(self.memory.snapshot()),
            },
        }
    }

    /// Collapse a typed result into the raw return convention
    #[inline]
    pub(super) fn to_raw<T>(result: MemoryResult<T>, ok: impl FnOnce(T) -> i32) -> i32 {
        match result {
            Ok(value) => ok(value),
            Err(e) => ErrorCode::from(&e).raw(),
        }
    }

    #[inline]
    pub(super) fn user_partition(&self) -> PartitionId {
        self.memory.user_partition()
    }
}
