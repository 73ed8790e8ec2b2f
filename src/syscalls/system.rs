/*!
 * System Syscalls
 * Free-size queries, version accessors and debug printf
 */

use crate::memory::{MemoryError, MemoryResult};
use std::fmt;
use tracing::{instrument, warn};

use super::executor::SyscallExecutor;

impl SyscallExecutor {
    /// Free bytes in the user partition
    pub fn total_free_mem_size(&self) -> u32 {
        self.memory
            .total_free(self.user_partition())
            .unwrap_or_else(|e| {
                warn!("total free size query failed: {}", e);
                0
            })
    }

    /// Largest contiguous free range in the user partition
    pub fn max_free_mem_size(&self) -> u32 {
        self.memory
            .largest_free_contiguous(self.user_partition())
            .unwrap_or_else(|e| {
                warn!("max free size query failed: {}", e);
                0
            })
    }

    /// Encoded firmware version, e.g. `0x06060010` for 6.60
    #[inline]
    pub fn devkit_version(&self) -> u32 {
        self.memory.firmware_version()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn set_compiled_sdk_version(&self, version: u32) -> i32 {
        self.memory.set_compiled_sdk_version(version);
        0
    }

    #[inline]
    pub fn get_compiled_sdk_version(&self) -> u32 {
        self.memory.compiled_sdk_version()
    }

    /// Write formatted text to the debug console
    ///
    /// Usually reached through the [`kernel_printf!`](crate::kernel_printf) macro.
    pub fn kernel_printf(&self, args: fmt::Arguments<'_>) -> MemoryResult<()> {
        if !self.memory.capabilities().kernel_printf {
            return Err(MemoryError::Unsupported {
                operation: "kernel printf",
                firmware: self.memory.firmware_version(),
            });
        }
        match args.as_str() {
            Some(text) => self.console.write(text),
            None => self.console.write(&args.to_string()),
        }
        Ok(())
    }
}

/// Formats its arguments and writes them through
/// [`SyscallExecutor::kernel_printf`]
///
/// ```
/// use sysmem_kernel::{kernel_printf, MemoryManager, SyscallExecutor};
///
/// let exec = SyscallExecutor::new(MemoryManager::new());
/// kernel_printf!(exec, "free: {} bytes", exec.total_free_mem_size()).unwrap();
/// ```
#[macro_export]
macro_rules! kernel_printf {
    ($exec:expr, $($arg:tt)*) => {
        $exec.kernel_printf(::std::format_args!($($arg)*))
    };
}
