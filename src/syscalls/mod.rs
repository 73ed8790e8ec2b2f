/*!
 * Syscalls Module
 * Raw-ABI front ends over the memory manager
 */

mod console;
mod executor;
mod memory_block;
mod partition;
mod system;
mod types;

// Re-export public API
pub use console::{BufferConsole, DebugConsole, TracingConsole};
pub use executor::SyscallExecutor;
pub use types::{MemoryBlockOptParam, Syscall, SyscallResult};
