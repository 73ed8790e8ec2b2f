/*!
 * Syscall Types Module
 * Request, result and parameter types for the syscall front end
 */

mod params;
mod results;
mod syscall;

// Re-export all public types
pub use params::MemoryBlockOptParam;
pub use results::SyscallResult;
pub use syscall::Syscall;
