/*!
 * Memory Module
 * Partition memory management and allocation
 */

pub mod manager;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use manager::{MemoryManager, SnapshotError, SysMemSnapshot};
pub use traits::*;
pub use types::*;
