/*!
 * Syscall Parameter Structs
 */

use crate::core::limits::MEMORY_BLOCK_OPT_PARAM_SIZE;
use serde::{Deserialize, Serialize};

/// Optional parameter block for memory block allocation
///
/// Callers set `size` to the size of the struct itself; any other value is
/// rejected.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBlockOptParam {
    pub size: u32,
}

impl MemoryBlockOptParam {
    pub const fn new() -> Self {
        Self {
            size: MEMORY_BLOCK_OPT_PARAM_SIZE,
        }
    }
}

impl Default for MemoryBlockOptParam {
    fn default() -> Self {
        Self::new()
    }
}
