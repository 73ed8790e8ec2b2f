/*!
 * Syscall Enum
 * Serializable form of every front-end operation, used for trace replay
 */

use crate::core::types::{Address, Size};
use serde::{Deserialize, Serialize};

/// System call variants
///
/// Arguments keep their raw ABI types so that out-of-range values reach the
/// executor and fail the way a real caller's would.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "op")]
#[non_exhaustive]
pub enum Syscall {
    // ========================================================================
    // Partition Memory
    // ========================================================================
    AllocPartitionMemory {
        partition: u32,
        name: String,
        placement: i32,
        size: Size,
        /// Only read for fixed-address placement
        #[serde(default)]
        address: Address,
    },

    FreePartitionMemory {
        block: i32,
    },

    GetBlockHeadAddr {
        block: i32,
    },

    // ========================================================================
    // Memory Blocks
    // ========================================================================
    AllocMemoryBlock {
        #[serde(default)]
        name: Option<String>,
        placement: i32,
        size: Size,
        /// `size` field of the option struct; absent means no struct
        #[serde(default)]
        opt_size: Option<u32>,
    },

    FreeMemoryBlock {
        block: i32,
    },

    GetMemoryBlockAddr {
        block: i32,
    },

    // ========================================================================
    // System
    // ========================================================================
    TotalFreeMemSize,
    MaxFreeMemSize,
    DevkitVersion,

    SetCompiledSdkVersion {
        version: u32,
    },

    GetCompiledSdkVersion,

    KernelPrintf {
        message: String,
    },

    // ========================================================================
    // Introspection
    // ========================================================================
    QueryPartitions,

    QueryBlock {
        block: i32,
    },

    Snapshot,
}
