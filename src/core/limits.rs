/*!
 * System Limits and Constants
 *
 * Centralized location for allocator limits, firmware revisions and the
 * default partition layout.
 */

use super::types::{Address, Size};

// =============================================================================
// ALLOCATOR
// =============================================================================

/// Default allocation granularity (256 bytes)
/// Every block size is rounded up to this, and fixed-address hints must be aligned to it
pub const DEFAULT_GRANULARITY: Size = 256;

/// Longest block name kept, in bytes (the ABI name field is 32 bytes with a terminator)
pub const BLOCK_NAME_MAX: usize = 31;

/// Size of the memory block option struct as seen by the ABI
pub const MEMORY_BLOCK_OPT_PARAM_SIZE: u32 = 4;

// =============================================================================
// BLOCK IDS
// =============================================================================

/// Largest block id ever issued (ids stay positive so they can share a
/// return channel with negative error codes)
pub const BLOCK_ID_MAX: u32 = i32::MAX as u32;

// =============================================================================
// FIRMWARE REVISIONS
// =============================================================================

/// 1.50: kernel printf becomes available
pub const FIRMWARE_1_50: u32 = 0x0105_0001;

/// 3.50: the memory block allocation family becomes available
pub const FIRMWARE_3_50: u32 = 0x0305_0010;

/// 6.60: default emulated firmware
pub const DEFAULT_FIRMWARE_VERSION: u32 = 0x0606_0010;

/// Environment variable naming a JSON config file
pub const CONFIG_ENV_VAR: &str = "SYSMEM_CONFIG";

// =============================================================================
// DEFAULT PARTITION LAYOUT
// =============================================================================

pub const KERNEL_PARTITION_ID: u32 = 1;
pub const KERNEL_PARTITION_BASE: Address = 0x8800_0000;
pub const KERNEL_PARTITION_SIZE: Size = 3 * 1024 * 1024;

pub const USER_PARTITION_ID: u32 = 2;
pub const USER_PARTITION_BASE: Address = 0x0880_0000;
pub const USER_PARTITION_SIZE: Size = 24 * 1024 * 1024;

pub const VOLATILE_PARTITION_ID: u32 = 5;
pub const VOLATILE_PARTITION_BASE: Address = 0x0840_0000;
pub const VOLATILE_PARTITION_SIZE: Size = 4 * 1024 * 1024;
