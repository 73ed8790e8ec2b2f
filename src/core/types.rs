/*!
 * Core Types
 * Common types used across the memory manager
 */

/// Guest address (32-bit address space)
pub type Address = u32;

/// Size type for memory operations
pub type Size = u32;

/// Encoded firmware version, e.g. `0x0606_0010` for 6.60
pub type FirmwareVersion = u32;

/// Round `size` up to `granularity` (a power of two); `None` on overflow
#[inline]
pub fn align_up(size: Size, granularity: Size) -> Option<Size> {
    let mask = granularity - 1;
    size.checked_add(mask).map(|s| s & !mask)
}

#[inline]
pub fn is_aligned(value: u64, granularity: Size) -> bool {
    value & (granularity as u64 - 1) == 0
}

/// One past the last byte of `[base, base + len)`, widened so it cannot wrap
#[inline]
pub fn range_end(base: Address, len: Size) -> u64 {
    base as u64 + len as u64
}
