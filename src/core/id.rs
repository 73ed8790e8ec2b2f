/*!
 * ID Generation System
 * Type-safe block and partition identifiers with a non-recycling generator
 */

use super::limits::BLOCK_ID_MAX;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

// ============================================================================
// Type-Safe ID Wrappers
// ============================================================================

/// Memory block identifier
///
/// Always positive so the raw value can share a return channel with negative
/// error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub i32);

/// Partition identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionId(pub u32);

impl BlockId {
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Block ID Generator
// ============================================================================

/// Next block id to hand out, shared by every manager in the process
static NEXT_BLOCK_ID: AtomicU32 = AtomicU32::new(1);

/// Monotonic block id generator
///
/// Every generator draws from one process-wide counter, so no two managers
/// ever issue the same id and an id from one manager is never live in
/// another. Ids are never recycled; once the positive `i32` range is spent,
/// `next` returns `None` for good.
#[derive(Debug)]
pub struct BlockIdGenerator {
    source: &'static AtomicU32,
}

impl BlockIdGenerator {
    pub fn new() -> Self {
        Self {
            source: &NEXT_BLOCK_ID,
        }
    }

    /// Generator that never issues an id below `next_id` (snapshot restore)
    pub fn resume(next_id: u32) -> Self {
        let gen = Self::new();
        gen.source.fetch_max(next_id, Ordering::SeqCst);
        gen
    }

    /// Generator over a private counter, so exhaustion can be exercised
    /// without spending the process-wide id space
    #[cfg(test)]
    pub(crate) fn isolated(next_id: u32) -> Self {
        Self {
            source: Box::leak(Box::new(AtomicU32::new(next_id))),
        }
    }

    #[inline]
    pub fn next(&self) -> Option<BlockId> {
        self.source
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |next| {
                (next <= BLOCK_ID_MAX).then_some(next + 1)
            })
            .ok()
            .map(|id| BlockId(id as i32))
    }

    /// Id the next call to `next` would use
    #[inline]
    pub fn next_id(&self) -> u32 {
        self.source.load(Ordering::SeqCst)
    }

    /// Whether every id has been handed out
    #[inline]
    pub fn exhausted(&self) -> bool {
        self.next_id() > BLOCK_ID_MAX
    }
}

impl Default for BlockIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
