/*!
 * Partition Memory Manager
 *
 * Allocates named blocks out of a fixed set of partitions and tracks them by
 * never-reused identifiers.
 *
 * ## Free space tracking
 *
 * Each partition keeps its free ranges in an address-ordered treap augmented
 * with the largest range per subtree:
 * - **Low**: lowest range that fits, carved from its low end, O(log n)
 * - **High**: highest range that fits, carved from its high end, O(log n)
 * - **Addr**: the exact range must be free, O(log n)
 * - **Free**: merged with both neighbours immediately, O(log n)
 * - **Largest free range**: O(1) from the root
 *
 * ## Locking
 *
 * One `RwLock` per partition guards its free ranges and live-block index.
 * Allocate and free hold the write lock for the whole update, so a failed
 * call never leaves partial state behind. Partitions never contend with each
 * other. The block table is a sharded `DashMap`, always touched after the
 * partition lock.
 */

mod allocator;
mod free_list;
mod partition;
mod query;
mod snapshot;

pub use snapshot::{SnapshotError, SysMemSnapshot};

use super::traits::{MemoryInfo, PartitionAllocator};
use super::types::{AllocationRequest, BlockInfo, MemoryResult, PartitionInfo};
use crate::core::config::{Capabilities, ConfigError, SysMemConfig};
use crate::core::id::{BlockId, BlockIdGenerator, PartitionId};
use crate::core::types::{Address, FirmwareVersion, Size};
use ahash::RandomState;
use dashmap::DashMap;
use log::{info, warn};
use partition::Partition;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Partition memory manager
///
/// Cheap to clone; clones share all state.
pub struct MemoryManager {
    pub(super) partitions: Arc<BTreeMap<PartitionId, Partition>>,
    pub(super) blocks: Arc<DashMap<BlockId, BlockInfo, RandomState>>,
    pub(super) ids: Arc<BlockIdGenerator>,
    pub(super) config: Arc<SysMemConfig>,
    capabilities: Capabilities,
    // 0 until the first set
    compiled_sdk_version: Arc<AtomicU32>,
}

impl MemoryManager {
    /// Manager over the default partition layout
    pub fn new() -> Self {
        // The built-in layout is known to be valid
        Self::build(SysMemConfig::default(), BlockIdGenerator::new())
    }

    pub fn with_config(config: SysMemConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, BlockIdGenerator::new()))
    }

    pub(super) fn build(config: SysMemConfig, ids: BlockIdGenerator) -> Self {
        let partitions: BTreeMap<PartitionId, Partition> = config
            .partitions
            .iter()
            .map(|p| (p.id, Partition::new(p)))
            .collect();

        info!(
            "Memory manager initialized: {} partitions, {}-byte granularity, firmware 0x{:08x}",
            partitions.len(),
            config.granularity,
            config.firmware_version
        );

        Self {
            partitions: Arc::new(partitions),
            blocks: Arc::new(DashMap::with_hasher(RandomState::new())),
            ids: Arc::new(ids),
            capabilities: config.capabilities(),
            config: Arc::new(config),
            compiled_sdk_version: Arc::new(AtomicU32::new(0)),
        }
    }

    #[inline]
    pub fn config(&self) -> &SysMemConfig {
        &self.config
    }

    #[inline]
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Override the firmware-derived capabilities
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    #[inline]
    pub fn granularity(&self) -> Size {
        self.config.granularity
    }

    #[inline]
    pub fn user_partition(&self) -> PartitionId {
        self.config.user_partition
    }

    #[inline]
    pub fn firmware_version(&self) -> FirmwareVersion {
        self.config.firmware_version
    }

    /// Record the SDK version the caller was built against
    pub fn set_compiled_sdk_version(&self, version: u32) {
        let previous = self.compiled_sdk_version.swap(version, Ordering::SeqCst);
        if previous != 0 && previous != version {
            warn!(
                "Compiled SDK version changed from 0x{:08x} to 0x{:08x}",
                previous, version
            );
        } else {
            info!("Compiled SDK version set to 0x{:08x}", version);
        }
    }

    /// Version stored by the last set, or 0 if never set
    #[inline]
    pub fn compiled_sdk_version(&self) -> u32 {
        self.compiled_sdk_version.load(Ordering::SeqCst)
    }
}

// Implement trait interfaces
impl PartitionAllocator for MemoryManager {
    fn allocate(&self, request: AllocationRequest) -> MemoryResult<BlockId> {
        MemoryManager::allocate_with(self, request)
    }

    fn free(&self, id: BlockId) -> MemoryResult<BlockInfo> {
        MemoryManager::free(self, id)
    }

    fn resolve_address(&self, id: BlockId) -> MemoryResult<Address> {
        MemoryManager::resolve_address(self, id)
    }
}

impl MemoryInfo for MemoryManager {
    fn total_free(&self, partition: PartitionId) -> MemoryResult<Size> {
        MemoryManager::total_free(self, partition)
    }

    fn largest_free_contiguous(&self, partition: PartitionId) -> MemoryResult<Size> {
        MemoryManager::largest_free_contiguous(self, partition)
    }

    fn partition_info(&self, partition: PartitionId) -> MemoryResult<PartitionInfo> {
        MemoryManager::partition_info(self, partition)
    }

    fn block_info(&self, id: BlockId) -> MemoryResult<BlockInfo> {
        MemoryManager::block_info(self, id)
    }
}

impl Clone for MemoryManager {
    fn clone(&self) -> Self {
        Self {
            partitions: Arc::clone(&self.partitions),
            blocks: Arc::clone(&self.blocks),
            ids: Arc::clone(&self.ids),
            config: Arc::clone(&self.config),
            capabilities: self.capabilities,
            compiled_sdk_version: Arc::clone(&self.compiled_sdk_version),
        }
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new()
    }
}
