/*!
 * Partition State
 * One allocation domain: its address range, free ranges and live blocks
 */

use super::free_list::FreeList;
use crate::core::config::PartitionConfig;
use crate::core::id::{BlockId, PartitionId};
use crate::core::types::{range_end, Address, Size};
use crate::memory::types::{Placement, PartitionInfo};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// A fixed address range managed as one allocation domain
///
/// All mutable state sits behind a single lock: allocate and free take it
/// for writing, queries for reading.
#[derive(Debug)]
pub(super) struct Partition {
    pub id: PartitionId,
    pub name: String,
    pub base: Address,
    pub len: Size,
    pub state: RwLock<PartitionState>,
}

#[derive(Debug)]
pub(super) struct PartitionState {
    pub free: FreeList,
    /// Live blocks by base address
    pub live: BTreeMap<Address, BlockId>,
}

impl Partition {
    pub fn new(config: &PartitionConfig) -> Self {
        Self {
            id: config.id,
            name: config.name.clone(),
            base: config.base,
            len: config.len,
            state: RwLock::new(PartitionState {
                free: FreeList::spanning(config.base, config.len),
                live: BTreeMap::new(),
            }),
        }
    }

    /// Whether `[addr, addr + size)` lies inside the partition
    #[inline]
    pub fn contains(&self, addr: Address, size: Size) -> bool {
        addr >= self.base && range_end(addr, size) <= range_end(self.base, self.len)
    }

    pub fn info(&self) -> PartitionInfo {
        let state = self.state.read();
        PartitionInfo {
            id: self.id,
            name: self.name.clone(),
            base: self.base,
            len: self.len,
            total_free: state.free.total(),
            largest_free_contiguous: state.free.largest(),
            live_blocks: state.live.len(),
            free_ranges: state.free.len(),
        }
    }
}

impl PartitionState {
    /// Carve `size` bytes by `placement`; `address` is only read for `Addr`
    pub fn carve(&mut self, placement: Placement, size: Size, address: Address) -> Option<Address> {
        match placement {
            Placement::Low => self.free.take_low(size),
            Placement::High => self.free.take_high(size),
            Placement::Addr => self.free.take_exact(address, size).then_some(address),
        }
    }
}
