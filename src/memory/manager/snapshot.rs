/*!
 * Manager Snapshots
 * Save-state capture and restore of the complete allocator state
 */

use super::super::types::BlockInfo;
use super::MemoryManager;
use crate::core::config::{ConfigError, SysMemConfig};
use crate::core::id::{BlockId, BlockIdGenerator};
use crate::core::limits::BLOCK_ID_MAX;
use crate::core::types::is_aligned;
use log::info;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;
use thiserror::Error;

/// Snapshot errors
#[derive(Error, Debug, Diagnostic)]
pub enum SnapshotError {
    #[error("Invalid snapshot config: {0}")]
    #[diagnostic(code(snapshot::config))]
    Config(#[from] ConfigError),

    #[error("Block {0} is not in a configured partition")]
    #[diagnostic(code(snapshot::unknown_partition))]
    UnknownPartition(BlockId),

    #[error("Block {0} is misaligned or empty")]
    #[diagnostic(code(snapshot::misaligned_block))]
    MisalignedBlock(BlockId),

    #[error("Block {0} overlaps another block or leaves its partition")]
    #[diagnostic(code(snapshot::overlap))]
    Overlap(BlockId),

    #[error("Next block id {0} is outside 1..=2147483648")]
    #[diagnostic(
        code(snapshot::invalid_id_counter),
        help("Block ids start at 1 and never exceed i32::MAX")
    )]
    InvalidIdCounter(u32),

    #[error("Block {0} was not issued before the snapshot was taken")]
    #[diagnostic(code(snapshot::foreign_id))]
    ForeignId(BlockId),

    #[error("Block {0} appears more than once")]
    #[diagnostic(code(snapshot::duplicate_block))]
    DuplicateBlock(BlockId),

    #[error("Snapshot encoding failed: {0}")]
    #[diagnostic(code(snapshot::encoding))]
    Encoding(#[from] bincode::Error),
}

/// Complete allocator state
///
/// Free space is not stored; it is everything in each partition not covered
/// by a live block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysMemSnapshot {
    pub config: SysMemConfig,
    /// Block id counter at capture time; every live block id is below it
    pub next_id: u32,
    pub compiled_sdk_version: u32,
    /// Live blocks, sorted by id
    pub blocks: Vec<BlockInfo>,
}

impl SysMemSnapshot {
    /// Compact binary encoding for save-state files
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl MemoryManager {
    /// Capture the current state
    ///
    /// Partitions are read-locked one at a time, so a snapshot taken while
    /// other threads allocate is consistent per partition only.
    pub fn snapshot(&self) -> SysMemSnapshot {
        let mut blocks = Vec::with_capacity(self.blocks.len());
        for partition in self.partitions.values() {
            let state = partition.state.read();
            blocks.extend(
                state
                    .live
                    .values()
                    .filter_map(|id| self.blocks.get(id).map(|entry| entry.value().clone())),
            );
        }
        blocks.sort_by_key(|b| b.id);

        SysMemSnapshot {
            config: (*self.config).clone(),
            next_id: self.ids.next_id(),
            compiled_sdk_version: self.compiled_sdk_version(),
            blocks,
        }
    }

    /// Rebuild a manager from a snapshot
    ///
    /// Every block is re-carved at its recorded address, so overlapping or
    /// out-of-bounds blocks are rejected rather than trusted.
    pub fn restore(snapshot: SysMemSnapshot) -> Result<Self, SnapshotError> {
        let SysMemSnapshot {
            config,
            next_id,
            compiled_sdk_version,
            blocks,
        } = snapshot;

        if next_id == 0 || next_id as u64 > BLOCK_ID_MAX as u64 + 1 {
            return Err(SnapshotError::InvalidIdCounter(next_id));
        }
        config.validate()?;
        let granularity = config.granularity;

        for block in &blocks {
            if block.id.raw() <= 0 || block.id.raw() as u32 >= next_id {
                return Err(SnapshotError::ForeignId(block.id));
            }
        }

        // Resumes at the larger of the process-wide counter and `next_id`
        let ids = BlockIdGenerator::resume(next_id);
        let manager = Self::build(config, ids);

        for block in blocks {
            let id = block.id;
            if manager.blocks.contains_key(&id) {
                return Err(SnapshotError::DuplicateBlock(id));
            }
            if block.size == 0
                || !is_aligned(block.base as u64, granularity)
                || !is_aligned(block.size as u64, granularity)
            {
                return Err(SnapshotError::MisalignedBlock(id));
            }
            let partition = manager
                .partitions
                .get(&block.partition)
                .ok_or(SnapshotError::UnknownPartition(id))?;

            let mut state = partition.state.write();
            if !state.free.take_exact(block.base, block.size) {
                return Err(SnapshotError::Overlap(id));
            }
            state.live.insert(block.base, id);
            manager.blocks.insert(id, block);
        }

        manager
            .compiled_sdk_version
            .store(compiled_sdk_version, Ordering::SeqCst);
        info!(
            "Restored memory manager with {} live blocks",
            manager.blocks.len()
        );
        Ok(manager)
    }
}
