/*!
 * Memory Types
 * Common types for partition memory management
 */

use crate::core::id::{BlockId, PartitionId};
use crate::core::types::{Address, FirmwareVersion, Size};
use crate::core::BlockName;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
///
/// Every variant maps to a distinct [`ErrorCode`](crate::core::ErrorCode).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MemoryError {
    #[error("Invalid argument: {reason}")]
    #[diagnostic(code(memory::invalid_argument))]
    InvalidArgument { reason: &'static str },

    #[error("Illegal placement type {0}")]
    #[diagnostic(
        code(memory::illegal_placement_type),
        help("Placement must be 0 (low), 1 (high) or 2 (addr).")
    )]
    IllegalPlacementType(i32),

    #[error("Unknown partition {0}")]
    #[diagnostic(code(memory::unknown_partition))]
    UnknownPartition(PartitionId),

    #[error("Unknown block {0}")]
    #[diagnostic(
        code(memory::unknown_block),
        help("The block was never allocated, has been freed, or belongs to another allocation family.")
    )]
    UnknownBlock(BlockId),

    #[error("Out of memory in partition {partition}: requested {requested} bytes, largest free range {largest_free} bytes")]
    #[diagnostic(
        code(memory::out_of_memory),
        help("Free other blocks in the partition and retry.")
    )]
    OutOfMemory {
        partition: PartitionId,
        requested: Size,
        largest_free: Size,
    },

    #[error("Range [0x{address:08x}, +0x{size:x}) is not free in partition {partition}")]
    #[diagnostic(code(memory::address_unavailable))]
    AddressUnavailable {
        partition: PartitionId,
        address: Address,
        size: Size,
    },

    #[error("Illegal address: no destination for the block address")]
    #[diagnostic(code(memory::illegal_address))]
    IllegalAddress,

    #[error("{operation} is not available on firmware 0x{firmware:08x}")]
    #[diagnostic(code(memory::unsupported))]
    Unsupported {
        operation: &'static str,
        firmware: FirmwareVersion,
    },

    #[error("Block identifiers exhausted")]
    #[diagnostic(code(memory::identifiers_exhausted))]
    IdentifiersExhausted,
}

impl MemoryError {
    #[inline]
    pub(crate) fn invalid(reason: &'static str) -> Self {
        Self::InvalidArgument { reason }
    }
}

/// Where inside the free space a new block is carved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum Placement {
    /// Lowest-addressed free range that fits
    Low = 0,
    /// Highest-addressed free range that fits
    High = 1,
    /// Exactly at the caller-supplied address
    Addr = 2,
}

impl TryFrom<i32> for Placement {
    type Error = MemoryError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Placement::Low),
            1 => Ok(Placement::High),
            2 => Ok(Placement::Addr),
            other => Err(MemoryError::IllegalPlacementType(other)),
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Placement::Low => write!(f, "LOW"),
            Placement::High => write!(f, "HIGH"),
            Placement::Addr => write!(f, "ADDR"),
        }
    }
}

/// API generation a block was allocated through
///
/// Block ids are typed by family: a block can only be freed or resolved
/// through the family that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocFamily {
    /// Partition memory: any partition, any placement, address by return value
    Partition,
    /// Memory blocks: user partition only, no fixed address, address by out-parameter
    MemoryBlock,
}

/// Allocation request
#[derive(Debug, Clone)]
pub struct AllocationRequest {
    pub partition: PartitionId,
    pub name: BlockName,
    pub placement: Placement,
    pub size: Size,
    /// Required base address; only consulted for [`Placement::Addr`]
    pub address: Option<Address>,
    pub family: AllocFamily,
}

impl AllocationRequest {
    pub fn new(partition: PartitionId, size: Size) -> Self {
        Self {
            partition,
            name: BlockName::default(),
            placement: Placement::Low,
            size,
            address: None,
            family: AllocFamily::Partition,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = BlockName::new(name);
        self
    }

    pub fn high(mut self) -> Self {
        self.placement = Placement::High;
        self
    }

    /// Place the block exactly at `address`
    pub fn at(mut self, address: Address) -> Self {
        self.placement = Placement::Addr;
        self.address = Some(address);
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_family(mut self, family: AllocFamily) -> Self {
        self.family = family;
        self
    }
}

/// Live block metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub id: BlockId,
    pub partition: PartitionId,
    pub name: BlockName,
    pub base: Address,
    /// Size in bytes, already rounded to the granularity
    pub size: Size,
    pub placement: Placement,
    pub family: AllocFamily,
}

impl BlockInfo {
    /// One past the last byte of the block
    #[inline]
    pub fn end(&self) -> u64 {
        self.base as u64 + self.size as u64
    }

    #[inline]
    pub fn overlaps(&self, other: &BlockInfo) -> bool {
        (self.base as u64) < other.end() && (other.base as u64) < self.end()
    }
}

/// Partition statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionInfo {
    pub id: PartitionId,
    pub name: String,
    pub base: Address,
    pub len: Size,
    pub total_free: Size,
    pub largest_free_contiguous: Size,
    pub live_blocks: usize,
    pub free_ranges: usize,
}

impl PartitionInfo {
    #[inline]
    pub fn used(&self) -> Size {
        self.len - self.total_free
    }

    /// Share of free space not reachable by the largest single allocation
    pub fn fragmentation(&self) -> f64 {
        if self.total_free == 0 {
            0.0
        } else {
            1.0 - self.largest_free_contiguous as f64 / self.total_free as f64
        }
    }
}
