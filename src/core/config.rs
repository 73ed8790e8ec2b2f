/*!
 * Manager Configuration
 *
 * Partition layout, allocation granularity and the emulated firmware
 * revision. Loaded from JSON or built from defaults.
 */

use super::id::PartitionId;
use super::limits::*;
use super::types::{is_aligned, range_end, Address, FirmwareVersion, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Granularity {0} is not a nonzero power of two")]
    #[diagnostic(code(config::granularity))]
    InvalidGranularity(Size),

    #[error("No partitions configured")]
    #[diagnostic(code(config::no_partitions))]
    NoPartitions,

    #[error("Partition {0} is empty")]
    #[diagnostic(code(config::empty_partition))]
    EmptyPartition(PartitionId),

    #[error("Partition {id} [0x{base:08x}, +0x{len:x}) is not aligned to {granularity} bytes")]
    #[diagnostic(
        code(config::misaligned_partition),
        help("Partition base and length must both be multiples of the granularity.")
    )]
    MisalignedPartition {
        id: PartitionId,
        base: Address,
        len: Size,
        granularity: Size,
    },

    #[error("Partition {0} runs past the end of the 32-bit address space")]
    #[diagnostic(code(config::partition_overflow))]
    PartitionOverflow(PartitionId),

    #[error("Partitions {0} and {1} overlap")]
    #[diagnostic(code(config::overlap))]
    Overlap(PartitionId, PartitionId),

    #[error("Partition id {0} is used more than once")]
    #[diagnostic(code(config::duplicate_partition))]
    DuplicatePartition(PartitionId),

    #[error("User partition {0} is not configured")]
    #[diagnostic(
        code(config::unknown_user_partition),
        help("`user_partition` must name one of the configured partitions.")
    )]
    UnknownUserPartition(PartitionId),

    #[error("Failed to read config: {0}")]
    #[diagnostic(code(config::io))]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    #[diagnostic(code(config::parse))]
    Parse(#[from] serde_json::Error),
}

/// One partition of the address map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionConfig {
    pub id: PartitionId,
    pub name: String,
    pub base: Address,
    pub len: Size,
}

impl PartitionConfig {
    pub fn new(id: u32, name: impl Into<String>, base: Address, len: Size) -> Self {
        Self {
            id: PartitionId(id),
            name: name.into(),
            base,
            len,
        }
    }
}

/// Memory manager configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SysMemConfig {
    /// Allocation granularity in bytes (power of two)
    pub granularity: Size,
    /// Emulated firmware revision; gates which operations are available
    pub firmware_version: FirmwareVersion,
    /// Partition used by the memory block family and the free-size queries
    pub user_partition: PartitionId,
    pub partitions: Vec<PartitionConfig>,
}

impl Default for SysMemConfig {
    fn default() -> Self {
        Self {
            granularity: DEFAULT_GRANULARITY,
            firmware_version: DEFAULT_FIRMWARE_VERSION,
            user_partition: PartitionId(USER_PARTITION_ID),
            partitions: vec![
                PartitionConfig::new(
                    KERNEL_PARTITION_ID,
                    "kernel",
                    KERNEL_PARTITION_BASE,
                    KERNEL_PARTITION_SIZE,
                ),
                PartitionConfig::new(
                    USER_PARTITION_ID,
                    "user",
                    USER_PARTITION_BASE,
                    USER_PARTITION_SIZE,
                ),
                PartitionConfig::new(
                    VOLATILE_PARTITION_ID,
                    "volatile",
                    VOLATILE_PARTITION_BASE,
                    VOLATILE_PARTITION_SIZE,
                ),
            ],
        }
    }
}

impl SysMemConfig {
    /// Single-partition layout, handy for tests and tools
    pub fn single(base: Address, len: Size, granularity: Size) -> Self {
        Self {
            granularity,
            firmware_version: DEFAULT_FIRMWARE_VERSION,
            user_partition: PartitionId(USER_PARTITION_ID),
            partitions: vec![PartitionConfig::new(USER_PARTITION_ID, "user", base, len)],
        }
    }

    pub fn with_firmware(mut self, version: FirmwareVersion) -> Self {
        self.firmware_version = version;
        self
    }

    pub fn with_granularity(mut self, granularity: Size) -> Self {
        self.granularity = granularity;
        self
    }

    /// Load and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file named by `SYSMEM_CONFIG`, or the defaults when unset
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                log::info!("Loading partition layout from {}", Path::new(&path).display());
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.granularity == 0 || !self.granularity.is_power_of_two() {
            return Err(ConfigError::InvalidGranularity(self.granularity));
        }
        if self.partitions.is_empty() {
            return Err(ConfigError::NoPartitions);
        }

        let mut ids = HashSet::new();
        for p in &self.partitions {
            if !ids.insert(p.id) {
                return Err(ConfigError::DuplicatePartition(p.id));
            }
            if p.len == 0 {
                return Err(ConfigError::EmptyPartition(p.id));
            }
            if !is_aligned(p.base as u64, self.granularity)
                || !is_aligned(p.len as u64, self.granularity)
            {
                return Err(ConfigError::MisalignedPartition {
                    id: p.id,
                    base: p.base,
                    len: p.len,
                    granularity: self.granularity,
                });
            }
            if range_end(p.base, p.len) > 1u64 << 32 {
                return Err(ConfigError::PartitionOverflow(p.id));
            }
        }

        let mut by_base: Vec<&PartitionConfig> = self.partitions.iter().collect();
        by_base.sort_by_key(|p| p.base);
        for pair in by_base.windows(2) {
            if range_end(pair[0].base, pair[0].len) > pair[1].base as u64 {
                return Err(ConfigError::Overlap(pair[0].id, pair[1].id));
            }
        }

        if !ids.contains(&self.user_partition) {
            return Err(ConfigError::UnknownUserPartition(self.user_partition));
        }
        Ok(())
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::for_firmware(self.firmware_version)
    }
}

/// Operations available at a given firmware revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Memory block allocation family (alloc/free/get address by out-parameter)
    pub memory_blocks: bool,
    /// Kernel debug printf
    pub kernel_printf: bool,
}

impl Capabilities {
    pub const fn for_firmware(version: FirmwareVersion) -> Self {
        Self {
            memory_blocks: version >= FIRMWARE_3_50,
            kernel_printf: version >= FIRMWARE_1_50,
        }
    }

    /// Everything enabled
    pub const fn all() -> Self {
        Self {
            memory_blocks: true,
            kernel_printf: true,
        }
    }
}
