/*!
 * Core Module
 * Fundamental types, identifiers, configuration and error codes
 */

pub mod config;
pub mod data_structures;
pub mod errors;
pub mod id;
pub mod limits;
pub mod types;

// Re-export for convenience
pub use config::{Capabilities, ConfigError, PartitionConfig, SysMemConfig};
pub use data_structures::BlockName;
pub use errors::ErrorCode;
pub use id::{BlockId, BlockIdGenerator, PartitionId};
pub use types::*;
