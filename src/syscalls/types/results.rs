/*!
 * Syscall Result Types
 * Defines result types for syscall operations
 */

use crate::core::errors::ErrorCode;
use crate::memory::{BlockInfo, PartitionInfo, SysMemSnapshot};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Outcome of an executed [`Syscall`](super::Syscall)
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SyscallResult {
    /// Raw return code: a block id, 0, or a negative error code
    Code {
        code: i32,
        /// Decoded form of a negative `code`
        error: Option<ErrorCode>,
    },
    /// Unsigned value (address, size or version)
    Value { value: u32 },
    /// Status code plus the out-parameter, present only on success
    Address { code: i32, address: Option<u32> },
    Partitions { partitions: Vec<PartitionInfo> },
    Block { block: BlockInfo },
    Snapshot { snapshot: Box<SysMemSnapshot> },
    /// Completed with nothing to return
    Done,
    /// The request could not be decoded
    Error { message: String },
}

impl SyscallResult {
    #[inline]
    #[must_use]
    pub fn code(code: i32) -> Self {
        Self::Code {
            code,
            error: ErrorCode::try_from(code).ok(),
        }
    }

    #[inline]
    #[must_use]
    pub fn value(value: u32) -> Self {
        Self::Value { value }
    }

    #[inline]
    #[must_use]
    pub fn address(code: i32, address: u32) -> Self {
        Self::Address {
            code,
            address: (code == 0).then_some(address),
        }
    }

    #[inline]
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Check if the call reported a failure
    #[inline]
    #[must_use]
    pub const fn is_error(&self) -> bool {
        match self {
            Self::Code { code, .. } | Self::Address { code, .. } => *code < 0,
            Self::Error { .. } => true,
            _ => false,
        }
    }
}
