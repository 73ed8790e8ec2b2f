/*!
 * Error Types
 * Stable numeric error codes for the syscall ABI
 */

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export MemoryError from memory module
pub use crate::memory::{MemoryError, MemoryResult};

// Re-export ConfigError from config module
pub use super::config::ConfigError;

/// Declares a `#[repr(i32)]` enum together with a `TryFrom<i32>` going back
macro_rules! back_to_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident {
        $($(#[$vmeta:meta])* $vname:ident = $val:expr,)*
    }) => {
        $(#[$meta])*
        $vis enum $name {
            $($(#[$vmeta])* $vname = $val,)*
        }

        impl TryFrom<i32> for $name {
            type Error = i32;

            fn try_from(v: i32) -> Result<Self, Self::Error> {
                match v {
                    $(x if x == $name::$vname as i32 => Ok($name::$vname),)*
                    other => Err(other),
                }
            }
        }
    }
}

back_to_enum! {
    /// Raw error codes returned across the syscall boundary
    ///
    /// Every distinct failure condition has its own small negative value.
    /// Values are part of the ABI and must never be renumbered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    #[repr(i32)]
    pub enum ErrorCode {
        InvalidArgument = -1,
        IllegalPlacementType = -2,
        UnknownPartition = -3,
        UnknownBlock = -4,
        OutOfMemory = -5,
        AddressUnavailable = -6,
        IllegalAddress = -7,
        Unsupported = -8,
        IdentifiersExhausted = -9,
    }
}

impl ErrorCode {
    #[inline]
    pub const fn raw(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.raw())
    }
}

impl From<&MemoryError> for ErrorCode {
    fn from(err: &MemoryError) -> Self {
        match err {
            MemoryError::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            MemoryError::IllegalPlacementType(_) => ErrorCode::IllegalPlacementType,
            MemoryError::UnknownPartition(_) => ErrorCode::UnknownPartition,
            MemoryError::UnknownBlock(_) => ErrorCode::UnknownBlock,
            MemoryError::OutOfMemory { .. } => ErrorCode::OutOfMemory,
            MemoryError::AddressUnavailable { .. } => ErrorCode::AddressUnavailable,
            MemoryError::IllegalAddress => ErrorCode::IllegalAddress,
            MemoryError::Unsupported { .. } => ErrorCode::Unsupported,
            MemoryError::IdentifiersExhausted => ErrorCode::IdentifiersExhausted,
        }
    }
}

impl From<MemoryError> for ErrorCode {
    fn from(err: MemoryError) -> Self {
        ErrorCode::from(&err)
    }
}
