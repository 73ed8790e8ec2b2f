/*!
 * Block Names
 * Bounded, inline-optimized names for memory blocks
 */

use crate::core::limits::BLOCK_NAME_MAX;
use serde::{Deserialize, Deserializer, Serialize};
use smartstring::alias::String as SmartString;
use std::fmt;

/// Name attached to a memory block
///
/// Truncated to [`BLOCK_NAME_MAX`] bytes on a char boundary, matching the
/// fixed-length name field of the ABI. Names are advisory and not unique.
/// Short names are stored inline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct BlockName {
    inner: SmartString,
}

impl BlockName {
    pub fn new(name: &str) -> Self {
        let mut end = name.len().min(BLOCK_NAME_MAX);
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        Self {
            inner: SmartString::from(&name[..end]),
        }
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<&str> for BlockName {
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for BlockName {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BlockName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Names from untrusted snapshots get the same truncation as fresh ones
impl<'de> Deserialize<'de> for BlockName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}
