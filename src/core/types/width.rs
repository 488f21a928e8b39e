//! Target pointer width

use super::address::{Address, AddressRange};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest address the plausibility check accepts; the first 64 KiB are never mapped on Windows.
pub const MIN_PLAUSIBLE_ADDRESS: u64 = 0x10000;

/// Pointer width of the target process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerWidth {
    #[serde(rename = "x86")]
    Width4,
    #[serde(rename = "x64")]
    #[default]
    Width8,
}

impl PointerWidth {
    /// Returns the pointer size in bytes
    pub const fn size(&self) -> usize {
        match self {
            PointerWidth::Width4 => 4,
            PointerWidth::Width8 => 8,
        }
    }

    /// Default range of addresses considered worth dereferencing
    pub const fn plausible_range(&self) -> AddressRange {
        match self {
            PointerWidth::Width4 => AddressRange::new(MIN_PLAUSIBLE_ADDRESS, i32::MAX as u64),
            PointerWidth::Width8 => AddressRange::new(MIN_PLAUSIBLE_ADDRESS, i64::MAX as u64),
        }
    }

    /// Checks an address against the default plausible range
    pub fn may_be_valid(&self, address: Address) -> bool {
        self.plausible_range().contains(address)
    }

    /// Width of the process this crate was built for
    pub const fn native() -> Self {
        if cfg!(target_pointer_width = "64") {
            PointerWidth::Width8
        } else {
            PointerWidth::Width4
        }
    }

    /// Checks if this is a 64-bit target
    pub const fn is_64bit(&self) -> bool {
        matches!(self, PointerWidth::Width8)
    }
}

impl fmt::Display for PointerWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerWidth::Width4 => write!(f, "x86"),
            PointerWidth::Width8 => write!(f, "x64"),
        }
    }
}
