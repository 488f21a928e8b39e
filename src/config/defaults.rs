//! Default configuration values for rtti-probe

use crate::core::types::{AddressRange, PointerWidth};

/// Image range the structural fallback accepts type descriptors from.
///
/// Matches a 64-bit executable loaded at its preferred base of 0x140000000.
/// Other targets need their own window.
pub const DEFAULT_MODULE_WINDOW: AddressRange = AddressRange::new(0x1_4000_0000, 0x1_5000_0000);

/// Byte offset of the type descriptor pointer inside an object
pub const DEFAULT_TYPE_INFO_OFFSET: u64 = 0x08;

/// Longest type name read from the target
pub const DEFAULT_MAX_NAME_LEN: usize = 64;

pub const DEFAULT_ARCHITECTURE: PointerWidth = PointerWidth::Width8;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "rtti-probe.toml";

pub const VALID_LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Address;

    #[test]
    fn test_module_window() {
        assert!(DEFAULT_MODULE_WINDOW.contains(Address::new(0x1_4000_0000)));
        assert!(DEFAULT_MODULE_WINDOW.contains(Address::new(0x1_5000_0000)));
        assert!(!DEFAULT_MODULE_WINDOW.contains(Address::new(0x1_3FFF_FFFF)));
        assert!(!DEFAULT_MODULE_WINDOW.contains(Address::new(0x1_5000_0001)));
    }

    #[test]
    fn test_scalar_defaults() {
        assert_eq!(DEFAULT_TYPE_INFO_OFFSET, 8);
        assert_eq!(DEFAULT_MAX_NAME_LEN, 64);
        assert_eq!(DEFAULT_ARCHITECTURE, PointerWidth::Width8);
        assert!(VALID_LOG_LEVELS.contains(&DEFAULT_LOG_LEVEL));
    }
}
