//! Runtime settings for one resolver instance

use crate::config::{
    Config, DEFAULT_MAX_NAME_LEN, DEFAULT_MODULE_WINDOW, DEFAULT_TYPE_INFO_OFFSET,
    MAX_NAME_LEN_LIMIT,
};
use crate::core::types::{Address, AddressRange, PointerWidth};

/// Static configuration consulted by every resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Pointer width of the target; also selects the stub decoder
    pub width: PointerWidth,
    /// Addresses outside this window are never dereferenced
    pub plausible: AddressRange,
    /// Window the structural fallback accepts type descriptors from
    pub module_window: AddressRange,
    /// Offset of the type descriptor pointer inside an object
    pub type_info_offset: u64,
    /// Cap on bytes read for a type name
    pub max_name_len: usize,
    /// Enables the weak-reference indirection step
    pub weak_pointer: bool,
}

impl ResolverConfig {
    /// Defaults for a target of the given width
    pub fn new(width: PointerWidth) -> Self {
        ResolverConfig {
            width,
            plausible: width.plausible_range(),
            module_window: DEFAULT_MODULE_WINDOW,
            type_info_offset: DEFAULT_TYPE_INFO_OFFSET,
            max_name_len: DEFAULT_MAX_NAME_LEN,
            weak_pointer: true,
        }
    }

    pub fn with_module_window(mut self, window: AddressRange) -> Self {
        self.module_window = window;
        self
    }

    pub fn with_plausible_range(mut self, range: AddressRange) -> Self {
        self.plausible = range;
        self
    }

    pub fn with_weak_pointer(mut self, enabled: bool) -> Self {
        self.weak_pointer = enabled;
        self
    }

    pub fn with_type_info_offset(mut self, offset: u64) -> Self {
        self.type_info_offset = offset;
        self
    }

    /// Capped at [`MAX_NAME_LEN_LIMIT`]; the name buffer is allocated up front
    pub fn with_max_name_len(mut self, max_name_len: usize) -> Self {
        self.max_name_len = max_name_len.min(MAX_NAME_LEN_LIMIT);
        self
    }

    /// Plausibility predicate: cheap, and no guarantee the memory is mapped
    pub fn is_plausible(&self, address: Address) -> bool {
        self.plausible.contains(address)
    }

    /// Pointer width in bytes as an address delta
    pub fn pointer_size(&self) -> u64 {
        self.width.size() as u64
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig::new(PointerWidth::default())
    }
}

impl From<&Config> for ResolverConfig {
    fn from(config: &Config) -> Self {
        let heuristics = &config.heuristics;
        ResolverConfig::new(config.target.architecture)
            .with_plausible_range(config.target.plausible_range())
            .with_module_window(heuristics.module_window())
            .with_type_info_offset(heuristics.type_info_offset)
            .with_max_name_len(heuristics.max_name_len)
            .with_weak_pointer(heuristics.weak_pointer)
    }
}
