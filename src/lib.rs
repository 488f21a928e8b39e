//! rtti-probe: heuristic runtime type names for objects in another process
//!
//! Hand it an address and a read capability into a running target and it
//! tries to answer "what kind of object is this" by chasing the pointers the
//! target runtime uses to reach its type descriptors. No debug symbols or
//! cooperation from the target are needed, and no answer is guaranteed.

pub mod config;
pub mod core;
pub mod host;
pub mod memory;
#[cfg(windows)]
pub mod process;
pub mod resolver;
#[cfg(windows)]
pub mod windows;

// Re-export main types from core module
pub use core::types::{
    Address, AddressRange, MemoryError, MemoryResult, PointerWidth, ProcessId,
};

pub use host::{annotate_fields, FieldAnnotation, NodeInfoReader};
pub use memory::{RemoteMemory, RemoteMemoryExt, SnapshotMemory};
pub use resolver::{Resolution, ResolverConfig, StubDecoder, TypeInfoResolver};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_constants() {
        assert_eq!(core::VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(core::AUTHORS, env!("CARGO_PKG_AUTHORS"));
    }

    #[test]
    fn test_reexports() {
        let addr = Address::new(0x1000);
        assert_eq!(addr.as_u64(), 0x1000);
        assert!(Address::null().is_null());

        assert_eq!(PointerWidth::Width8.size(), 8);
        assert_eq!(
            TypeInfoResolver::default().decoder(),
            StubDecoder::RipRelative
        );

        let error = MemoryError::InvalidAddress("0xBAD".to_string());
        assert!(error.to_string().contains("Invalid memory address"));
    }
}
