//! Core type definitions for rtti-probe
//!
//! Address wrappers, target pointer width and error types shared by the
//! memory, resolver and host layers.

mod address;
mod error;
mod width;

// Re-export all public types
pub use address::{Address, AddressRange};
pub use error::{MemoryError, MemoryResult};
pub use width::{PointerWidth, MIN_PLAUSIBLE_ADDRESS};

// Common type aliases
pub type ProcessId = u32;
