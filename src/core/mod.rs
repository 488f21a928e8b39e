//! Core module containing fundamental types for rtti-probe
//!
//! This module provides the foundational building blocks used throughout
//! the crate: remote addresses, pointer widths and error types.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{Address, AddressRange, MemoryError, MemoryResult, PointerWidth};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
