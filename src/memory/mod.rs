//! Memory access capabilities
//!
//! Everything the resolver reads goes through [`RemoteMemory`]. Reads never
//! write to the target and carry no state between calls.

pub mod reader;

pub use reader::{CountingMemory, RemoteMemory, RemoteMemoryExt, RemoteValue, SnapshotMemory};

#[cfg(windows)]
pub use reader::ProcessMemory;
