//! Live process memory through `ReadProcessMemory`

use super::RemoteMemory;
use crate::core::types::{Address, MemoryError, MemoryResult, PointerWidth};
use crate::process::ProcessHandle;

/// Read capability bound to an open process handle
pub struct ProcessMemory<'a> {
    handle: &'a ProcessHandle,
}

impl<'a> ProcessMemory<'a> {
    /// Create a reader over an open handle
    pub fn new(handle: &'a ProcessHandle) -> Self {
        ProcessMemory { handle }
    }

    /// Pointer width of the attached process
    pub fn architecture(&self) -> MemoryResult<PointerWidth> {
        self.handle.architecture()
    }

    /// Process ID of the attached process
    pub fn pid(&self) -> u32 {
        self.handle.pid()
    }
}

impl RemoteMemory for ProcessMemory<'_> {
    fn read_bytes(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<()> {
        let read = self.handle.read_memory(address, buffer)?;
        if read != buffer.len() {
            return Err(MemoryError::short_read(address, buffer.len(), read));
        }
        Ok(())
    }
}
