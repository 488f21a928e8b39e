//! Read-only process handle with RAII semantics

use crate::core::types::{Address, MemoryError, MemoryResult, PointerWidth, ProcessId};
use crate::windows::bindings::kernel32;
use std::fmt;
use std::ptr;
use winapi::um::winnt::{HANDLE, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ};

/// Access mask used for every handle: query plus read, never write
pub const READ_ACCESS: u32 = PROCESS_QUERY_INFORMATION | PROCESS_VM_READ;

/// Owned handle to a target process, closed on drop
pub struct ProcessHandle {
    handle: HANDLE,
    pid: ProcessId,
}

impl ProcessHandle {
    /// Open a process for reading memory
    pub fn open_for_read(pid: ProcessId) -> MemoryResult<Self> {
        let handle = kernel32::open_process(pid, READ_ACCESS)?;
        tracing::debug!(pid, "opened process for read");
        Ok(ProcessHandle { handle, pid })
    }

    /// Get the process ID
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Check if handle is valid
    pub fn is_valid(&self) -> bool {
        !self.handle.is_null()
    }

    /// Pointer width of the target: WOW64 processes are 32-bit
    pub fn architecture(&self) -> MemoryResult<PointerWidth> {
        if !self.is_valid() {
            return Err(MemoryError::InvalidHandle(
                "Process handle is null".to_string(),
            ));
        }
        let wow64 = unsafe { kernel32::is_wow64_process(self.handle)? };
        if wow64 || !cfg!(target_pointer_width = "64") {
            Ok(PointerWidth::Width4)
        } else {
            Ok(PointerWidth::Width8)
        }
    }

    /// Read memory from the process; may copy fewer bytes than requested
    pub fn read_memory(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        if !self.is_valid() {
            return Err(MemoryError::InvalidHandle(
                "Process handle is null".to_string(),
            ));
        }
        unsafe { kernel32::read_process_memory(self.handle, address, buffer) }
    }

    #[cfg(test)]
    fn null(pid: ProcessId) -> Self {
        ProcessHandle {
            handle: ptr::null_mut(),
            pid,
        }
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        // Ignore errors on cleanup
        unsafe {
            let _ = kernel32::close_handle(self.handle);
        }
        self.handle = ptr::null_mut();
    }
}

// HANDLEs are process-local and ReadProcessMemory is thread-safe
unsafe impl Send for ProcessHandle {}
unsafe impl Sync for ProcessHandle {}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("valid", &self.is_valid())
            .finish()
    }
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProcessHandle(pid={}, valid={})",
            self.pid,
            self.is_valid()
        )
    }
}
