//! Kernel32.dll bindings for opening and reading a target process

use crate::core::types::{Address, MemoryError, MemoryResult};
use std::io;
use winapi::shared::minwindef::{BOOL, FALSE, LPCVOID, LPVOID};
use winapi::um::handleapi::CloseHandle;
use winapi::um::memoryapi::ReadProcessMemory;
use winapi::um::processthreadsapi::OpenProcess;
use winapi::um::winnt::HANDLE;
use winapi::um::wow64apiset::IsWow64Process;

/// OpenProcess with the given access mask; a null handle maps to `ProcessNotFound`
pub fn open_process(pid: u32, desired_access: u32) -> MemoryResult<HANDLE> {
    let handle = unsafe { OpenProcess(desired_access, FALSE, pid) };
    if handle.is_null() {
        return Err(MemoryError::ProcessNotFound(format!(
            "PID {}: {}",
            pid,
            io::Error::last_os_error()
        )));
    }
    Ok(handle)
}

/// Safe wrapper for CloseHandle
///
/// # Safety
/// The handle must be a valid Windows handle
pub unsafe fn close_handle(handle: HANDLE) -> MemoryResult<()> {
    if handle.is_null() {
        return Ok(());
    }

    if CloseHandle(handle) == FALSE {
        Err(MemoryError::WindowsApi("Failed to close handle".to_string()))
    } else {
        Ok(())
    }
}

/// ReadProcessMemory into `buffer`, returning the number of bytes copied
///
/// # Safety
/// The handle must be a valid process handle with PROCESS_VM_READ access
pub unsafe fn read_process_memory(
    handle: HANDLE,
    address: Address,
    buffer: &mut [u8],
) -> MemoryResult<usize> {
    let raw = usize::try_from(address.as_u64())
        .map_err(|_| MemoryError::InvalidAddress(address.to_string()))?;
    let mut bytes_read = 0;

    let ok = ReadProcessMemory(
        handle,
        raw as LPCVOID,
        buffer.as_mut_ptr() as LPVOID,
        buffer.len(),
        &mut bytes_read,
    );
    if ok == FALSE {
        return Err(MemoryError::read_failed(
            address,
            io::Error::last_os_error().to_string(),
        ));
    }
    Ok(bytes_read)
}

/// Safe wrapper for IsWow64Process
///
/// # Safety
/// The handle must be a valid process handle with PROCESS_QUERY_INFORMATION access
pub unsafe fn is_wow64_process(handle: HANDLE) -> MemoryResult<bool> {
    let mut wow64: BOOL = FALSE;
    if IsWow64Process(handle, &mut wow64) == FALSE {
        return Err(MemoryError::last_os_error());
    }
    Ok(wow64 != FALSE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_null_handle_operations() {
        unsafe {
            assert!(close_handle(ptr::null_mut()).is_ok());

            let mut buffer = vec![0u8; 4];
            assert!(read_process_memory(ptr::null_mut(), Address::new(0x1000), &mut buffer).is_err());
            assert!(is_wow64_process(ptr::null_mut()).is_err());
        }
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_open_invalid_process() {
        use winapi::um::winnt::PROCESS_VM_READ;
        assert!(open_process(0, PROCESS_VM_READ).is_err());
    }
}
