//! Read-only access to the memory of a target process
//!
//! [`RemoteMemory`] is the single capability the resolver consumes. It is
//! implemented by a live process reader on Windows and by [`SnapshotMemory`]
//! for captured or synthetic memory images.

pub mod counting;
#[cfg(windows)]
pub mod process;
pub mod snapshot;

pub use counting::CountingMemory;
#[cfg(windows)]
pub use process::ProcessMemory;
pub use snapshot::SnapshotMemory;

use crate::core::types::{Address, MemoryResult, PointerWidth};

/// Read capability bound to one target process
pub trait RemoteMemory {
    /// Fill `buffer` with the bytes at `address`, failing unless every byte was read
    fn read_bytes(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<()>;

    /// Read a pointer-sized value, zero-extended to 64 bits
    fn read_pointer(&self, address: Address, width: PointerWidth) -> MemoryResult<Address> {
        let mut buffer = [0u8; 8];
        self.read_bytes(address, &mut buffer[..width.size()])?;
        Ok(Address::new(u64::from_le_bytes(buffer)))
    }

    /// Read a UTF-8 string that stops at the first NUL or after `max_len` bytes.
    ///
    /// Returns an empty string if the read fails. Invalid sequences are replaced.
    fn read_string(&self, address: Address, max_len: usize) -> String {
        let mut buffer = vec![0u8; max_len];
        if self.read_bytes(address, &mut buffer).is_err() {
            return String::new();
        }
        decode_c_string(&buffer)
    }
}

/// Decode bytes up to the first NUL as lossy UTF-8
pub(crate) fn decode_c_string(buffer: &[u8]) -> String {
    let len = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..len]).into_owned()
}

/// Fixed-width little-endian value that can be read from remote memory
pub trait RemoteValue: Copy {
    const SIZE: usize;

    fn from_le_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_remote_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl RemoteValue for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn from_le_slice(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_remote_value!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Typed reads on top of any [`RemoteMemory`]
pub trait RemoteMemoryExt: RemoteMemory {
    /// Read a typed value from memory
    fn read<T: RemoteValue>(&self, address: Address) -> MemoryResult<T> {
        let mut buffer = [0u8; 8];
        self.read_bytes(address, &mut buffer[..T::SIZE])?;
        Ok(T::from_le_slice(&buffer[..T::SIZE]))
    }
}

impl<M: RemoteMemory + ?Sized> RemoteMemoryExt for M {}

impl<M: RemoteMemory + ?Sized> RemoteMemory for &M {
    fn read_bytes(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<()> {
        (**self).read_bytes(address, buffer)
    }

    fn read_pointer(&self, address: Address, width: PointerWidth) -> MemoryResult<Address> {
        (**self).read_pointer(address, width)
    }

    fn read_string(&self, address: Address, max_len: usize) -> String {
        (**self).read_string(address, max_len)
    }
}

impl<M: RemoteMemory + ?Sized> RemoteMemory for Box<M> {
    fn read_bytes(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<()> {
        (**self).read_bytes(address, buffer)
    }

    fn read_pointer(&self, address: Address, width: PointerWidth) -> MemoryResult<Address> {
        (**self).read_pointer(address, width)
    }

    fn read_string(&self, address: Address, max_len: usize) -> String {
        (**self).read_string(address, max_len)
    }
}
