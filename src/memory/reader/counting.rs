//! Read recorder wrapped around another capability

use super::RemoteMemory;
use crate::core::types::{Address, MemoryResult, PointerWidth};
use std::sync::Mutex;

/// Records the address of every read before forwarding it
#[derive(Debug)]
pub struct CountingMemory<M> {
    inner: M,
    reads: Mutex<Vec<Address>>,
}

impl<M: RemoteMemory> CountingMemory<M> {
    /// Wrap a memory capability
    pub fn new(inner: M) -> Self {
        CountingMemory {
            inner,
            reads: Mutex::new(Vec::new()),
        }
    }

    /// Addresses read so far, in order
    pub fn reads(&self) -> Vec<Address> {
        self.reads
            .lock()
            .map(|reads| reads.clone())
            .unwrap_or_default()
    }

    /// Number of reads issued so far
    pub fn read_count(&self) -> usize {
        self.reads.lock().map(|reads| reads.len()).unwrap_or(0)
    }

    /// Forget recorded reads
    pub fn reset(&self) {
        if let Ok(mut reads) = self.reads.lock() {
            reads.clear();
        }
    }

    fn record(&self, address: Address) {
        if let Ok(mut reads) = self.reads.lock() {
            reads.push(address);
        }
    }
}

impl<M: RemoteMemory> RemoteMemory for CountingMemory<M> {
    fn read_bytes(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<()> {
        self.record(address);
        self.inner.read_bytes(address, buffer)
    }

    fn read_pointer(&self, address: Address, width: PointerWidth) -> MemoryResult<Address> {
        self.record(address);
        self.inner.read_pointer(address, width)
    }

    fn read_string(&self, address: Address, max_len: usize) -> String {
        self.record(address);
        self.inner.read_string(address, max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{RemoteMemoryExt, SnapshotMemory};

    #[test]
    fn test_records_each_read_once() {
        let mem = SnapshotMemory::new()
            .with_region(Address::new(0x10000), 0x100)
            .unwrap();
        let counting = CountingMemory::new(mem);

        let _ = counting.read_pointer(Address::new(0x10000), PointerWidth::Width8);
        let _ = counting.read::<i32>(Address::new(0x10008));
        let _ = counting.read_string(Address::new(0x10010), 64);
        let _ = counting.read::<u8>(Address::new(0x90000));

        assert_eq!(
            counting.reads(),
            vec![
                Address::new(0x10000),
                Address::new(0x10008),
                Address::new(0x10010),
                Address::new(0x90000),
            ]
        );

        counting.reset();
        assert_eq!(counting.read_count(), 0);
    }
}
