//! Memory image built from captured regions
//!
//! A snapshot stands in for a live process: either captured bytes loaded
//! from a TOML file, or synthetic layouts assembled in tests.

use super::RemoteMemory;
use crate::core::types::{Address, MemoryError, MemoryResult, PointerWidth};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// On-disk snapshot layout
#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default, rename = "region")]
    regions: Vec<RegionSpec>,
}

#[derive(Debug, Deserialize)]
struct RegionSpec {
    base: u64,
    bytes: String,
}

/// Read-only memory made of non-overlapping regions
#[derive(Debug, Clone, Default)]
pub struct SnapshotMemory {
    regions: BTreeMap<u64, Vec<u8>>,
}

impl SnapshotMemory {
    /// Create an empty snapshot
    pub fn new() -> Self {
        SnapshotMemory::default()
    }

    /// Parse a snapshot from TOML text.
    ///
    /// ```toml
    /// [[region]]
    /// base = 0x140000000
    /// bytes = "48 8d 05 f9 0f 00 00 c3"
    /// ```
    pub fn from_toml_str(contents: &str) -> MemoryResult<Self> {
        let file: SnapshotFile = toml::from_str(contents)?;
        let mut snapshot = SnapshotMemory::new();
        for region in file.regions {
            let hex_text: String = region.bytes.split_whitespace().collect();
            let bytes = hex::decode(hex_text)?;
            snapshot.add_region(Address::new(region.base), bytes)?;
        }
        Ok(snapshot)
    }

    /// Load a snapshot file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> MemoryResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Add a region, rejecting empty or overlapping ones
    pub fn add_region(&mut self, base: Address, bytes: Vec<u8>) -> MemoryResult<()> {
        if bytes.is_empty() {
            return Err(MemoryError::InvalidSnapshot(format!(
                "region at {} is empty",
                base
            )));
        }
        let start = base.as_u64();
        let end = start
            .checked_add(bytes.len() as u64)
            .ok_or_else(|| MemoryError::InvalidSnapshot(format!("region at {} overflows", base)))?;

        let overlaps_previous = self
            .regions
            .range(..=start)
            .next_back()
            .is_some_and(|(&b, data)| b + data.len() as u64 > start);
        let overlaps_next = self.regions.range(start..end).next().is_some();
        if overlaps_previous || overlaps_next {
            return Err(MemoryError::InvalidSnapshot(format!(
                "region at {} overlaps an existing region",
                base
            )));
        }

        self.regions.insert(start, bytes);
        Ok(())
    }

    /// Add a zero-filled region of `size` bytes
    pub fn with_region(mut self, base: Address, size: usize) -> MemoryResult<Self> {
        self.add_region(base, vec![0u8; size])?;
        Ok(self)
    }

    /// Number of regions
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Total number of captured bytes
    pub fn total_size(&self) -> usize {
        self.regions.values().map(Vec::len).sum()
    }

    /// Overwrite bytes inside an existing region
    pub fn write_bytes(&mut self, address: Address, data: &[u8]) -> MemoryResult<()> {
        let (offset, region) = self
            .region_mut(address)
            .ok_or_else(|| MemoryError::InvalidAddress(address.to_string()))?;
        let end = offset + data.len();
        if end > region.len() {
            return Err(MemoryError::InvalidAddress(format!(
                "{} + {} bytes crosses the end of its region",
                address,
                data.len()
            )));
        }
        region[offset..end].copy_from_slice(data);
        Ok(())
    }

    /// Store a pointer of the given width
    pub fn write_pointer(
        &mut self,
        address: Address,
        value: Address,
        width: PointerWidth,
    ) -> MemoryResult<()> {
        let bytes = value.as_u64().to_le_bytes();
        self.write_bytes(address, &bytes[..width.size()])
    }

    /// Store a little-endian i32
    pub fn write_i32(&mut self, address: Address, value: i32) -> MemoryResult<()> {
        self.write_bytes(address, &value.to_le_bytes())
    }

    /// Store a NUL-terminated string
    pub fn write_str(&mut self, address: Address, value: &str) -> MemoryResult<()> {
        let mut bytes = value.as_bytes().to_vec();
        bytes.push(0);
        self.write_bytes(address, &bytes)
    }

    fn region(&self, address: Address) -> Option<(usize, &[u8])> {
        let addr = address.as_u64();
        let (&base, data) = self.regions.range(..=addr).next_back()?;
        let offset = (addr - base) as usize;
        (offset < data.len()).then_some((offset, data.as_slice()))
    }

    fn region_mut(&mut self, address: Address) -> Option<(usize, &mut Vec<u8>)> {
        let addr = address.as_u64();
        let (&base, data) = self.regions.range_mut(..=addr).next_back()?;
        let offset = (addr - base) as usize;
        (offset < data.len()).then_some((offset, data))
    }
}

impl RemoteMemory for SnapshotMemory {
    fn read_bytes(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<()> {
        let (offset, region) = self
            .region(address)
            .ok_or_else(|| MemoryError::read_failed(address, "address not captured"))?;
        let available = region.len() - offset;
        if available < buffer.len() {
            return Err(MemoryError::short_read(address, buffer.len(), available));
        }
        buffer.copy_from_slice(&region[offset..offset + buffer.len()]);
        Ok(())
    }
}
