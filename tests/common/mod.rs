//! Synthetic target memory for integration tests
//!
//! Two regions are mapped: an "image" inside the default module window and
//! a "heap" outside it. The first `RESERVED` bytes of each are left for
//! tests that need fixed placements; the bump allocators start after them.

#![allow(dead_code)]

use rtti_probe::{Address, AddressRange, PointerWidth, ResolverConfig, SnapshotMemory};

pub const X64_IMAGE: u64 = 0x1_4000_0000;
pub const X64_HEAP: u64 = 0x2000_0000;
pub const X86_IMAGE: u64 = 0x0040_0000;
pub const X86_HEAP: u64 = 0x0100_0000;
pub const REGION_SIZE: u64 = 0x10000;
pub const RESERVED: u64 = 0x4000;

pub struct Layout {
    pub mem: SnapshotMemory,
    pub width: PointerWidth,
    pub image: u64,
    pub heap: u64,
    next_image: u64,
    next_heap: u64,
}

impl Layout {
    pub fn x64() -> Self {
        Self::new(PointerWidth::Width8, X64_IMAGE, X64_HEAP)
    }

    pub fn x86() -> Self {
        Self::new(PointerWidth::Width4, X86_IMAGE, X86_HEAP)
    }

    fn new(width: PointerWidth, image: u64, heap: u64) -> Self {
        let mem = SnapshotMemory::new()
            .with_region(Address::new(image), REGION_SIZE as usize)
            .unwrap()
            .with_region(Address::new(heap), REGION_SIZE as usize)
            .unwrap();
        Layout {
            mem,
            width,
            image,
            heap,
            next_image: image + RESERVED,
            next_heap: heap + RESERVED,
        }
    }

    /// Resolver configuration whose module window covers exactly the image region
    pub fn config(&self) -> ResolverConfig {
        ResolverConfig::new(self.width)
            .with_module_window(AddressRange::new(self.image, self.image + REGION_SIZE - 1))
    }

    pub fn alloc_image(&mut self, size: u64) -> Address {
        let at = self.next_image;
        self.next_image += (size + 15) & !15;
        assert!(self.next_image <= self.image + REGION_SIZE, "image exhausted");
        Address::new(at)
    }

    pub fn alloc_heap(&mut self, size: u64) -> Address {
        let at = self.next_heap;
        self.next_heap += (size + 15) & !15;
        assert!(self.next_heap <= self.heap + REGION_SIZE, "heap exhausted");
        Address::new(at)
    }

    pub fn ptr_size(&self) -> u64 {
        self.width.size() as u64
    }

    pub fn write_pointer(&mut self, at: Address, value: Address) {
        self.mem.write_pointer(at, value, self.width).unwrap();
    }

    /// Raw name bytes; callers include the terminator if they want one
    pub fn name_bytes(&mut self, bytes: &[u8]) -> Address {
        let at = self.alloc_image(bytes.len() as u64 + 1);
        self.mem.write_bytes(at, bytes).unwrap();
        at
    }

    /// Descriptor data: a slot holding the name pointer
    pub fn type_data(&mut self, name: &str) -> Address {
        let name_at = self.name_bytes(format!("{}\0", name).as_bytes());
        let data = self.alloc_image(self.ptr_size());
        self.write_pointer(data, name_at);
        data
    }

    /// Type descriptor in the image: a slot holding the descriptor-data pointer
    pub fn type_descriptor(&mut self, name: &str) -> Address {
        let data = self.type_data(name);
        let descriptor = self.alloc_image(self.ptr_size());
        self.write_pointer(descriptor, data);
        descriptor
    }

    /// Type descriptor placed in the heap, outside the module window
    pub fn heap_type_descriptor(&mut self, name: &str) -> Address {
        let data = self.type_data(name);
        let descriptor = self.alloc_heap(self.ptr_size());
        self.write_pointer(descriptor, data);
        descriptor
    }

    /// Write a type-getter stub at `at` that yields `descriptor`
    pub fn stub_at(&mut self, at: Address, descriptor: Address) {
        match self.width {
            PointerWidth::Width8 => {
                let disp = (descriptor.as_u64() as i64 - (at.as_u64() as i64 + 7)) as i32;
                let mut code = vec![0x48, 0x8D, 0x05];
                code.extend_from_slice(&disp.to_le_bytes());
                code.push(0xC3);
                self.mem.write_bytes(at, &code).unwrap();
            }
            PointerWidth::Width4 => {
                let mut code = vec![0xB8];
                code.extend_from_slice(&(descriptor.as_u64() as u32).to_le_bytes());
                code.push(0xC3);
                self.mem.write_bytes(at, &code).unwrap();
            }
        }
    }

    pub fn stub(&mut self, descriptor: Address) -> Address {
        let at = self.alloc_image(16);
        self.stub_at(at, descriptor);
        at
    }

    /// Heap object whose first field points at a stub for `name`
    pub fn object(&mut self, name: &str) -> Address {
        let descriptor = self.type_descriptor(name);
        let stub = self.stub(descriptor);
        let object = self.alloc_heap(0x200);
        self.write_pointer(object, stub);
        object
    }

    /// Heap slot holding `target`
    pub fn pointer_to(&mut self, target: Address) -> Address {
        let slot = self.alloc_heap(0x20);
        self.write_pointer(slot, target);
        slot
    }

    /// Weak reference cell: returns the pointer one slot past the payload pointer
    pub fn weak_cell(&mut self, target: Address) -> Address {
        let cell = self.alloc_heap(0x40);
        self.write_pointer(cell, target);
        cell.wrapping_add(self.ptr_size())
    }

    /// Heap object with no stub whose descriptor pointer sits at +8
    pub fn object_with_type_info(&mut self, descriptor: Address) -> Address {
        let object = self.alloc_heap(0x20);
        self.write_pointer(object.wrapping_add(8), descriptor);
        object
    }
}
