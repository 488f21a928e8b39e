//! Host-facing adapter
//!
//! A structure viewer asks for one annotation per visible field. This is the
//! only place that knows about that calling convention; the resolver itself
//! is a plain library.

use crate::core::types::{Address, PointerWidth};
use crate::memory::RemoteMemory;
use crate::resolver::TypeInfoResolver;
use serde::Serialize;

/// Annotation hook a host invokes once per inspected memory value
pub trait NodeInfoReader {
    /// Describe the object `value` refers to, or `None` to show nothing
    fn read_node_info(&self, value: Address, mem: &dyn RemoteMemory) -> Option<String>;
}

impl NodeInfoReader for TypeInfoResolver {
    fn read_node_info(&self, value: Address, mem: &dyn RemoteMemory) -> Option<String> {
        self.resolve_node_info(value, mem)
    }
}

/// One pointer-sized field of an inspected structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldAnnotation {
    /// Byte offset from the structure base
    pub offset: u64,
    /// Address of the field itself
    pub address: Address,
    /// Value stored in the field; `None` if it could not be read
    pub value: Option<Address>,
    /// Annotation for that value
    pub info: Option<String>,
}

/// Annotate `count` consecutive pointer-sized fields starting at `base`
pub fn annotate_fields(
    reader: &dyn NodeInfoReader,
    mem: &dyn RemoteMemory,
    base: Address,
    count: usize,
    width: PointerWidth,
) -> Vec<FieldAnnotation> {
    let step = width.size() as u64;
    (0..count as u64)
        .map(|index| {
            let offset = index * step;
            let address = base.wrapping_add(offset);
            let value = mem.read_pointer(address, width).ok();
            let info = value.and_then(|value| reader.read_node_info(value, mem));
            FieldAnnotation {
                offset,
                address,
                value,
                info,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::SnapshotMemory;

    /// Reader that labels every value it is asked about
    struct EchoReader;

    impl NodeInfoReader for EchoReader {
        fn read_node_info(&self, value: Address, _mem: &dyn RemoteMemory) -> Option<String> {
            (!value.is_null()).then(|| format!("seen {:X}", value.as_u64()))
        }
    }

    #[test]
    fn test_annotate_fields_walks_pointer_slots() {
        let w = PointerWidth::Width8;
        let mut mem = SnapshotMemory::new()
            .with_region(Address::new(0x10000), 0x18)
            .unwrap();
        mem.write_pointer(Address::new(0x10000), Address::new(0xAAAA0), w)
            .unwrap();
        mem.write_pointer(Address::new(0x10010), Address::new(0xBBBB0), w)
            .unwrap();

        let fields = annotate_fields(&EchoReader, &mem, Address::new(0x10000), 4, w);
        assert_eq!(fields.len(), 4);

        assert_eq!(fields[0].offset, 0);
        assert_eq!(fields[0].info.as_deref(), Some("seen AAAA0"));
        assert_eq!(fields[1].address, Address::new(0x10008));
        assert_eq!(fields[1].value, Some(Address::null()));
        assert_eq!(fields[1].info, None);
        assert_eq!(fields[2].info.as_deref(), Some("seen BBBB0"));
        // past the end of the captured region
        assert_eq!(fields[3].offset, 0x18);
        assert_eq!(fields[3].value, None);
        assert_eq!(fields[3].info, None);
    }

    #[test]
    fn test_x86_stride() {
        let mem = SnapshotMemory::new()
            .with_region(Address::new(0x10000), 0x10)
            .unwrap();
        let fields = annotate_fields(
            &EchoReader,
            &mem,
            Address::new(0x10000),
            3,
            PointerWidth::Width4,
        );
        let offsets: Vec<u64> = fields.iter().map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0, 4, 8]);
    }

    #[test]
    fn test_resolver_as_reader() {
        let mem = SnapshotMemory::new();
        let resolver = TypeInfoResolver::default();
        let reader: &dyn NodeInfoReader = &resolver;
        assert_eq!(reader.read_node_info(Address::new(0x10000), &mem), None);
    }

    #[test]
    fn test_field_annotation_json() {
        let field = FieldAnnotation {
            offset: 8,
            address: Address::new(0x10008),
            value: Some(Address::new(0x20000)),
            info: Some("Ptr -> Vehicle".to_string()),
        };
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["address"], "0x10008");
        assert_eq!(json["value"], "0x20000");
        assert_eq!(json["info"], "Ptr -> Vehicle");
    }
}
