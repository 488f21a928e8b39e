//! Direct resolution: candidate -> stub -> descriptor -> data -> name

use super::name::accept_name;
use super::TypeInfoResolver;
use crate::core::types::Address;
use crate::memory::RemoteMemory;
use tracing::trace;

impl TypeInfoResolver {
    /// Resolve a type name from an address whose first field points at a type-getter stub.
    ///
    /// Returns `None` as soon as any link in the chain is implausible or unreadable.
    #[tracing::instrument(level = "trace", skip_all, fields(candidate = %candidate))]
    pub fn resolve_pointer_info<M: RemoteMemory + ?Sized>(
        &self,
        candidate: Address,
        mem: &M,
    ) -> Option<String> {
        if !self.config.is_plausible(candidate) {
            trace!("candidate implausible");
            return None;
        }

        let stub = self.deref(candidate, mem, "stub")?;
        let Some(type_info) = self.decoder.decode(stub, mem) else {
            trace!(stub = %stub, "stub operand unreadable");
            return None;
        };
        self.read_type_name(type_info, mem)
    }

    /// Follow descriptor -> descriptor data -> name string
    pub(crate) fn read_type_name<M: RemoteMemory + ?Sized>(
        &self,
        type_info: Address,
        mem: &M,
    ) -> Option<String> {
        if !self.config.is_plausible(type_info) {
            trace!(type_info = %type_info, "type info implausible");
            return None;
        }

        let data = self.deref(type_info, mem, "type info data")?;
        let name_ptr = self.deref(data, mem, "name")?;

        let name = mem.read_string(name_ptr, self.config.max_name_len);
        let accepted = accept_name(name);
        if accepted.is_none() {
            trace!(name = %name_ptr, "name empty or unprintable");
        }
        accepted
    }

    /// Read a pointer and keep it only if it is plausible
    pub(crate) fn deref<M: RemoteMemory + ?Sized>(
        &self,
        address: Address,
        mem: &M,
        what: &'static str,
    ) -> Option<Address> {
        match mem.read_pointer(address, self.config.width) {
            Ok(value) if self.config.is_plausible(value) => Some(value),
            Ok(value) => {
                trace!(at = %address, value = %value, what, "implausible pointer");
                None
            }
            Err(e) => {
                trace!(at = %address, what, error = %e, "read failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PointerWidth;
    use crate::memory::{CountingMemory, SnapshotMemory};
    use crate::resolver::ResolverConfig;

    const BASE: u64 = 0x1_4000_0000;

    /// object@BASE -> stub@BASE+0x100 (lea to BASE+0x200) -> data@BASE+0x300 -> name@BASE+0x400
    fn x64_chain(name: &[u8]) -> SnapshotMemory {
        let w = PointerWidth::Width8;
        let mut mem = SnapshotMemory::new()
            .with_region(Address::new(BASE), 0x1000)
            .unwrap();
        mem.write_pointer(Address::new(BASE), Address::new(BASE + 0x100), w)
            .unwrap();
        // BASE+0x100 + 7 + 0xF9 = BASE+0x200
        mem.write_bytes(
            Address::new(BASE + 0x100),
            &[0x48, 0x8D, 0x05, 0xF9, 0x00, 0x00, 0x00, 0xC3],
        )
        .unwrap();
        mem.write_pointer(Address::new(BASE + 0x200), Address::new(BASE + 0x300), w)
            .unwrap();
        mem.write_pointer(Address::new(BASE + 0x300), Address::new(BASE + 0x400), w)
            .unwrap();
        mem.write_bytes(Address::new(BASE + 0x400), name).unwrap();
        mem
    }

    #[test]
    fn test_resolves_full_chain() {
        let mem = x64_chain(b"Vehicle\0");
        let resolver = TypeInfoResolver::default();
        assert_eq!(
            resolver.resolve_pointer_info(Address::new(BASE), &mem),
            Some("Vehicle".to_string())
        );
    }

    #[test]
    fn test_rejects_unprintable_first_byte() {
        let mem = x64_chain(b"\x02Vehicle\0");
        let resolver = TypeInfoResolver::default();
        assert_eq!(resolver.resolve_pointer_info(Address::new(BASE), &mem), None);
    }

    #[test]
    fn test_rejects_empty_name() {
        let mem = x64_chain(b"\0");
        let resolver = TypeInfoResolver::default();
        assert_eq!(resolver.resolve_pointer_info(Address::new(BASE), &mem), None);
    }

    #[test]
    fn test_name_is_capped() {
        let long = [b'A'; 100];
        let mem = x64_chain(&long);
        let resolver = TypeInfoResolver::new(ResolverConfig::default().with_max_name_len(16));
        assert_eq!(
            resolver.resolve_pointer_info(Address::new(BASE), &mem),
            Some("A".repeat(16))
        );
    }

    #[test]
    fn test_implausible_candidate_issues_no_reads() {
        let mem = CountingMemory::new(x64_chain(b"Vehicle\0"));
        let resolver = TypeInfoResolver::default();
        assert_eq!(resolver.resolve_pointer_info(Address::new(0x10), &mem), None);
        assert_eq!(mem.read_count(), 0);
    }

    #[test]
    fn test_stops_at_implausible_link() {
        let mut mem = x64_chain(b"Vehicle\0");
        // descriptor data pointer becomes null
        mem.write_pointer(Address::new(BASE + 0x200), Address::null(), PointerWidth::Width8)
            .unwrap();
        let mem = CountingMemory::new(mem);
        let resolver = TypeInfoResolver::default();
        assert_eq!(resolver.resolve_pointer_info(Address::new(BASE), &mem), None);
        // object, stub operand, descriptor; nothing after the null
        assert_eq!(
            mem.reads(),
            vec![
                Address::new(BASE),
                Address::new(BASE + 0x103),
                Address::new(BASE + 0x200),
            ]
        );
    }

    #[test]
    fn test_x86_absolute_stub() {
        let w = PointerWidth::Width4;
        let mut mem = SnapshotMemory::new()
            .with_region(Address::new(0x0040_0000), 0x1000)
            .unwrap();
        mem.write_pointer(Address::new(0x0040_0000), Address::new(0x0040_0100), w)
            .unwrap();
        // mov eax, 0x00400200
        mem.write_bytes(Address::new(0x0040_0100), &[0xB8, 0x00, 0x02, 0x40, 0x00, 0xC3])
            .unwrap();
        mem.write_pointer(Address::new(0x0040_0200), Address::new(0x0040_0300), w)
            .unwrap();
        mem.write_pointer(Address::new(0x0040_0300), Address::new(0x0040_0400), w)
            .unwrap();
        mem.write_str(Address::new(0x0040_0400), "Soldier").unwrap();

        let resolver = TypeInfoResolver::new(ResolverConfig::new(w));
        assert_eq!(
            resolver.resolve_pointer_info(Address::new(0x0040_0000), &mem),
            Some("Soldier".to_string())
        );
    }
}
