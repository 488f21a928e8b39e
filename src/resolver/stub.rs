//! Type descriptor recovery from a type-getter stub
//!
//! The first field of an object points at a tiny generated function that
//! loads the address of its type descriptor and returns. Only the one
//! instruction shape each architecture emits is decoded:
//!
//! - x64: `lea rax, [rip + disp32]` (`48 8D 05 disp32`), so the descriptor
//!   sits at `stub + 7 + disp32`.
//! - x86: `mov eax, imm32` (`B8 imm32`), so the descriptor is `imm32`.

use crate::core::types::{Address, PointerWidth};
use crate::memory::RemoteMemory;

/// Length of the x64 `lea` instruction; rip-relative targets are measured from its end
const LEA_RIP_LEN: i64 = 7;

/// Instruction-shape decoder, fixed per target architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubDecoder {
    /// 32-bit displacement at `stub + 3`, relative to `stub + 7`
    RipRelative,
    /// Absolute 32-bit address at `stub + 1`
    Absolute,
}

impl StubDecoder {
    /// Decoder matching the target's pointer width
    pub const fn for_width(width: PointerWidth) -> Self {
        match width {
            PointerWidth::Width8 => StubDecoder::RipRelative,
            PointerWidth::Width4 => StubDecoder::Absolute,
        }
    }

    /// Byte offset of the 4-byte operand inside the stub
    pub const fn operand_offset(&self) -> u64 {
        match self {
            StubDecoder::RipRelative => 3,
            StubDecoder::Absolute => 1,
        }
    }

    /// Compute the descriptor address from the stub address and its raw operand
    pub fn apply(&self, stub: Address, operand: [u8; 4]) -> Address {
        match self {
            StubDecoder::RipRelative => {
                let displacement = i64::from(i32::from_le_bytes(operand));
                stub.offset(displacement + LEA_RIP_LEN)
            }
            StubDecoder::Absolute => Address::new(u64::from(u32::from_le_bytes(operand))),
        }
    }

    /// Decode from raw stub bytes starting at `stub`
    pub fn decode_bytes(&self, stub: Address, code: &[u8]) -> Option<Address> {
        let start = self.operand_offset() as usize;
        let operand: [u8; 4] = code.get(start..start + 4)?.try_into().ok()?;
        Some(self.apply(stub, operand))
    }

    /// Read the operand from the target and decode it
    pub fn decode<M: RemoteMemory + ?Sized>(&self, stub: Address, mem: &M) -> Option<Address> {
        let mut operand = [0u8; 4];
        mem.read_bytes(stub.wrapping_add(self.operand_offset()), &mut operand)
            .ok()?;
        Some(self.apply(stub, operand))
    }
}
