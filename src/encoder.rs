use serde::{Deserialize, Serialize};

use crate::error::AsmError;
use crate::instructions::Opcode;
use crate::operand::Register;

// Word layout, bit 31 = MSB.
pub const OPCODE_SHIFT: u32 = 27; // 31:27
pub const IMM_FLAG: u32 = 1 << 26;
pub const RD_SHIFT: u32 = 22; // 25:22
pub const RS1_SHIFT: u32 = 18; // 21:18
pub const RS2_SHIFT: u32 = 14; // 17:14
pub const IMM_BITS: u32 = 18;
pub const IMM_MASK: u32 = (1 << IMM_BITS) - 1;
/// Bits 13:0, always zero in register form.
pub const RESERVED_MASK: u32 = (1 << RS2_SHIFT) - 1;

/// Low part of a word: either a second source register or an 18-bit
/// immediate, selected by the `I` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tail {
    Rs2(Register),
    Imm(u32),
}

/// An instruction word broken out into its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fields {
    pub op: Opcode,
    pub rd: Register,
    pub rs1: Register,
    pub tail: Tail,
}

impl Fields {
    pub fn imm_mode(&self) -> bool {
        matches!(self.tail, Tail::Imm(_))
    }

    pub fn pack(&self) -> u32 {
        let mut word = u32::from(self.op.code() & 0x1F) << OPCODE_SHIFT;
        word |= u32::from(self.rd.index() & 0xF) << RD_SHIFT;
        word |= u32::from(self.rs1.index() & 0xF) << RS1_SHIFT;
        match self.tail {
            Tail::Imm(imm) => word |= IMM_FLAG | (imm & IMM_MASK),
            Tail::Rs2(rs2) => word |= u32::from(rs2.index() & 0xF) << RS2_SHIFT,
        }
        word
    }

    /// Split a word back into fields. `None` for an unassigned opcode or a
    /// register-form word with reserved bits set.
    pub fn unpack(word: u32) -> Option<Self> {
        let op = Opcode::from_code((word >> OPCODE_SHIFT) as u8)?;
        let reg = |shift: u32| Register::new(((word >> shift) & 0xF) as u8);
        let tail = if word & IMM_FLAG != 0 {
            Tail::Imm(word & IMM_MASK)
        } else if word & RESERVED_MASK != 0 {
            return None;
        } else {
            Tail::Rs2(reg(RS2_SHIFT)?)
        };
        Some(Self {
            op,
            rd: reg(RD_SHIFT)?,
            rs1: reg(RS1_SHIFT)?,
            tail,
        })
    }
}

/// Turns one `(mnemonic, operands)` pair into a word. Implementations are
/// pure: equal inputs give equal results.
pub trait Encoder {
    fn encode_fields(&self, mnemonic: &str, operands: &str) -> Result<Fields, AsmError>;

    fn encode(&self, mnemonic: &str, operands: &str) -> Result<u32, AsmError> {
        self.encode_fields(mnemonic, operands).map(|f| f.pack())
    }
}
