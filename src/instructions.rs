use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    Add = 0b00000,
    Sub = 0b00001,
    Mul = 0b00010,
    Div = 0b00011,
    Mod = 0b00100,
    Cmp = 0b00101,
    And = 0b00110,
    Or = 0b00111,
    Not = 0b01000,
    Mov = 0b01001,
    Sll = 0b01010,
    Lsr = 0b01011,
    Asr = 0b01100,
    Nop = 0b01101,
    Ld = 0b01110,
    St = 0b01111,
    Beq = 0b10000,
    Bgt = 0b10001,
    B = 0b10010,
    Call = 0b10011,
    Ret = 0b10100,
}

/// Operand layout of a mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// `OP RD, RS1`
    Unary,
    /// `OP RD, #IMM` or `OP RD, RS1`
    Transfer,
    /// `OP RD, RS1, RS2` or `OP RD, RS1, #IMM`
    Alu,
}

impl Shape {
    pub fn arity(self) -> usize {
        match self {
            Shape::Unary | Shape::Transfer => 2,
            Shape::Alu => 3,
        }
    }

    /// Human readable operand form, used in operand count errors.
    pub fn form(self, mnemonic: &str) -> String {
        match self {
            Shape::Unary => format!("{mnemonic} RD, RS1"),
            Shape::Transfer => format!("{mnemonic} RD, #IMM (or RD, RS1 for register copy)"),
            Shape::Alu => format!("{mnemonic} RD, RS1, RS2_or_#IMM"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub op: Opcode,
    pub mnemonic: &'static str,
    pub shape: Shape,
}

const fn desc(op: Opcode, mnemonic: &'static str, shape: Shape) -> InstrDesc {
    InstrDesc { op, mnemonic, shape }
}

pub const TABLE: &[InstrDesc] = &[
    desc(Opcode::Add, "ADD", Shape::Alu),
    desc(Opcode::Sub, "SUB", Shape::Alu),
    desc(Opcode::Mul, "MUL", Shape::Alu),
    desc(Opcode::Div, "DIV", Shape::Alu),
    desc(Opcode::Mod, "MOD", Shape::Alu),
    desc(Opcode::Cmp, "CMP", Shape::Alu),
    desc(Opcode::And, "AND", Shape::Alu),
    desc(Opcode::Or, "OR", Shape::Alu),
    desc(Opcode::Not, "NOT", Shape::Unary),
    desc(Opcode::Mov, "MOV", Shape::Transfer),
    desc(Opcode::Sll, "SLL", Shape::Alu),
    desc(Opcode::Lsr, "LSR", Shape::Alu),
    desc(Opcode::Asr, "ASR", Shape::Alu),
    desc(Opcode::Nop, "NOP", Shape::Alu),
    desc(Opcode::Ld, "LD", Shape::Transfer),
    desc(Opcode::St, "ST", Shape::Transfer),
    desc(Opcode::Beq, "BEQ", Shape::Alu),
    desc(Opcode::Bgt, "BGT", Shape::Alu),
    desc(Opcode::B, "B", Shape::Alu),
    desc(Opcode::Call, "CALL", Shape::Alu),
    desc(Opcode::Ret, "RET", Shape::Alu),
];

/// Case-insensitive mnemonic lookup.
pub fn lookup(mnemonic: &str) -> Option<&'static InstrDesc> {
    TABLE.iter().find(|d| d.mnemonic.eq_ignore_ascii_case(mnemonic))
}

impl Opcode {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        TABLE.iter().map(|d| d.op).find(|op| op.code() == code)
    }

    pub fn desc(self) -> &'static InstrDesc {
        // TABLE is indexed by opcode value.
        &TABLE[self as usize]
    }

    pub fn mnemonic(self) -> &'static str {
        self.desc().mnemonic
    }

    pub fn shape(self) -> Shape {
        self.desc().shape
    }
}
