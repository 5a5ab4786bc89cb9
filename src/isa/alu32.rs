use crate::config::{AsmConfig, OverflowPolicy};
use crate::encoder::{Encoder, Fields, Tail, IMM_BITS};
use crate::error::AsmError;
use crate::instructions::{lookup, Shape};
use crate::operand::{parse_operand, parse_register, Immediate, Operand, Register};

/// Encoder for the 32-bit ALU/load-store instruction set: 5-bit opcode, an
/// immediate flag, three 4-bit register fields or an 18-bit immediate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alu32Encoder {
    overflow: OverflowPolicy,
}

impl Alu32Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(cfg: &AsmConfig) -> Self {
        Self { overflow: cfg.overflow }
    }

    fn imm_field(&self, tok: &str, imm: Immediate) -> Result<u32, AsmError> {
        if !imm.fits(IMM_BITS) {
            match self.overflow {
                OverflowPolicy::Reject => {
                    return Err(AsmError::ImmediateOverflow {
                        literal: tok.to_string(),
                        bits: IMM_BITS,
                    })
                }
                OverflowPolicy::Wrap => {
                    tracing::warn!(
                        literal = tok,
                        bits = IMM_BITS,
                        "immediate wrapped to field width"
                    )
                }
            }
        }
        Ok(imm.narrow(IMM_BITS))
    }

    /// Second source of a transfer or the third operand of an ALU op.
    fn source(&self, tok: &str) -> Result<Source, AsmError> {
        Ok(match parse_operand(tok)? {
            Operand::Imm(imm) => Source::Imm(self.imm_field(tok, imm)?),
            Operand::Reg(r) => Source::Reg(r),
        })
    }
}

enum Source {
    Reg(Register),
    Imm(u32),
}

/// Split an operand string on runs of commas and whitespace.
pub fn tokenize(operands: &str) -> Vec<&str> {
    operands
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect()
}

impl Encoder for Alu32Encoder {
    fn encode_fields(&self, mnemonic: &str, operands: &str) -> Result<Fields, AsmError> {
        let desc = lookup(mnemonic)
            .ok_or_else(|| AsmError::UnknownOpcode(mnemonic.to_ascii_uppercase()))?;
        let toks = tokenize(operands);
        if toks.len() != desc.shape.arity() {
            return Err(AsmError::OperandCountMismatch {
                mnemonic: desc.mnemonic.to_string(),
                form: desc.shape.form(desc.mnemonic),
                found: toks.len(),
            });
        }

        let zero = Register::default();
        let rd = parse_register(toks[0])?;
        let (rs1, tail) = match desc.shape {
            Shape::Unary => (parse_register(toks[1])?, Tail::Rs2(zero)),
            // Register copy goes in RS1; an immediate leaves RS1 at zero.
            Shape::Transfer => match self.source(toks[1])? {
                Source::Imm(imm) => (zero, Tail::Imm(imm)),
                Source::Reg(rs1) => (rs1, Tail::Rs2(zero)),
            },
            Shape::Alu => {
                let rs1 = parse_register(toks[1])?;
                match self.source(toks[2])? {
                    Source::Imm(imm) => (rs1, Tail::Imm(imm)),
                    Source::Reg(rs2) => (rs1, Tail::Rs2(rs2)),
                }
            }
        };

        Ok(Fields { op: desc.op, rd, rs1, tail })
    }
}
