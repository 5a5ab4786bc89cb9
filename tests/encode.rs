use pretty_assertions::assert_eq;

use cpu32_asm::encoder::{Encoder, RESERVED_MASK};
use cpu32_asm::instructions::{Opcode, TABLE};
use cpu32_asm::{Alu32Encoder, AsmError, Fields, Register, Tail};

// Reference packer, written straight from the field table.
fn word(op: u32, i: u32, rd: u32, rs1: u32, low: u32) -> u32 {
    (op << 27) | (i << 26) | (rd << 22) | (rs1 << 18) | low
}

fn enc(mn: &str, ops: &str) -> u32 {
    Alu32Encoder::new().encode(mn, ops).unwrap()
}

#[test]
fn add_register_form() {
    assert_eq!(enc("ADD", "R1, R2, R3"), 0x0048_C000);
    assert_eq!(enc("ADD", "R1, R2, R3"), word(0, 0, 1, 2, 3 << 14));
}

#[test]
fn mov_immediate() {
    assert_eq!(enc("MOV", "R0, #10"), 0x4C00_000A);
    assert_eq!(enc("MOV", "R0, #10"), word(0b01001, 1, 0, 0, 10));
}

#[test]
fn not_unary() {
    let w = enc("NOT", "R5, R6");
    assert_eq!(w >> 27, 0b01000);
    assert_eq!(w, word(0b01000, 0, 5, 6, 0));
}

#[test]
fn cmp_negative_immediate() {
    let w = enc("CMP", "R1, R2, #-1");
    assert_eq!(w & 0x3FFFF, 0x3FFFF);
    assert_eq!(w, word(0b00101, 1, 1, 2, 0x3FFFF));
}

#[test]
fn unknown_and_short_operands() {
    let e = Alu32Encoder::new();
    assert_eq!(e.encode("FOO", "R1, R2"), Err(AsmError::UnknownOpcode("FOO".into())));
    let err = e.encode("ADD", "R1, R2").unwrap_err();
    assert_eq!(
        err,
        AsmError::OperandCountMismatch {
            mnemonic: "ADD".into(),
            form: "ADD RD, RS1, RS2_or_#IMM".into(),
            found: 2,
        }
    );
    assert!(err.to_string().contains("ADD expects: ADD RD, RS1, RS2_or_#IMM"));
}

#[test]
fn operand_count_names_each_shape() {
    let e = Alu32Encoder::new();
    let msg = |mn: &str, ops: &str| e.encode(mn, ops).unwrap_err().to_string();
    assert!(msg("not", "R1").contains("NOT expects: NOT RD, RS1"));
    assert!(msg("ld", "R1, R2, R3").contains("LD expects: LD RD, #IMM"));
    assert!(msg("ret", "").contains("RET expects: RET RD, RS1, RS2_or_#IMM"));
}

#[test]
fn every_opcode_lands_in_top_bits() {
    let e = Alu32Encoder::new();
    for d in TABLE {
        let ops = match d.op.shape().arity() {
            2 => "R1, R2",
            _ => "R1, R2, R3",
        };
        let w = e.encode(d.mnemonic, ops).unwrap();
        assert_eq!(w >> 27, u32::from(d.op.code()), "{}", d.mnemonic);
        assert_eq!(w & RESERVED_MASK, 0, "{}", d.mnemonic);
    }
}

#[test]
fn literal_bases_and_prefixes() {
    assert_eq!(enc("SUB", "R4, R5, 0b101"), word(1, 1, 4, 5, 5));
    assert_eq!(enc("AND", "R4, R5, #0b101"), word(6, 1, 4, 5, 5));
    assert_eq!(enc("OR", "R4, R5, 0xff"), word(7, 1, 4, 5, 0xFF));
    assert_eq!(enc("SLL", "R4, R5, #0XFF"), word(10, 1, 4, 5, 0xFF));
    assert_eq!(enc("LSR", "R4, R5, 7"), word(11, 1, 4, 5, 7));
    // Without '#', an uppercase hex prefix reads as a register name.
    assert_eq!(
        Alu32Encoder::new().encode("ASR", "R4, R5, 0XFF"),
        Err(AsmError::InvalidRegister("0XFF".into()))
    );
}

#[test]
fn aliases_and_bare_register_numbers() {
    assert_eq!(enc("RET", "RA, ra, R0"), 0xA3FC_0000);
    assert_eq!(enc("ADD", "sp, 3, R1"), word(0, 0, 14, 3, 1 << 14));
    assert_eq!(enc("MOV", "r2, Sp"), word(9, 0, 2, 14, 0));
}

#[test]
fn immediates_wrap_by_default() {
    assert_eq!(enc("ADD", "R1, R2, #131072") & 0x3FFFF, 0x20000);
    assert_eq!(enc("ADD", "R1, R2, #262144") & 0x3FFFF, 0);
    assert_eq!(enc("MOV", "R1, #-262145") & 0x3FFFF, 0x3FFFF);
    // Literals wider than 64 bits keep their low bits too.
    assert_eq!(enc("ADD", "R1, R2, #0x10000000000000005"), word(0, 1, 1, 2, 5));
    // Wrapping never touches the register fields.
    assert_eq!(enc("ADD", "R1, R2, #0x7FFFFFFF") >> 18, word(0, 1, 1, 2, 0) >> 18);
}

#[test]
fn fields_view_matches_packed_word() {
    let f = Alu32Encoder::new().encode_fields("ld", "R3, 0x10").unwrap();
    assert_eq!(
        f,
        Fields {
            op: Opcode::Ld,
            rd: Register::new(3).unwrap(),
            rs1: Register::new(0).unwrap(),
            tail: Tail::Imm(0x10),
        }
    );
    assert_eq!(f.pack(), 0x74C0_0010);
}
