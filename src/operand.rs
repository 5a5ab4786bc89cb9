use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AsmError;

/// Number of addressable general purpose registers.
pub const REG_COUNT: u8 = 16;

const ALIASES: &[(&str, u8)] = &[("SP", 14), ("RA", 15)];

/// A register index in `0..=15`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Register(u8);

impl Register {
    pub const SP: Register = Register(14);
    pub const RA: Register = Register(15);

    pub fn new(index: u8) -> Option<Self> {
        (index < REG_COUNT).then_some(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

impl TryFrom<u8> for Register {
    type Error = AsmError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Register::new(index).ok_or_else(|| AsmError::InvalidRegister(index.to_string()))
    }
}

impl From<Register> for u8 {
    fn from(r: Register) -> u8 {
        r.0
    }
}

impl FromStr for Register {
    type Err = AsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_register(s)
    }
}

/// How a token is read in a source-operand position. Decided once per token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Register,
    Immediate,
}

/// A parsed literal. `raw` holds the value modulo 2^64, which keeps every
/// low bit exact however long the literal; `exact` is the value itself when
/// it fits in an `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Immediate {
    raw: u64,
    exact: Option<i64>,
}

impl Immediate {
    pub fn value(self) -> Option<i64> {
        self.exact
    }

    /// Two's-complement narrowing of the literal to `bits`.
    pub fn narrow(self, bits: u32) -> u32 {
        narrow(self.raw as i64, bits)
    }

    /// See [`fits_field`]. Literals beyond `i64` never fit.
    pub fn fits(self, bits: u32) -> bool {
        self.exact.is_some_and(|v| fits_field(v, bits))
    }
}

impl From<i64> for Immediate {
    fn from(v: i64) -> Self {
        Self { raw: v as u64, exact: Some(v) }
    }
}

/// A resolved source operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Reg(Register),
    Imm(Immediate),
}

/// Resolve `SP`, `RA`, `Rn` or a bare `n` (case-insensitive) to a register.
pub fn parse_register(tok: &str) -> Result<Register, AsmError> {
    let bad = || AsmError::InvalidRegister(tok.to_string());
    let upper = tok.to_ascii_uppercase();
    if let Some(&(_, idx)) = ALIASES.iter().find(|(name, _)| *name == upper) {
        return Ok(Register(idx));
    }
    let digits = upper.strip_prefix('R').unwrap_or(&upper);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }
    // Long numerals overflow u32 and are just as invalid as 16.
    let idx = digits.parse::<u32>().map_err(|_| bad())?;
    u8::try_from(idx).ok().and_then(Register::new).ok_or_else(bad)
}

/// Parse a literal with an optional leading `#`: `0x`/`0X` hex, `0b`/`0B`
/// binary, or signed decimal. Any length is accepted.
pub fn parse_immediate(tok: &str) -> Result<Immediate, AsmError> {
    let body = tok.strip_prefix('#').unwrap_or(tok);
    let value = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        parse_digits(hex, 16, false)
    } else if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        parse_digits(bin, 2, false)
    } else if let Some(neg) = body.strip_prefix('-') {
        parse_digits(neg, 10, true)
    } else {
        parse_digits(body.strip_prefix('+').unwrap_or(body), 10, false)
    };
    value.ok_or_else(|| AsmError::InvalidImmediate(tok.to_string()))
}

// Digits only, no sign: "0x-5" is not a literal.
fn parse_digits(digits: &str, radix: u32, negative: bool) -> Option<Immediate> {
    if digits.is_empty() {
        return None;
    }
    let mut raw = 0u64;
    let mut exact = Some(0i64);
    for c in digits.chars() {
        let d = c.to_digit(radix)?;
        raw = raw.wrapping_mul(u64::from(radix)).wrapping_add(u64::from(d));
        // Accumulate negatives downwards so i64::MIN stays exact.
        exact = exact.and_then(|v| {
            let v = v.checked_mul(i64::from(radix))?;
            if negative {
                v.checked_sub(i64::from(d))
            } else {
                v.checked_add(i64::from(d))
            }
        });
    }
    if negative {
        raw = raw.wrapping_neg();
    }
    Some(Immediate { raw, exact })
}

/// Lexical classification of a source operand: `#...`, `-?[0-9]+`,
/// `0x[0-9a-fA-F]+` and `0b[01]+` are immediates, everything else names a
/// register.
pub fn classify(tok: &str) -> TokenKind {
    let is_decimal = {
        let d = tok.strip_prefix('-').unwrap_or(tok);
        !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit())
    };
    let is_prefixed = |prefix: &str, radix: u32| {
        tok.strip_prefix(prefix)
            .is_some_and(|d| !d.is_empty() && d.chars().all(|c| c.is_digit(radix)))
    };
    if tok.starts_with('#') || is_decimal || is_prefixed("0x", 16) || is_prefixed("0b", 2) {
        TokenKind::Immediate
    } else {
        TokenKind::Register
    }
}

/// Classify then resolve a source operand.
pub fn parse_operand(tok: &str) -> Result<Operand, AsmError> {
    let kind = classify(tok);
    tracing::trace!(token = tok, ?kind, "classified operand");
    match kind {
        TokenKind::Immediate => parse_immediate(tok).map(Operand::Imm),
        TokenKind::Register => parse_register(tok).map(Operand::Reg),
    }
}

/// Two's-complement narrowing: the low `bits` bits of `value`. Out-of-range
/// values are truncated, not rejected.
pub fn narrow(value: i64, bits: u32) -> u32 {
    debug_assert!((1..=32).contains(&bits));
    ((value as u64) & ((1u64 << bits) - 1)) as u32
}

/// True when `value` survives [`narrow`] to `bits` as either a signed or an
/// unsigned pattern, i.e. lies in `[-2^(bits-1), 2^bits - 1]`.
/// A zero-width field holds only 0; widths past 64 hold any `i64`.
pub fn fits_field(value: i64, bits: u32) -> bool {
    if bits == 0 {
        return value == 0;
    }
    let bits = bits.min(64);
    let min = -(1i128 << (bits - 1));
    let max = (1i128 << bits) - 1;
    (min..=max).contains(&i128::from(value))
}
