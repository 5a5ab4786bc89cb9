/// Failure kinds raised while encoding a single instruction.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("Unknown opcode '{0}'")]
    UnknownOpcode(String),
    #[error("Invalid register '{0}'")]
    InvalidRegister(String),
    #[error("Invalid immediate '{0}'")]
    InvalidImmediate(String),
    #[error("{mnemonic} expects: {form} (got {found} operand(s))")]
    OperandCountMismatch {
        mnemonic: String,
        form: String,
        found: usize,
    },
    #[error("Immediate '{literal}' does not fit in {bits} bits")]
    ImmediateOverflow { literal: String, bits: u32 },
}

/// An [`AsmError`] pinned to the source line that produced it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{line}: error assembling '{text}': {source}")]
pub struct LineError {
    /// 1-based line number in the input text.
    pub line: usize,
    /// The raw line, comments included.
    pub text: String,
    #[source]
    pub source: AsmError,
}

/// Result of a failed whole-text assembly. Holds one error in fail-fast mode,
/// every failing line in collect mode.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{} line(s) failed to assemble", .errors.len())]
pub struct AssembleError {
    pub errors: Vec<LineError>,
}

impl AssembleError {
    pub fn first(&self) -> Option<&LineError> {
        self.errors.first()
    }
}
