pub mod config;
pub mod encoder;
pub mod error;
pub mod instructions;
pub mod listing;
pub mod operand;
pub mod source;

pub mod isa {
    pub mod alu32; // 5-bit opcode, 18-bit immediate variant
}

pub use config::{AsmConfig, ErrorMode, OverflowPolicy};
pub use encoder::{Encoder, Fields, Tail};
pub use error::{AsmError, AssembleError, LineError};
pub use isa::alu32::Alu32Encoder;
pub use operand::Register;
pub use source::{assemble_source, Program};
