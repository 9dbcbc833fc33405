//! Instruction encodings and the decoder: RV32I base, RV32M, RV32A, and the
//! privileged SYSTEM instructions.

pub mod decode;
pub mod instruction;
pub mod privileged;
pub mod rv32a;
pub mod rv32i;
pub mod rv32m;

pub use decode::decode;
pub use instruction::{Decoded, InstructionBits, Op};
