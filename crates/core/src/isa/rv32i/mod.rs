//! RV32I base integer instruction encodings.

pub mod funct3;
pub mod opcodes;
