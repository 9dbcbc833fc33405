//! RV32A atomic extension encodings (LR/SC and AMOs, word width only).

pub mod funct5;
pub mod opcodes;
