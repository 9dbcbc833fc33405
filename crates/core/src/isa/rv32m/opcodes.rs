//! RV32M shares `OP_REG` with RV32I; the M extension is selected by
//! `funct7 == FUNCT7_MULDIV`.

pub const FUNCT7_MULDIV: u32 = 0b0000001;
