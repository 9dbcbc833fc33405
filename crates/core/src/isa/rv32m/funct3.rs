//! RV32M `funct3` values (under `OP_REG`, `funct7 == FUNCT7_MULDIV`).

pub const MUL: u32 = 0b000;
pub const MULH: u32 = 0b001;
pub const MULHSU: u32 = 0b010;
pub const MULHU: u32 = 0b011;
pub const DIV: u32 = 0b100;
pub const DIVU: u32 = 0b101;
pub const REM: u32 = 0b110;
pub const REMU: u32 = 0b111;
