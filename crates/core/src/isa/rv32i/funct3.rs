//! RV32I `funct3` values, distinguishing instructions sharing a major opcode.

pub const LB: u32 = 0b000;
pub const LH: u32 = 0b001;
pub const LW: u32 = 0b010;
pub const LBU: u32 = 0b100;
pub const LHU: u32 = 0b101;

pub const SB: u32 = 0b000;
pub const SH: u32 = 0b001;
pub const SW: u32 = 0b010;

pub const BEQ: u32 = 0b000;
pub const BNE: u32 = 0b001;
pub const BLT: u32 = 0b100;
pub const BGE: u32 = 0b101;
pub const BLTU: u32 = 0b110;
pub const BGEU: u32 = 0b111;

pub const ADDI: u32 = 0b000;
pub const SLTI: u32 = 0b010;
pub const SLTIU: u32 = 0b011;
pub const XORI: u32 = 0b100;
pub const ORI: u32 = 0b110;
pub const ANDI: u32 = 0b111;
pub const SLLI: u32 = 0b001;
pub const SRLI_SRAI: u32 = 0b101;

pub const ADD_SUB: u32 = 0b000;
pub const SLL: u32 = 0b001;
pub const SLT: u32 = 0b010;
pub const SLTU: u32 = 0b011;
pub const XOR: u32 = 0b100;
pub const SRL_SRA: u32 = 0b101;
pub const OR: u32 = 0b110;
pub const AND: u32 = 0b111;

pub const PRIV: u32 = 0b000;
pub const CSRRW: u32 = 0b001;
pub const CSRRS: u32 = 0b010;
pub const CSRRC: u32 = 0b011;
pub const CSRRWI: u32 = 0b101;
pub const CSRRSI: u32 = 0b110;
pub const CSRRCI: u32 = 0b111;

pub const FENCE: u32 = 0b000;
pub const FENCE_I: u32 = 0b001;

/// funct7 bit distinguishing SUB/SRA from ADD/SRL (bit 5 of funct7).
pub const ALT_FUNCT7: u32 = 0b010_0000;
