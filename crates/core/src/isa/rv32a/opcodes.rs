//! RV32A atomic-extension opcode/funct3 (major opcode is `OP_AMO`).

/// The only valid funct3 for RV32A (word-width AMOs).
pub const WIDTH_W: u32 = 0b010;
