//! Privileged (SYSTEM-opcode) instruction encodings.

pub mod opcodes;
