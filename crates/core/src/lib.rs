//! RV32IMA instruction-level simulator core.
//!
//! This crate implements the CPU + memory subsystem described in its design
//! documents:
//! 1. **Memory:** physical-memory map, frame table, and decoded-instruction
//!    cache (`memory`), plus the Sv32 MMU walk (`mmu`).
//! 2. **Architecture:** privilege modes, the CSR file, and interrupt mapping
//!    (`arch`).
//! 3. **ISA:** RV32I/M/A decoding and the tagged-opcode representation
//!    (`isa`).
//! 4. **CPU:** per-hart architectural state, trap delivery, and the step
//!    engine (`cpu`).
//! 5. **Devices:** the memory-mapped device abstraction (`devices`).
//! 6. **Simulation:** `Simulator` (owns the hart table, PM, and DIC) and the
//!    flat-binary loader (`sim`).

/// Architectural state: privilege modes, CSR file, interrupt mapping.
pub mod arch;
/// Shared primitives: addresses, constants, access types, errors, registers.
pub mod common;
/// Startup configuration, deserialized from JSON.
pub mod config;
/// Per-hart CPU state, memory access, CSR dispatch, traps, and execution.
pub mod cpu;
/// Memory-mapped device abstraction.
pub mod devices;
/// Instruction set: decode, instruction representation, RV32I/M/A, privileged.
pub mod isa;
/// Physical memory, frame table, and decoded-instruction cache.
pub mod memory;
/// Sv32 memory-management unit.
pub mod mmu;
/// Simulator, hart table, and binary loader.
pub mod sim;

/// Root configuration type; deserialize from JSON or use `Config::default()`.
pub use crate::config::Config;
/// Single-hart CPU state and step engine.
pub use crate::cpu::Cpu;
/// Top-level simulator; owns the hart table, physical memory, and DIC.
pub use crate::sim::Simulator;
