//! Architectural traps and host-fatal errors.
//!
//! `Trap` models §7's "architectural exceptions": synchronous exceptions and
//! interrupts, both of which are consumed within a single `step()` and never
//! escape to the host. `HostError` models the other kind: fatal conditions
//! the host must abort on.

use thiserror::Error;

/// A tagged union of synchronous exception codes and interrupt codes.
///
/// The interrupt bit is *not* baked into these discriminants; callers use
/// [`Trap::cause`] to get the final `mcause`/`scause`-shaped value with the
/// high bit set for interrupts, per design note 9 ("tagged union for
/// exception code").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Trap {
    #[error("instruction address misaligned")]
    InstructionAddressMisaligned,
    #[error("instruction access fault")]
    InstructionAccessFault,
    #[error("illegal instruction")]
    IllegalInstruction,
    #[error("breakpoint")]
    Breakpoint,
    #[error("load address misaligned")]
    LoadAddressMisaligned,
    #[error("load access fault")]
    LoadAccessFault,
    #[error("store/amo address misaligned")]
    StoreAmoAddressMisaligned,
    #[error("store/amo access fault")]
    StoreAmoAccessFault,
    #[error("environment call from U-mode")]
    EnvironmentCallFromU,
    #[error("environment call from S-mode")]
    EnvironmentCallFromS,
    #[error("environment call from M-mode")]
    EnvironmentCallFromM,
    #[error("instruction page fault")]
    InstructionPageFault,
    #[error("load page fault")]
    LoadPageFault,
    #[error("store/amo page fault")]
    StoreAmoPageFault,

    #[error("supervisor software interrupt")]
    SupervisorSoftware,
    #[error("machine software interrupt")]
    MachineSoftware,
    #[error("supervisor timer interrupt")]
    SupervisorTimer,
    #[error("machine timer interrupt")]
    MachineTimer,
    #[error("supervisor external interrupt")]
    SupervisorExternal,
    #[error("machine external interrupt")]
    MachineExternal,
}

impl Trap {
    /// True if this trap is an interrupt rather than a synchronous exception.
    pub fn is_interrupt(self) -> bool {
        matches!(
            self,
            Trap::SupervisorSoftware
                | Trap::MachineSoftware
                | Trap::SupervisorTimer
                | Trap::MachineTimer
                | Trap::SupervisorExternal
                | Trap::MachineExternal
        )
    }

    /// The exception/interrupt code occupying the low bits of mcause/scause
    /// (standard RISC-V numbering, shared between exceptions and interrupts).
    pub fn code(self) -> u32 {
        use Trap::*;
        match self {
            InstructionAddressMisaligned => 0,
            InstructionAccessFault => 1,
            IllegalInstruction => 2,
            Breakpoint => 3,
            LoadAddressMisaligned => 4,
            LoadAccessFault => 5,
            StoreAmoAddressMisaligned => 6,
            StoreAmoAccessFault => 7,
            EnvironmentCallFromU => 8,
            EnvironmentCallFromS => 9,
            EnvironmentCallFromM => 11,
            InstructionPageFault => 12,
            LoadPageFault => 13,
            StoreAmoPageFault => 15,
            SupervisorSoftware => 1,
            MachineSoftware => 3,
            SupervisorTimer => 5,
            MachineTimer => 7,
            SupervisorExternal => 9,
            MachineExternal => 11,
        }
    }

    /// The full `mcause`/`scause` value: code with the interrupt bit set if
    /// this is an interrupt.
    pub fn cause(self) -> u32 {
        use crate::common::constants::CAUSE_INTERRUPT_BIT;
        if self.is_interrupt() {
            self.code() | CAUSE_INTERRUPT_BIT
        } else {
            self.code()
        }
    }

    /// Exception code to use for a misaligned/fault access of the given
    /// access type, for MMU and alignment checks.
    pub fn for_access(
        access: crate::common::data::AccessType,
        misaligned: bool,
    ) -> Trap {
        use crate::common::data::AccessType::*;
        match (access, misaligned) {
            (Fetch, true) => Trap::InstructionAddressMisaligned,
            (Fetch, false) => Trap::InstructionPageFault,
            (Read, true) => Trap::LoadAddressMisaligned,
            (Read, false) => Trap::LoadPageFault,
            (Write, true) => Trap::StoreAmoAddressMisaligned,
            (Write, false) => Trap::StoreAmoPageFault,
        }
    }
}

/// Result of a PM/MMU translation attempt.
#[derive(Clone, Copy, Debug)]
pub struct TranslationResult {
    pub paddr: u64,
    pub trap: Option<Trap>,
}

impl TranslationResult {
    pub fn success(paddr: u64) -> Self {
        Self { paddr, trap: None }
    }

    pub fn fault(trap: Trap) -> Self {
        Self { paddr: 0, trap: Some(trap) }
    }

    pub fn is_fault(&self) -> bool {
        self.trap.is_some()
    }
}

/// Fatal, non-architectural errors. These abort the simulation; they are
/// never translated into a guest-visible trap (§7).
#[derive(Debug, Error)]
pub enum HostError {
    #[error("configured RAM size {ram_size:#x} is smaller than kernel offset {kernel_offset:#x}")]
    RamTooSmall { ram_size: u64, kernel_offset: u64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("set_pc requires 4-byte alignment, got {0:#x}")]
    MisalignedPc(u32),

    #[error("no such hart: {0}")]
    NoSuchHart(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
