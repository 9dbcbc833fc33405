//! Interrupt-bit to `Trap` mapping.

use crate::arch::csr::{MIP_MEIP, MIP_MSIP, MIP_MTIP, MIP_SEIP, MIP_SSIP, MIP_STIP};
use crate::common::Trap;

/// Maps a single `mip` bit to its `Trap` interrupt variant.
pub fn irq_to_trap(bit: u32) -> Option<Trap> {
    match bit {
        MIP_MEIP => Some(Trap::MachineExternal),
        MIP_MSIP => Some(Trap::MachineSoftware),
        MIP_MTIP => Some(Trap::MachineTimer),
        MIP_SEIP => Some(Trap::SupervisorExternal),
        MIP_SSIP => Some(Trap::SupervisorSoftware),
        MIP_STIP => Some(Trap::SupervisorTimer),
        _ => None,
    }
}
