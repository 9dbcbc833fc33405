//! Memory-management unit: dispatches bare-mode identity translation vs. the
//! Sv32 walk, resolving effective privilege from `mstatus.MPRV` (§4.3).

pub mod ptw;

use crate::arch::csr::{MSTATUS_MPP_SHIFT, MSTATUS_MPRV, SATP_MODE_BARE, SATP_MODE_SHIFT};
use crate::arch::PrivilegeMode;
use crate::common::{AccessType, TranslationResult, VirtAddr};
use crate::memory::PhysicalMemory;

/// Computes the effective privilege mode for a memory access per §4.3: if
/// `MPRV` is set and this is not a fetch, use `MPP`; otherwise the current
/// privilege mode.
pub fn effective_privilege(priv_mode: PrivilegeMode, mstatus: u32, access: AccessType) -> PrivilegeMode {
    if mstatus & MSTATUS_MPRV != 0 && access != AccessType::Fetch {
        PrivilegeMode::from_u8(((mstatus >> MSTATUS_MPP_SHIFT) & 0b11) as u8)
    } else {
        priv_mode
    }
}

/// Translates `virt` to a physical address. Bypasses the walk in bare mode
/// or when the effective privilege is Machine.
pub fn translate(
    pm: &mut PhysicalMemory,
    virt: VirtAddr,
    access: AccessType,
    priv_mode: PrivilegeMode,
    satp: u32,
    mstatus: u32,
    noisy: bool,
) -> TranslationResult {
    let eff_priv = effective_privilege(priv_mode, mstatus, access);
    let mode = satp >> SATP_MODE_SHIFT;
    let translation_active = mode != SATP_MODE_BARE && eff_priv <= PrivilegeMode::Supervisor;

    if !translation_active {
        return TranslationResult::success(virt.val() as u64);
    }

    ptw::page_table_walk(pm, virt, access, satp, eff_priv, mstatus, noisy)
}
