//! Sv32 two-level page-table walker (§4.3).

use crate::arch::csr::{MSTATUS_MXR, MSTATUS_SUM, SATP_PPN_MASK};
use crate::arch::PrivilegeMode;
use crate::common::{AccessType, PhysAddr, Trap, TranslationResult, VirtAddr};
use crate::memory::PhysicalMemory;

const PTE_V: u32 = 1 << 0;
const PTE_R: u32 = 1 << 1;
const PTE_W: u32 = 1 << 2;
const PTE_X: u32 = 1 << 3;
const PTE_U: u32 = 1 << 4;
const PTE_A: u32 = 1 << 6;
const PTE_D: u32 = 1 << 7;
const PTE_PPN_SHIFT: u32 = 10;
const PTE_PPN0_MASK: u32 = 0x3FF; // low 10 bits of the PPN field (level-0 part)

/// A Sv32 page-table entry, explicit shift/mask over a plain `u32` rather
/// than a bit-field union (design note 9: "re-implement bit-field PTE as
/// explicit shift/mask helpers").
#[derive(Clone, Copy, Debug)]
pub struct PageTableEntry(pub u32);

impl PageTableEntry {
    pub fn is_valid(self) -> bool {
        self.0 & PTE_V != 0
    }
    pub fn can_read(self) -> bool {
        self.0 & PTE_R != 0
    }
    pub fn can_write(self) -> bool {
        self.0 & PTE_W != 0
    }
    pub fn can_exec(self) -> bool {
        self.0 & PTE_X != 0
    }
    pub fn is_user(self) -> bool {
        self.0 & PTE_U != 0
    }
    pub fn is_leaf(self) -> bool {
        self.can_read() || self.can_write() || self.can_exec()
    }
    pub fn is_accessed(self) -> bool {
        self.0 & PTE_A != 0
    }
    pub fn is_dirty(self) -> bool {
        self.0 & PTE_D != 0
    }
    /// Full 22-bit PPN (PPN[1]:PPN[0]).
    pub fn ppn(self) -> u32 {
        self.0 >> PTE_PPN_SHIFT
    }
    /// PPN[0] (the level-0, 10-bit part); must be zero for a valid megapage.
    pub fn ppn0(self) -> u32 {
        self.ppn() & PTE_PPN0_MASK
    }
    /// PPN[1] (the level-1, 12-bit part).
    pub fn ppn1(self) -> u32 {
        self.ppn() >> 10
    }

    pub fn with_accessed(self) -> Self {
        Self(self.0 | PTE_A)
    }
    pub fn with_dirty(self) -> Self {
        Self(self.0 | PTE_A | PTE_D)
    }
}

fn page_fault(access: AccessType) -> Trap {
    let trap = Trap::for_access(access, false);
    tracing::debug!(?access, ?trap, "Sv32 page fault");
    trap
}

fn check_permissions(
    pte: PageTableEntry,
    access: AccessType,
    priv_mode: PrivilegeMode,
    mstatus: u32,
) -> bool {
    let basic = match access {
        AccessType::Write => pte.can_write(),
        AccessType::Fetch => pte.can_exec(),
        AccessType::Read => pte.can_read() || (mstatus & MSTATUS_MXR != 0 && pte.can_exec()),
    };
    if !basic {
        return false;
    }
    match priv_mode {
        PrivilegeMode::User => pte.is_user(),
        PrivilegeMode::Supervisor => {
            if pte.is_user() {
                if access == AccessType::Fetch {
                    return false;
                }
                mstatus & MSTATUS_SUM != 0
            } else {
                true
            }
        }
        PrivilegeMode::Machine => true,
    }
}

/// Walks the Sv32 page table for `virt`, returning the translated physical
/// address or the appropriate page-fault trap.
///
/// `priv_mode` is the *effective* privilege for this access (already
/// resolved from `mstatus.MPRV`/`MPP` by the caller). `noisy` gates the
/// accessed/dirty-bit write-back, matching PM's convention that debugger
/// walks and re-validation probes must not mutate state.
pub fn page_table_walk(
    pm: &mut PhysicalMemory,
    virt: VirtAddr,
    access: AccessType,
    satp: u32,
    priv_mode: PrivilegeMode,
    mstatus: u32,
    noisy: bool,
) -> TranslationResult {
    let va = virt.val();
    let vpn1 = (va >> 22) & 0x3FF;
    let vpn0 = (va >> 12) & 0x3FF;
    let page_offset = va & 0xFFF;

    let root = (satp & SATP_PPN_MASK) << 12;
    let pte_addr1 = root as u64 + (vpn1 as u64) * 4;
    let pte1 = PageTableEntry(pm.read32(pte_addr1, noisy));

    if !pte1.is_valid() || (pte1.can_write() && !pte1.can_read()) {
        return TranslationResult::fault(page_fault(access));
    }

    if pte1.is_leaf() {
        // Megapage: PPN[0] must be zero.
        if pte1.ppn0() != 0 {
            return TranslationResult::fault(page_fault(access));
        }
        if !check_permissions(pte1, access, priv_mode, mstatus) {
            return TranslationResult::fault(page_fault(access));
        }
        let updated = if access == AccessType::Write { pte1.with_dirty() } else { pte1.with_accessed() };
        if noisy && updated.0 != pte1.0 {
            // Open question (§9): if this write-back itself faults (e.g. the
            // table was made read-only by another hart), the walk proceeds
            // silently rather than re-faulting. Preserved from the source.
            pm.write32(pte_addr1, updated.0, noisy);
        }
        let phys = ((pte1.ppn1() as u64) << 22) | ((vpn0 as u64) << 12) | (page_offset as u64);
        return TranslationResult::success(phys);
    }

    // Descend to level 0.
    let table_base = (pte1.ppn() as u64) << 12;
    let pte_addr0 = table_base + (vpn0 as u64) * 4;
    let pte0 = PageTableEntry(pm.read32(pte_addr0, noisy));

    if !pte0.is_valid() || (pte0.can_write() && !pte0.can_read()) || !pte0.is_leaf() {
        return TranslationResult::fault(page_fault(access));
    }
    if !check_permissions(pte0, access, priv_mode, mstatus) {
        return TranslationResult::fault(page_fault(access));
    }
    let updated = if access == AccessType::Write { pte0.with_dirty() } else { pte0.with_accessed() };
    if noisy && updated.0 != pte0.0 {
        pm.write32(pte_addr0, updated.0, noisy);
    }
    let phys = ((pte0.ppn() as u64) << 12) | (page_offset as u64);
    TranslationResult::success(phys)
}
