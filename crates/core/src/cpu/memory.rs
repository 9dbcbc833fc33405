//! Memory access path: MMU dispatch, alignment checks, and the
//! memory-mapped timer (§4.4, §6).

use super::Cpu;
use crate::common::{AccessType, Trap, VirtAddr};
use crate::memory::pm::{PhysicalMemory, MTIMECMP_ADDR, MTIME_ADDR};
use crate::mmu;

impl Cpu {
    pub fn translate(
        &self,
        pm: &mut PhysicalMemory,
        virt: VirtAddr,
        access: AccessType,
        noisy: bool,
    ) -> crate::common::TranslationResult {
        mmu::translate(pm, virt, access, self.priv_mode, self.csr.satp, self.csr.mstatus, noisy)
    }

    /// Translates and checks natural alignment for `width`. Page faults take
    /// priority over alignment faults per §6 (alignment is only checked
    /// once translation has already succeeded). On any fault, stashes `virt`
    /// into `csr.tval_next` for the trap this step will take.
    fn translate_checked(
        &mut self,
        pm: &mut PhysicalMemory,
        virt: u32,
        width: u32,
        access: AccessType,
        noisy: bool,
    ) -> Result<u64, Trap> {
        let tr = self.translate(pm, VirtAddr::new(virt), access, noisy);
        if let Some(t) = tr.trap {
            self.csr.tval_next = virt;
            return Err(t);
        }
        if width > 1 && virt % width != 0 {
            self.csr.tval_next = virt;
            return Err(Trap::for_access(access, true));
        }
        Ok(tr.paddr)
    }

    /// Checks whether `phys` is the memory-mapped timer at the current
    /// effective M-mode privilege, per §4.4: accesses succeed only at
    /// M-mode effective privilege AND naturally aligned; otherwise they
    /// fall through to normal translation (i.e. to ordinary PM lookup).
    fn mmio_timer_access(&self, phys: u64, width: u32) -> Option<(u64, u32)> {
        let eff_priv = mmu::effective_privilege(self.priv_mode, self.csr.mstatus, AccessType::Read);
        if eff_priv != crate::arch::PrivilegeMode::Machine {
            return None;
        }
        if phys % width as u64 != 0 {
            return None;
        }
        if phys >= MTIME_ADDR && phys < MTIME_ADDR + 8 {
            Some((phys - MTIME_ADDR, width))
        } else if phys >= MTIMECMP_ADDR && phys < MTIMECMP_ADDR + 8 {
            Some((phys - MTIMECMP_ADDR, width))
        } else {
            None
        }
    }

    pub fn read_mem8(&mut self, pm: &mut PhysicalMemory, virt: u32, noisy: bool) -> Result<u32, Trap> {
        self.read_mem(pm, virt, 1, noisy)
    }
    pub fn read_mem16(&mut self, pm: &mut PhysicalMemory, virt: u32, noisy: bool) -> Result<u32, Trap> {
        self.read_mem(pm, virt, 2, noisy)
    }
    pub fn read_mem32(&mut self, pm: &mut PhysicalMemory, virt: u32, noisy: bool) -> Result<u32, Trap> {
        self.read_mem(pm, virt, 4, noisy)
    }

    fn read_mem(&mut self, pm: &mut PhysicalMemory, virt: u32, width: u32, noisy: bool) -> Result<u32, Trap> {
        let phys = self.translate_checked(pm, virt, width, AccessType::Read, noisy)?;
        if let Some((offset, w)) = self.mmio_timer_access(phys, width) {
            let is_mtime = phys >= MTIME_ADDR && phys < MTIME_ADDR + 8;
            let reg = if is_mtime { self.csr.mtime } else { self.csr.mtimecmp };
            let shift = offset * 8;
            let val = (reg >> shift) as u32;
            return Ok(mask_width(val, w));
        }
        Ok(match width {
            1 => pm.read8(phys, noisy),
            2 => pm.read16(phys, noisy),
            _ => pm.read32(phys, noisy),
        })
    }

    /// Returns the physical address actually written, for the caller to
    /// surface as a cross-hart SC-invalidating store (§4.7); `None` if the
    /// write was dropped (e.g. a ROM region) or redirected to the timer.
    pub fn write_mem8(&mut self, pm: &mut PhysicalMemory, virt: u32, val: u32, noisy: bool) -> Result<Option<u64>, Trap> {
        self.write_mem(pm, virt, val, 1, noisy)
    }
    pub fn write_mem16(&mut self, pm: &mut PhysicalMemory, virt: u32, val: u32, noisy: bool) -> Result<Option<u64>, Trap> {
        self.write_mem(pm, virt, val, 2, noisy)
    }
    pub fn write_mem32(&mut self, pm: &mut PhysicalMemory, virt: u32, val: u32, noisy: bool) -> Result<Option<u64>, Trap> {
        self.write_mem(pm, virt, val, 4, noisy)
    }

    fn write_mem(
        &mut self,
        pm: &mut PhysicalMemory,
        virt: u32,
        val: u32,
        width: u32,
        noisy: bool,
    ) -> Result<Option<u64>, Trap> {
        let phys = self.translate_checked(pm, virt, width, AccessType::Write, noisy)?;
        if let Some((offset, w)) = self.mmio_timer_access(phys, width) {
            let is_mtime = phys >= MTIME_ADDR && phys < MTIME_ADDR + 8;
            let shift = offset * 8;
            let mask = width_mask(w) << shift;
            let reg = if is_mtime { &mut self.csr.mtime } else { &mut self.csr.mtimecmp };
            *reg = (*reg & !mask) | (((val as u64) << shift) & mask);
            return Ok(None);
        }
        let ok = match width {
            1 => pm.write8(phys, val, noisy),
            2 => pm.write16(phys, val, noisy),
            _ => pm.write32(phys, val, noisy),
        };
        Ok(if ok { Some(phys) } else { None })
    }

    /// LR.W: records a reservation on the 4-byte-aligned physical address.
    pub fn lr_w(&mut self, pm: &mut PhysicalMemory, virt: u32, noisy: bool) -> Result<u32, Trap> {
        let phys = self.translate_checked(pm, virt, 4, AccessType::Read, noisy)?;
        let val = pm.read32(phys, noisy);
        self.reserved_addr = phys & !0x3;
        self.reserved_valid = true;
        Ok(val)
    }

    /// SC.W: succeeds (returns `Ok(Some(store_phys))`) iff the reservation
    /// is valid and matches; on success the reservation is consumed. The
    /// returned address lets the simulator invalidate any other hart's
    /// matching reservation (§4.7).
    pub fn sc_w(
        &mut self,
        pm: &mut PhysicalMemory,
        virt: u32,
        val: u32,
        noisy: bool,
    ) -> Result<(bool, Option<u64>), Trap> {
        let phys = self.translate_checked(pm, virt, 4, AccessType::Write, noisy)?;
        let aligned = phys & !0x3;
        let success = self.reserved_valid && self.reserved_addr == aligned;
        self.reserved_valid = false;
        if success {
            pm.write32(phys, val, noisy);
            Ok((true, Some(phys)))
        } else {
            Ok((false, None))
        }
    }

    /// Called by the simulator for every store that passed through PM
    /// (including other harts'), invalidating a matching reservation (§4.7).
    pub fn sc_access(&mut self, phys: u64) {
        if self.reserved_valid && self.reserved_addr == (phys & !0x3) {
            self.reserved_valid = false;
        }
    }
}

fn mask_width(val: u32, width: u32) -> u32 {
    match width {
        1 => val & 0xFF,
        2 => val & 0xFFFF,
        _ => val,
    }
}

fn width_mask(width: u32) -> u64 {
    match width {
        1 => 0xFF,
        2 => 0xFFFF,
        _ => 0xFFFF_FFFF,
    }
}
