//! Exception/interrupt delegation, M-trap and S-trap entry, `mret`/`sret`,
//! and interrupt prioritization (§4.5).

use super::Cpu;
use crate::arch::csr::*;
use crate::arch::trap::irq_to_trap;
use crate::arch::PrivilegeMode;
use crate::common::{HostError, Trap};

impl Cpu {
    /// Whether `trap` should be delegated to S-mode, given the current
    /// privilege and the relevant delegation register.
    fn delegated(&self, trap: Trap) -> bool {
        if self.priv_mode == PrivilegeMode::Machine {
            return false;
        }
        let bit = 1u32 << trap.code();
        if trap.is_interrupt() {
            self.csr.mideleg & bit != 0
        } else {
            self.csr.medeleg & bit != 0
        }
    }

    /// Delivers `trap` (an exception just raised, or an interrupt chosen by
    /// [`Cpu::select_interrupt`]). `is_interrupt` controls whether `mepc`
    /// takes `pc` or `pc_next` per §4.5.
    pub fn enter_trap(&mut self, trap: Trap, tval: u32) -> Result<(), HostError> {
        let delegated = self.delegated(trap);
        tracing::debug!(
            hart = self.csr.mhartid,
            ?trap,
            delegated,
            pc = self.pc,
            tval,
            "trap delivered"
        );
        if delegated {
            self.enter_strap(trap, tval)
        } else {
            self.enter_mtrap(trap, tval)
        }
    }

    fn enter_mtrap(&mut self, trap: Trap, tval: u32) -> Result<(), HostError> {
        let epc = if trap.is_interrupt() { self.pc_next } else { self.pc };
        self.csr.mepc = epc;
        self.csr.mcause = trap.cause();
        self.csr.mtval = tval;

        let mie = self.csr.mstatus & MSTATUS_MIE != 0;
        self.csr.mstatus = (self.csr.mstatus & !MSTATUS_MPIE) | (if mie { MSTATUS_MPIE } else { 0 });
        self.csr.mstatus &= !MSTATUS_MIE;
        self.csr.mstatus = (self.csr.mstatus & !MSTATUS_MPP_MASK) | (self.priv_mode.to_u8() as u32) << MSTATUS_MPP_SHIFT;

        self.priv_mode = PrivilegeMode::Machine;
        self.stdby = false;

        self.pc = trap_target(self.csr.mtvec, trap)?;
        self.pc_next = self.pc.wrapping_add(4);
        Ok(())
    }

    fn enter_strap(&mut self, trap: Trap, tval: u32) -> Result<(), HostError> {
        let epc = if trap.is_interrupt() { self.pc_next } else { self.pc };
        let prior_priv = self.priv_mode;
        self.csr.sepc = epc;
        self.csr.scause = trap.cause();
        self.csr.stval = tval;

        let sie = self.csr.mstatus & MSTATUS_SIE != 0;
        self.csr.mstatus = (self.csr.mstatus & !MSTATUS_SPIE) | (if sie { MSTATUS_SPIE } else { 0 });
        self.csr.mstatus &= !MSTATUS_SIE;
        self.csr.mstatus = (self.csr.mstatus & !MSTATUS_SPP)
            | (if prior_priv == PrivilegeMode::User { 0 } else { MSTATUS_SPP });

        self.priv_mode = PrivilegeMode::Supervisor;
        self.stdby = false;

        self.pc = trap_target(self.csr.stvec, trap)?;
        self.pc_next = self.pc.wrapping_add(4);
        Ok(())
    }

    /// `MRET`: restores `mstatus.MIE` from `MPIE`, `priv_mode` from `MPP`,
    /// and resets `MPIE`/`MPP` to their idle values.
    pub fn mret(&mut self) {
        let mpie = self.csr.mstatus & MSTATUS_MPIE != 0;
        let mpp = PrivilegeMode::from_u8(((self.csr.mstatus & MSTATUS_MPP_MASK) >> MSTATUS_MPP_SHIFT) as u8);

        self.csr.mstatus = (self.csr.mstatus & !MSTATUS_MIE) | (if mpie { MSTATUS_MIE } else { 0 });
        self.csr.mstatus |= MSTATUS_MPIE;
        self.csr.mstatus &= !MSTATUS_MPP_MASK; // MPP <- U
        if mpp != PrivilegeMode::Machine {
            self.csr.mstatus &= !MSTATUS_MPRV;
        }

        self.priv_mode = mpp;
        self.pc = self.csr.mepc;
        self.pc_next = self.pc.wrapping_add(4);
    }

    /// `SRET`: symmetric using `SPIE`/`SPP`.
    pub fn sret(&mut self) {
        let spie = self.csr.mstatus & MSTATUS_SPIE != 0;
        let spp = if self.csr.mstatus & MSTATUS_SPP != 0 { PrivilegeMode::Supervisor } else { PrivilegeMode::User };

        self.csr.mstatus = (self.csr.mstatus & !MSTATUS_SIE) | (if spie { MSTATUS_SIE } else { 0 });
        self.csr.mstatus |= MSTATUS_SPIE;
        self.csr.mstatus &= !MSTATUS_SPP;
        if spp != PrivilegeMode::Machine {
            self.csr.mstatus &= !MSTATUS_MPRV;
        }

        self.priv_mode = spp;
        self.pc = self.csr.sepc;
        self.pc_next = self.pc.wrapping_add(4);
    }

    /// Chooses the highest-priority pending interrupt to deliver this step,
    /// if any, per §4.5's two-tier prioritization.
    pub fn select_interrupt(&self) -> Option<Trap> {
        let mip = self.csr.effective_mip();
        let active_m = mip & self.csr.mie & !self.csr.mideleg;
        let can_m = (self.priv_mode == PrivilegeMode::Machine && self.csr.mstatus & MSTATUS_MIE != 0)
            || self.priv_mode < PrivilegeMode::Machine;
        if can_m {
            for bit in [MIP_MEIP, MIP_MSIP, MIP_MTIP, MIP_SEIP, MIP_SSIP, MIP_STIP] {
                if active_m & bit != 0 {
                    return irq_to_trap(bit);
                }
            }
        }

        let active_s = mip & self.csr.mie & S_INTERRUPT_MASK;
        let can_s = (self.priv_mode == PrivilegeMode::Supervisor && self.csr.mstatus & MSTATUS_SIE != 0)
            || self.priv_mode < PrivilegeMode::Supervisor;
        if can_s {
            for bit in [MIP_SEIP, MIP_SSIP, MIP_STIP] {
                if active_s & bit != 0 {
                    return irq_to_trap(bit);
                }
            }
        }
        None
    }
}

/// Computes the trap target PC from an `{m,s}tvec` value: direct mode
/// ignores the cause, vectored mode offsets by `4*cause_code` for
/// interrupts only. Any other mode is fatal (§3: "other modes are illegal
/// at entry and must be treated as fatal").
fn trap_target(tvec: u32, trap: Trap) -> Result<u32, HostError> {
    let base = tvec & TVEC_BASE_MASK;
    match tvec & TVEC_MODE_MASK {
        TVEC_MODE_DIRECT => Ok(base),
        TVEC_MODE_VECTORED => {
            if trap.is_interrupt() {
                Ok(base.wrapping_add(4 * trap.code()))
            } else {
                Ok(base)
            }
        }
        other => Err(HostError::InvalidConfig(format!("illegal tvec mode {other}"))),
    }
}
