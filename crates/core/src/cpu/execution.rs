//! The per-tick step engine (§4.6): fetch → decode → execute → account →
//! raise timer interrupts → deliver a trap → advance `pc`.

use super::{Cpu, StepEffects};
use crate::arch::csr::{MCOUNTINHIBIT_CY_BIT, MCOUNTINHIBIT_IR_BIT, MIP_MTIP, MIP_STIP};
use crate::common::{AccessType, HostError, Trap, VirtAddr};
use crate::memory::{Dic, PhysicalMemory};

impl Cpu {
    /// Runs one tick and returns the cross-hart effects the simulator must
    /// apply (e.g. invalidating other harts' LR/SC reservations).
    pub fn tick(&mut self, pm: &mut PhysicalMemory, dic: &mut Dic) -> Result<StepEffects, HostError> {
        let mut store_addr = None;
        let mut exception: Option<(Trap, u32)> = None;

        if !self.stdby {
            let tr = self.translate(pm, VirtAddr::new(self.pc), AccessType::Fetch, true);
            match tr.trap {
                Some(t) => exception = Some((t, self.pc)),
                None => {
                    let decoded = dic.fetch(pm, tr.paddr);
                    match self.execute(pm, decoded, true) {
                        Ok(addr) => store_addr = addr,
                        Err(Trap::IllegalInstruction) => exception = Some((Trap::IllegalInstruction, decoded.raw)),
                        // Memory-access faults already stashed the faulting
                        // virtual address into `tval_next` (cpu::memory).
                        Err(t) => exception = Some((t, self.csr.tval_next)),
                    }
                }
            }
        }

        self.account(exception.is_none());

        if let Some((trap, tval)) = exception {
            self.enter_trap(trap, tval)?;
        } else if let Some(irq) = self.select_interrupt() {
            self.enter_trap(irq, 0)?;
        }

        if !self.stdby {
            self.pc = self.pc_next;
            self.pc_next = self.pc.wrapping_add(4);
        }
        self.regs.write(0, 0);
        self.csr.tval_next = 0;

        self.note_standby_tick(self.select_interrupt().is_some());

        Ok(StepEffects { store_addr })
    }

    /// Counter accounting and timer-interrupt recomputation, run every tick
    /// regardless of whether the instruction faulted.
    fn account(&mut self, no_exception: bool) {
        let now = std::time::Instant::now();
        let delta = now.duration_since(self.csr.last_tick_time);
        self.csr.last_tick_time = now;
        self.csr.mtime = self.csr.mtime.wrapping_add(delta.as_micros() as u64);

        if self.csr.mcountinhibit & MCOUNTINHIBIT_CY_BIT == 0 {
            self.csr.cycle = self.csr.cycle.wrapping_add(1);
        }
        if no_exception && !self.stdby && self.csr.mcountinhibit & MCOUNTINHIBIT_IR_BIT == 0 {
            self.csr.instret = self.csr.instret.wrapping_add(1);
        }

        for i in 0..crate::common::constants::NUM_HPM_COUNTERS {
            if self.csr.mcountinhibit & (1 << (i + 3)) != 0 {
                continue;
            }
            let event = crate::arch::csr::HpmEvent::from_u32(self.csr.hpmevents[i]);
            let gate = match event {
                crate::arch::csr::HpmEvent::UserCycles => self.priv_mode == crate::arch::PrivilegeMode::User,
                crate::arch::csr::HpmEvent::SupervisorCycles => {
                    self.priv_mode == crate::arch::PrivilegeMode::Supervisor
                }
                crate::arch::csr::HpmEvent::MachineCycles => self.priv_mode == crate::arch::PrivilegeMode::Machine,
                crate::arch::csr::HpmEvent::StandbyCycles => self.stdby,
            };
            if gate {
                self.csr.hpmcounters[i] = self.csr.hpmcounters[i].wrapping_add(1);
            }
        }

        if self.csr.mtime >= self.csr.mtimecmp {
            self.csr.mip |= MIP_MTIP;
        } else {
            self.csr.mip &= !MIP_MTIP;
        }
        if (self.csr.cycle as u32) >= self.csr.scyclecmp {
            self.csr.mip |= MIP_STIP;
        } else {
            self.csr.mip &= !MIP_STIP;
        }
    }
}
