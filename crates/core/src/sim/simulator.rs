//! Host-facing entry point (§6): owns the hart table, physical memory, and
//! the globally-shared DIC (design note 9.1).

use crate::arch::csr::{MIP_MEIP, MIP_MSIP, MIP_SSIP};
use crate::common::HostError;
use crate::cpu::Cpu;
use crate::memory::{Dic, PhysicalMemory};

/// Interrupt codes accepted by [`Simulator::interrupt_up`]/`interrupt_down`,
/// matching `Trap::code()` numbering (§4.8).
pub const IRQ_SSI: u32 = 1;
pub const IRQ_MSI: u32 = 3;
pub const IRQ_SEI: u32 = 9;
pub const IRQ_MEI: u32 = 11;

pub struct Simulator {
    harts: Vec<Cpu>,
    pm: PhysicalMemory,
    dic: Dic,
}

impl Simulator {
    pub fn new(num_harts: usize, pm: PhysicalMemory) -> Self {
        let harts = (0..num_harts).map(|i| Cpu::new(i as u32)).collect();
        Self { harts, pm, dic: Dic::new() }
    }

    pub fn pm(&self) -> &PhysicalMemory {
        &self.pm
    }
    pub fn pm_mut(&mut self) -> &mut PhysicalMemory {
        &mut self.pm
    }
    pub fn hart(&self, hartid: usize) -> Result<&Cpu, HostError> {
        self.harts.get(hartid).ok_or(HostError::NoSuchHart(hartid))
    }

    fn hart_mut(&mut self, hartid: usize) -> Result<&mut Cpu, HostError> {
        self.harts.get_mut(hartid).ok_or(HostError::NoSuchHart(hartid))
    }

    pub fn init(&mut self, hartid: usize, start_pc: u32) -> Result<(), HostError> {
        self.hart_mut(hartid)?.init(hartid as u32, start_pc);
        Ok(())
    }

    /// Host interface: `cpu_done`. Resets the hart's reservation state and
    /// clears the whole DIC (open question 9.2: scoped per-simulator).
    pub fn done(&mut self, hartid: usize) -> Result<(), HostError> {
        self.hart_mut(hartid)?.done();
        self.dic.clear_all();
        Ok(())
    }

    pub fn set_pc(&mut self, hartid: usize, value: u32) -> Result<(), HostError> {
        self.hart_mut(hartid)?.set_pc(value)
    }

    /// Host interface: `cpu_step`. Steps one hart and broadcasts any store
    /// it performed to every hart's LR/SC reservation, including its own
    /// (§4.7: `sc_access` is called by *any* store through PM, and S4 covers
    /// a hart's own intervening store as well as another hart's).
    pub fn step(&mut self, hartid: usize) -> Result<(), HostError> {
        if hartid >= self.harts.len() {
            return Err(HostError::NoSuchHart(hartid));
        }
        let effects = self.harts[hartid].tick(&mut self.pm, &mut self.dic)?;
        if let Some(addr) = effects.store_addr {
            for hart in self.harts.iter_mut() {
                hart.sc_access(addr);
            }
        }
        Ok(())
    }

    /// Host interface: `sc_access`. Exposed directly for devices or a future
    /// multi-hart bus model that performs stores outside `step()`.
    pub fn sc_access(&mut self, hartid: usize, phys: u64) -> Result<(), HostError> {
        self.hart_mut(hartid)?.sc_access(phys);
        Ok(())
    }

    /// Host interface: `interrupt_up` (§4.8).
    pub fn interrupt_up(&mut self, hartid: usize, code: u32) -> Result<(), HostError> {
        let hart = self.hart_mut(hartid)?;
        match code {
            IRQ_SEI => hart.csr.external_seip = true,
            IRQ_MSI => hart.csr.mip |= MIP_MSIP,
            IRQ_SSI => hart.csr.mip |= MIP_SSIP,
            IRQ_MEI => hart.csr.mip |= MIP_MEIP,
            _ => hart.csr.mip |= MIP_MEIP,
        }
        Ok(())
    }

    /// Host interface: `interrupt_down` (§4.8), symmetric clear.
    pub fn interrupt_down(&mut self, hartid: usize, code: u32) -> Result<(), HostError> {
        let hart = self.hart_mut(hartid)?;
        match code {
            IRQ_SEI => hart.csr.external_seip = false,
            IRQ_MSI => hart.csr.mip &= !MIP_MSIP,
            IRQ_SSI => hart.csr.mip &= !MIP_SSIP,
            IRQ_MEI => hart.csr.mip &= !MIP_MEIP,
            _ => hart.csr.mip &= !MIP_MEIP,
        }
        Ok(())
    }

    pub fn num_harts(&self) -> usize {
        self.harts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Exercises the `sc_access` primitive directly (bypassing `step()`),
    /// confirming it clears a matching reservation.
    #[test]
    fn sc_access_invalidates_a_matching_reservation() {
        let mut pm = PhysicalMemory::new();
        pm.add_ram("RAM", 0, 0x1000);
        let mut sim = Simulator::new(1, pm);
        sim.init(0, 0).unwrap();

        {
            let hart = &mut sim.harts[0];
            hart.lr_w(&mut sim.pm, 0x40, true).unwrap();
        }
        sim.pm_mut().write32(0x40, 0xAAAA_AAAA, true);
        sim.harts[0].sc_access(0x40);

        let (ok, _) = sim.harts[0].sc_w(&mut sim.pm, 0x40, 1, true).unwrap();
        assert!(!ok);
    }

    /// S4 end-to-end through `Simulator::step()`: a hart's own intervening
    /// `SW` to the reserved address must invalidate its own reservation via
    /// the broadcast in `step()`, not just another hart's (§4.7).
    #[test]
    fn s4_own_store_through_step_invalidates_own_reservation() {
        let mut pm = PhysicalMemory::new();
        pm.add_ram("RAM", 0, 0x1000);
        // lr.w x1, (x2); sw x3, 0(x2); sc.w x4, x3, (x2)
        pm.load_binary_at(&0x1001_20AFu32.to_le_bytes(), 0);
        pm.load_binary_at(&0x0031_2023u32.to_le_bytes(), 4);
        pm.load_binary_at(&0x1831_222Fu32.to_le_bytes(), 8);
        let mut sim = Simulator::new(1, pm);
        sim.init(0, 0).unwrap();
        sim.hart_mut(0).unwrap().regs.write(2, 0x40);
        sim.hart_mut(0).unwrap().regs.write(3, 0x1234);

        sim.step(0).unwrap(); // lr.w
        sim.step(0).unwrap(); // sw (own store to the reserved address)
        sim.step(0).unwrap(); // sc.w

        assert_eq!(sim.hart(0).unwrap().regs.read(4), 1); // 1 == failure
    }

    #[test]
    fn interrupt_up_sei_sets_external_flag_not_mip() {
        let mut pm = PhysicalMemory::new();
        pm.add_ram("RAM", 0, 0x1000);
        let mut sim = Simulator::new(1, pm);
        sim.interrupt_up(0, IRQ_SEI).unwrap();
        assert!(sim.hart(0).unwrap().csr.external_seip);
        assert_eq!(sim.hart(0).unwrap().csr.mip & MIP_MEIP, 0);
    }

    #[test]
    fn no_such_hart_is_a_host_error() {
        let mut pm = PhysicalMemory::new();
        pm.add_ram("RAM", 0, 0x1000);
        let mut sim = Simulator::new(1, pm);
        assert!(matches!(sim.step(5), Err(HostError::NoSuchHart(5))));
    }
}
