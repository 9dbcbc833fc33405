//! Table-driven scenario tests against a full `Cpu::tick()`, one per
//! documented invariant.

use msim_core::arch::csr::*;
use msim_core::arch::PrivilegeMode;
use msim_core::memory::{Dic, PhysicalMemory};
use msim_core::Cpu;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn harness() -> (Cpu, PhysicalMemory, Dic) {
    let mut pm = PhysicalMemory::new();
    pm.add_ram("RAM", 0, 0x0010_0000);
    (Cpu::new(0), pm, Dic::new())
}

#[rstest]
fn s1_add() {
    let (mut cpu, mut pm, mut dic) = harness();
    pm.load_binary_at(&0x0031_00B3u32.to_le_bytes(), 0x1000); // add x1,x2,x3
    cpu.regs.write(2, 7);
    cpu.regs.write(3, 5);
    cpu.set_pc(0x1000).unwrap();

    cpu.tick(&mut pm, &mut dic).unwrap();

    assert_eq!(cpu.regs.read(1), 12);
    assert_eq!(cpu.pc, 0x1004);
}

#[rstest]
fn s2_illegal_instruction_traps_to_machine() {
    let (mut cpu, mut pm, mut dic) = harness();
    // RAM at 0x2000 is already zero-initialized: word 0x0 decodes as Illegal.
    cpu.set_pc(0x2000).unwrap();
    cpu.csr.mtvec = 0x100; // direct mode

    cpu.tick(&mut pm, &mut dic).unwrap();

    assert_eq!(cpu.csr.mcause, 2);
    assert_eq!(cpu.csr.mepc, 0x2000);
    assert_eq!(cpu.csr.mtval, 0);
    assert_eq!(cpu.pc, 0x100);
    assert_eq!(cpu.priv_mode, PrivilegeMode::Machine);
    assert_eq!((cpu.csr.mstatus & MSTATUS_MPP_MASK) >> MSTATUS_MPP_SHIFT, PrivilegeMode::Machine.to_u8() as u32);
}

#[rstest]
fn s3_ecall_from_u_delegates_to_s() {
    let (mut cpu, mut pm, mut dic) = harness();
    // ecall = 0x00000073
    pm.load_binary_at(&0x0000_0073u32.to_le_bytes(), 0x400);
    cpu.set_pc(0x400).unwrap();
    cpu.priv_mode = PrivilegeMode::User;
    cpu.csr.mtvec = 0x400;
    cpu.csr.medeleg = 1 << 8;
    cpu.csr.stvec = 0x800;

    cpu.tick(&mut pm, &mut dic).unwrap();

    assert_eq!(cpu.priv_mode, PrivilegeMode::Supervisor);
    assert_eq!(cpu.csr.sepc, 0x400);
    assert_eq!(cpu.csr.scause, 8);
    assert_eq!(cpu.pc, 0x800);
    assert_ne!(cpu.csr.mstatus & MSTATUS_SPP, 0);
}

#[rstest]
fn s4_lr_sc_invalidated_by_intervening_store() {
    let (mut cpu, mut pm, _dic) = harness();
    cpu.lr_w(&mut pm, 0x40, true).unwrap();
    pm.write32(0x40, 0xAAAA_AAAA, true); // an intervening SW
    cpu.sc_access(0x40); // simulator broadcasts the store

    let (ok, _) = cpu.sc_w(&mut pm, 0x40, 1, true).unwrap();
    assert!(!ok);

    // Without the intervening store, SC.w succeeds and writes through.
    let (mut cpu2, mut pm2, _dic2) = harness();
    cpu2.lr_w(&mut pm2, 0x40, true).unwrap();
    let (ok2, addr) = cpu2.sc_w(&mut pm2, 0x40, 0xDEAD_BEEF, true).unwrap();
    assert!(ok2);
    assert_eq!(addr, Some(0x40));
    assert_eq!(pm2.read32(0x40, true), 0xDEAD_BEEF);
}

#[rstest]
fn s5_sv32_permission_fault_carries_virt_in_stval() {
    let (mut cpu, mut pm, mut dic) = harness();
    // Load at 0x3000: lw x1, 0(x0) — reads virtual address 0.
    pm.load_binary_at(&0x0000_2083u32.to_le_bytes(), 0x3000);
    cpu.set_pc(0x3000).unwrap();
    cpu.priv_mode = PrivilegeMode::Supervisor;
    cpu.csr.stvec = 0x900;
    cpu.csr.mstatus &= !MSTATUS_SUM; // SUM=0

    // Sv32 root at frame 4 (phys 0x4000): single leaf PTE at vpn1=0, vpn0=0,
    // u=1, r=1, mapping virtual page 0 -> physical frame 5.
    let root = 0x4000u64;
    let leaf_table = 0x5000u64;
    pm.write32(root, ((leaf_table >> 12) as u32) << 10 | 0b0000_0001, true); // V only, pointer
    pm.write32(leaf_table, (5u32 << 10) | 0b0001_0011, true); // V|R|U, ppn=5
    cpu.csr.satp = (1 << 31) | (root >> 12) as u32; // Sv32, root ppn

    cpu.tick(&mut pm, &mut dic).unwrap();

    assert_eq!(cpu.csr.scause, 13); // load_page_fault
    assert_eq!(cpu.csr.stval, 0); // faulting virt address
    assert_eq!(cpu.pc, 0x900);
}

#[rstest]
fn s6_mtip_interrupt_taken_when_pending_and_enabled() {
    let (mut cpu, mut pm, mut dic) = harness();
    pm.load_binary_at(&0x0000_0013u32.to_le_bytes(), 0); // NOP so fetch doesn't itself fault
    cpu.csr.mtime = 100;
    cpu.csr.mtimecmp = 50;
    cpu.csr.mie = MIP_MTIP;
    cpu.csr.mstatus = MSTATUS_MIE;
    cpu.priv_mode = PrivilegeMode::Machine;
    cpu.csr.mtvec = 0x100;
    let pc_next_before = cpu.pc_next;

    cpu.tick(&mut pm, &mut dic).unwrap();

    assert_eq!(cpu.csr.mcause, (1 << 31) | 7);
    assert_eq!(cpu.csr.mepc, pc_next_before);
}
