//! Property-based decode round-trips: for each instruction format, a value
//! built from random operands decodes back to exactly those operands.

use msim_core::isa::rv32i::{funct3, opcodes};
use msim_core::isa::{decode, Op};
use proptest::prelude::*;

fn r_type(opcode: u32, rd: u32, funct3: u32, rs1: u32, rs2: u32, funct7: u32) -> u32 {
    (funct7 & 0x7F) << 25 | (rs2 & 0x1F) << 20 | (rs1 & 0x1F) << 15 | (funct3 & 0x7) << 12 | (rd & 0x1F) << 7 | (opcode & 0x7F)
}

fn i_type(opcode: u32, rd: u32, funct3: u32, rs1: u32, imm: i32) -> u32 {
    let imm_bits = (imm as u32) & 0xFFF;
    imm_bits << 20 | (rs1 & 0x1F) << 15 | (funct3 & 0x7) << 12 | (rd & 0x1F) << 7 | (opcode & 0x7F)
}

fn s_type(opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
    let v = imm as u32;
    let hi = (v >> 5) & 0x7F;
    let lo = v & 0x1F;
    hi << 25 | (rs2 & 0x1F) << 20 | (rs1 & 0x1F) << 15 | (funct3 & 0x7) << 12 | lo << 7 | (opcode & 0x7F)
}

fn b_type(opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
    let v = imm as u32;
    let bit12 = (v >> 12) & 1;
    let bits10_5 = (v >> 5) & 0x3F;
    let bits4_1 = (v >> 1) & 0xF;
    let bit11 = (v >> 11) & 1;
    bit12 << 31 | bits10_5 << 25 | (rs2 & 0x1F) << 20 | (rs1 & 0x1F) << 15 | (funct3 & 0x7) << 12 | bits4_1 << 8 | bit11 << 7 | (opcode & 0x7F)
}

fn u_type(opcode: u32, rd: u32, imm20: u32) -> u32 {
    (imm20 & 0xF_FFFF) << 12 | (rd & 0x1F) << 7 | (opcode & 0x7F)
}

fn j_type(opcode: u32, rd: u32, imm: i32) -> u32 {
    let v = imm as u32;
    let bit20 = (v >> 20) & 1;
    let bits10_1 = (v >> 1) & 0x3FF;
    let bit11 = (v >> 11) & 1;
    let bits19_12 = (v >> 12) & 0xFF;
    bit20 << 31 | bits10_1 << 21 | bit11 << 20 | bits19_12 << 12 | (rd & 0x1F) << 7 | (opcode & 0x7F)
}

proptest! {
    #[test]
    fn add_round_trips(rd in 0u32..32, rs1 in 0u32..32, rs2 in 0u32..32) {
        let word = r_type(opcodes::OP_REG, rd, funct3::ADD_SUB, rs1, rs2, 0);
        let d = decode(word);
        prop_assert_eq!(d.op, Op::Add);
        prop_assert_eq!(d.rd, rd as usize);
        prop_assert_eq!(d.rs1, rs1 as usize);
        prop_assert_eq!(d.rs2, rs2 as usize);
    }

    #[test]
    fn addi_round_trips_signed_immediate(rd in 0u32..32, rs1 in 0u32..32, imm in -2048i32..2048) {
        let word = i_type(opcodes::OP_IMM, rd, funct3::ADDI, rs1, imm);
        let d = decode(word);
        prop_assert_eq!(d.op, Op::Addi);
        prop_assert_eq!(d.rd, rd as usize);
        prop_assert_eq!(d.rs1, rs1 as usize);
        prop_assert_eq!(d.imm, imm);
    }

    #[test]
    fn lw_round_trips(rd in 0u32..32, rs1 in 0u32..32, imm in -2048i32..2048) {
        let word = i_type(opcodes::OP_LOAD, rd, funct3::LW, rs1, imm);
        let d = decode(word);
        prop_assert_eq!(d.op, Op::Lw);
        prop_assert_eq!(d.rd, rd as usize);
        prop_assert_eq!(d.rs1, rs1 as usize);
        prop_assert_eq!(d.imm, imm);
    }

    #[test]
    fn sw_round_trips(rs1 in 0u32..32, rs2 in 0u32..32, imm in -2048i32..2048) {
        let word = s_type(opcodes::OP_STORE, funct3::SW, rs1, rs2, imm);
        let d = decode(word);
        prop_assert_eq!(d.op, Op::Sw);
        prop_assert_eq!(d.rs1, rs1 as usize);
        prop_assert_eq!(d.rs2, rs2 as usize);
        prop_assert_eq!(d.imm, imm);
    }

    #[test]
    fn beq_round_trips_even_offset(rs1 in 0u32..32, rs2 in 0u32..32, half in -2048i32..2048) {
        let imm = half * 2; // branch offsets are always even
        let word = b_type(opcodes::OP_BRANCH, funct3::BEQ, rs1, rs2, imm);
        let d = decode(word);
        prop_assert_eq!(d.op, Op::Beq);
        prop_assert_eq!(d.rs1, rs1 as usize);
        prop_assert_eq!(d.rs2, rs2 as usize);
        prop_assert_eq!(d.imm, imm);
    }

    #[test]
    fn lui_round_trips(rd in 0u32..32, imm20 in 0u32..(1 << 20)) {
        let word = u_type(opcodes::OP_LUI, rd, imm20);
        let d = decode(word);
        prop_assert_eq!(d.op, Op::Lui);
        prop_assert_eq!(d.rd, rd as usize);
        prop_assert_eq!(d.imm as u32, imm20 << 12);
    }

    #[test]
    fn jal_round_trips_even_offset(rd in 0u32..32, half in -(1 << 19)..(1 << 19)) {
        let imm = half * 2; // JAL offsets are always even
        let word = j_type(opcodes::OP_JAL, rd, imm);
        let d = decode(word);
        prop_assert_eq!(d.op, Op::Jal);
        prop_assert_eq!(d.rd, rd as usize);
        prop_assert_eq!(d.imm, imm);
    }
}
