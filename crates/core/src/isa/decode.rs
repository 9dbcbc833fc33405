//! Decodes a raw 32-bit RISC-V word into a [`Decoded`] instruction.

use crate::isa::instruction::{Decoded, InstructionBits, Op};
use crate::isa::privileged::opcodes as sys;
use crate::isa::rv32a::{funct5 as a_f5, opcodes as a_op};
use crate::isa::rv32i::{funct3 as i_f3, opcodes as i_op};
use crate::isa::rv32m::{funct3 as m_f3, opcodes as m_op};

const INSTRUCTION_WIDTH: u32 = 32;

pub fn decode(inst: u32) -> Decoded {
    let opcode = inst.opcode();
    let rd = inst.rd();
    let rs1 = inst.rs1();
    let rs2 = inst.rs2();
    let funct3 = inst.funct3();
    let funct7 = inst.funct7();

    let (op, imm, csr) = match opcode {
        i_op::OP_LUI => (Op::Lui, decode_u(inst), 0),
        i_op::OP_AUIPC => (Op::Auipc, decode_u(inst), 0),
        i_op::OP_JAL => (Op::Jal, decode_j(inst), 0),
        i_op::OP_JALR => (Op::Jalr, decode_i(inst), 0),

        i_op::OP_BRANCH => {
            let op = match funct3 {
                i_f3::BEQ => Op::Beq,
                i_f3::BNE => Op::Bne,
                i_f3::BLT => Op::Blt,
                i_f3::BGE => Op::Bge,
                i_f3::BLTU => Op::Bltu,
                i_f3::BGEU => Op::Bgeu,
                _ => Op::Illegal,
            };
            (op, decode_b(inst), 0)
        }

        i_op::OP_LOAD => {
            let op = match funct3 {
                i_f3::LB => Op::Lb,
                i_f3::LH => Op::Lh,
                i_f3::LW => Op::Lw,
                i_f3::LBU => Op::Lbu,
                i_f3::LHU => Op::Lhu,
                _ => Op::Illegal,
            };
            (op, decode_i(inst), 0)
        }

        i_op::OP_STORE => {
            let op = match funct3 {
                i_f3::SB => Op::Sb,
                i_f3::SH => Op::Sh,
                i_f3::SW => Op::Sw,
                _ => Op::Illegal,
            };
            (op, decode_s(inst), 0)
        }

        i_op::OP_IMM => {
            let op = match funct3 {
                i_f3::ADDI => Op::Addi,
                i_f3::SLTI => Op::Slti,
                i_f3::SLTIU => Op::Sltiu,
                i_f3::XORI => Op::Xori,
                i_f3::ORI => Op::Ori,
                i_f3::ANDI => Op::Andi,
                i_f3::SLLI => Op::Slli,
                i_f3::SRLI_SRAI => {
                    if funct7 & i_f3::ALT_FUNCT7 != 0 {
                        Op::Srai
                    } else {
                        Op::Srli
                    }
                }
                _ => Op::Illegal,
            };
            // Shift amount lives in rs2's bit position for SLLI/SRLI/SRAI;
            // for the rest this is the sign-extended 12-bit I-immediate.
            let imm = match funct3 {
                i_f3::SLLI | i_f3::SRLI_SRAI => rs2 as i32,
                _ => decode_i(inst),
            };
            (op, imm, 0)
        }

        i_op::OP_REG => {
            if funct7 == m_op::FUNCT7_MULDIV {
                let op = match funct3 {
                    m_f3::MUL => Op::Mul,
                    m_f3::MULH => Op::Mulh,
                    m_f3::MULHSU => Op::Mulhsu,
                    m_f3::MULHU => Op::Mulhu,
                    m_f3::DIV => Op::Div,
                    m_f3::DIVU => Op::Divu,
                    m_f3::REM => Op::Rem,
                    m_f3::REMU => Op::Remu,
                    _ => Op::Illegal,
                };
                (op, 0, 0)
            } else {
                let op = match funct3 {
                    i_f3::ADD_SUB => {
                        if funct7 & i_f3::ALT_FUNCT7 != 0 {
                            Op::Sub
                        } else {
                            Op::Add
                        }
                    }
                    i_f3::SLL => Op::Sll,
                    i_f3::SLT => Op::Slt,
                    i_f3::SLTU => Op::Sltu,
                    i_f3::XOR => Op::Xor,
                    i_f3::SRL_SRA => {
                        if funct7 & i_f3::ALT_FUNCT7 != 0 {
                            Op::Sra
                        } else {
                            Op::Srl
                        }
                    }
                    i_f3::OR => Op::Or,
                    i_f3::AND => Op::And,
                    _ => Op::Illegal,
                };
                (op, 0, 0)
            }
        }

        i_op::OP_MISC_MEM => {
            let op = match funct3 {
                i_f3::FENCE => Op::Fence,
                i_f3::FENCE_I => Op::FenceI,
                _ => Op::Illegal,
            };
            (op, 0, 0)
        }

        i_op::OP_AMO if funct3 == a_op::WIDTH_W => {
            let op = match inst.funct5() {
                a_f5::LR => Op::LrW,
                a_f5::SC => Op::ScW,
                a_f5::AMOSWAP => Op::AmoswapW,
                a_f5::AMOADD => Op::AmoaddW,
                a_f5::AMOXOR => Op::AmoxorW,
                a_f5::AMOAND => Op::AmoandW,
                a_f5::AMOOR => Op::AmoorW,
                a_f5::AMOMIN => Op::AmominW,
                a_f5::AMOMAX => Op::AmomaxW,
                a_f5::AMOMINU => Op::AmominuW,
                a_f5::AMOMAXU => Op::AmomaxuW,
                _ => Op::Illegal,
            };
            (op, 0, 0)
        }

        i_op::OP_SYSTEM => decode_system(inst, funct3, rs1, rd),

        _ => (Op::Illegal, 0, 0),
    };

    Decoded { raw: inst, op, rd, rs1, rs2, imm, csr }
}

fn decode_system(inst: u32, funct3: u32, rs1: usize, rd: usize) -> (Op, i32, u32) {
    use crate::isa::rv32i::funct3 as f3;
    if funct3 == f3::PRIV {
        let funct12 = inst.csr();
        let op = match funct12 {
            sys::FUNCT12_ECALL => Op::Ecall,
            sys::FUNCT12_EBREAK => Op::Ebreak,
            sys::FUNCT12_SRET => Op::Sret,
            sys::FUNCT12_MRET => Op::Mret,
            sys::FUNCT12_WFI => Op::Wfi,
            _ => Op::Illegal, // SFENCE.VMA and friends: no MMU caching to flush here.
        };
        (op, 0, 0)
    } else {
        let op = match funct3 {
            f3::CSRRW => Op::Csrrw,
            f3::CSRRS => Op::Csrrs,
            f3::CSRRC => Op::Csrrc,
            f3::CSRRWI => Op::Csrrwi,
            f3::CSRRSI => Op::Csrrsi,
            f3::CSRRCI => Op::Csrrci,
            _ => Op::Illegal,
        };
        let csr = inst.csr();
        // Immediate-form CSR ops carry a zero-extended 5-bit value in rs1's
        // bit position rather than a register index.
        let imm = rs1 as i32;
        let _ = rd;
        (op, imm, csr)
    }
}

fn decode_i(inst: u32) -> i32 {
    (inst as i32) >> 20
}

fn decode_s(inst: u32) -> i32 {
    let low = (inst >> 7) & 0x1F;
    let high = (inst >> 25) & 0x7F;
    sign_extend((high << 5) | low, 12)
}

fn decode_b(inst: u32) -> i32 {
    let bit11 = (inst >> 7) & 1;
    let bits4_1 = (inst >> 8) & 0xF;
    let bits10_5 = (inst >> 25) & 0x3F;
    let bit12 = (inst >> 31) & 1;
    let combined = (bit12 << 12) | (bit11 << 11) | (bits10_5 << 5) | (bits4_1 << 1);
    sign_extend(combined, 13)
}

fn decode_u(inst: u32) -> i32 {
    (inst & 0xFFFF_F000) as i32
}

fn decode_j(inst: u32) -> i32 {
    let bits19_12 = (inst >> 12) & 0xFF;
    let bit11 = (inst >> 20) & 1;
    let bits10_1 = (inst >> 21) & 0x3FF;
    let bit20 = (inst >> 31) & 1;
    let combined = (bit20 << 20) | (bits19_12 << 12) | (bit11 << 11) | (bits10_1 << 1);
    sign_extend(combined, 21)
}

fn sign_extend(val: u32, bits: u32) -> i32 {
    let shift = INSTRUCTION_WIDTH - bits;
    ((val as i32) << shift) >> shift
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_add() {
        // add x1, x2, x3
        let d = decode(0x0031_00B3);
        assert_eq!(d.op, Op::Add);
        assert_eq!(d.rd, 1);
        assert_eq!(d.rs1, 2);
        assert_eq!(d.rs2, 3);
    }

    #[test]
    fn decodes_addi_negative_immediate() {
        // addi x1, x0, -1
        let d = decode(0xFFF0_0093);
        assert_eq!(d.op, Op::Addi);
        assert_eq!(d.imm, -1);
    }

    #[test]
    fn decodes_illegal_zero_word() {
        let d = decode(0);
        assert_eq!(d.op, Op::Illegal);
    }

    #[test]
    fn decodes_lr_w_and_sc_w() {
        // lr.w x1, (x2)   funct5=00010 aq=0 rl=0 rs2=0 rs1=2 funct3=010 rd=1 opcode=0101111
        let lr = 0b00010_00_00000_00010_010_00001_0101111u32;
        let d = decode(lr);
        assert_eq!(d.op, Op::LrW);
        // sc.w x3, x1, (x2)
        let sc = 0b00011_00_00001_00010_010_00011_0101111u32;
        let d = decode(sc);
        assert_eq!(d.op, Op::ScW);
        assert_eq!(d.rs1, 2);
        assert_eq!(d.rs2, 1);
        assert_eq!(d.rd, 3);
    }

    #[test]
    fn decodes_mret_sret_wfi() {
        assert_eq!(decode(crate::isa::privileged::opcodes::MRET).op, Op::Mret);
        assert_eq!(decode(crate::isa::privileged::opcodes::SRET).op, Op::Sret);
        assert_eq!(decode(crate::isa::privileged::opcodes::WFI).op, Op::Wfi);
        assert_eq!(decode(crate::isa::privileged::opcodes::ECALL).op, Op::Ecall);
    }
}
