//! Architectural constants shared across the core.

/// Size in bytes of one physical RAM frame / virtual page (Sv32).
pub const PAGE_SIZE: u64 = 4096;
/// log2(PAGE_SIZE).
pub const PAGE_SHIFT: u32 = 12;
/// Size in bytes of a Sv32 megapage (4 MiB).
pub const MEGAPAGE_SIZE: u64 = 4 * 1024 * 1024;
/// Number of Sv32 page-table entries per table (1024 entries * 4 bytes = 4 KiB).
pub const PTES_PER_TABLE: u32 = 1024;
/// Size in bytes of one Sv32 PTE.
pub const PTESIZE: u64 = 4;
/// Mask for a 10-bit VPN field.
pub const VPN_MASK: u32 = 0x3FF;

/// Bit position of the opcode field.
pub const OPCODE_MASK: u32 = 0x7F;
/// Bit position of the rd field.
pub const RD_SHIFT: u32 = 7;
/// Bit position of the rs1 field.
pub const RS1_SHIFT: u32 = 15;

/// Number of instructions decoded per 4 KiB frame.
pub const INSTRUCTIONS_PER_FRAME: usize = (PAGE_SIZE / 4) as usize;

/// Bit set in a 32-bit cause value to mark it as an interrupt rather than an exception.
pub const CAUSE_INTERRUPT_BIT: u32 = 1 << 31;

/// Encoding of the WFI instruction (XLEN-independent).
pub const WFI_INSTRUCTION: u32 = 0x1050_0073;

/// mip/mie/mideleg bit positions for the six standard interrupt sources.
pub const MIP_SSIP_BIT: u32 = 1;
pub const MIP_MSIP_BIT: u32 = 3;
pub const MIP_STIP_BIT: u32 = 5;
pub const MIP_MTIP_BIT: u32 = 7;
pub const MIP_SEIP_BIT: u32 = 9;
pub const MIP_MEIP_BIT: u32 = 11;

/// Number of hardware performance-monitor counters beyond cycle/instret.
pub const NUM_HPM_COUNTERS: usize = 29;

/// Number of consecutive standby ticks with no pending interrupt before the
/// step engine logs a stall warning (diagnostic only, not a fault).
pub const HANG_DETECTION_THRESHOLD: u64 = 1 << 30;
