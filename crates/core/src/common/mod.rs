//! Shared primitives: addresses, constants, access types, errors, registers.

pub mod addr;
pub mod constants;
pub mod data;
pub mod error;
pub mod reg;

pub use addr::{PhysAddr, VirtAddr};
pub use data::AccessType;
pub use error::{HostError, Trap, TranslationResult};
pub use reg::Gpr;
