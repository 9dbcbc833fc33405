//! Physical memory, frame table, and decoded-instruction cache.

pub mod dic;
pub mod frame;
pub mod pm;

pub use dic::Dic;
pub use frame::{Frame, FrameTable};
pub use pm::PhysicalMemory;
