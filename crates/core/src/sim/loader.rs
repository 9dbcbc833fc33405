//! Flat raw-binary image loader (§6's CLI driver realization).

use crate::common::HostError;
use crate::memory::PhysicalMemory;
use std::path::Path;

/// Reads `path` and copies its bytes into `pm`'s RAM starting at `load_addr`.
/// No header, no relocation — a flat image is just bytes at an address, the
/// simplest loader a bring-up kernel or firmware blob needs.
pub fn load_flat_binary(pm: &mut PhysicalMemory, path: &Path, load_addr: u64) -> Result<usize, HostError> {
    let data = std::fs::read(path)?;
    let len = data.len();
    pm.load_binary_at(&data, load_addr);
    Ok(len)
}
