//! Decoded-instruction cache: a frame-granular cache of pre-decoded
//! instructions, keyed by frame-aligned physical address (§4.2).

use crate::common::constants::{INSTRUCTIONS_PER_FRAME, PAGE_SIZE};
use crate::isa::{decode, Decoded};
use crate::memory::pm::PhysicalMemory;

struct DicEntry {
    frame_address: u64,
    decoded: Vec<Decoded>,
}

/// Global across all harts, owned by the simulator (design note 9.1): a
/// single CPU's `fetch` calls mutate the same cache every other hart reads
/// from, which is sound only under the single-threaded cooperative
/// scheduling model (§5).
#[derive(Default)]
pub struct Dic {
    entries: Vec<DicEntry>,
}

impl Dic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the decoded instruction at `phys`, consulting or populating
    /// the cache as needed. `pm` is needed both to read frame bytes (RAM
    /// path) and to read the one-shot word (non-RAM path).
    pub fn fetch(&mut self, pm: &mut PhysicalMemory, phys: u64) -> Decoded {
        let frame_address = phys & !(PAGE_SIZE - 1);
        let slot = ((phys & (PAGE_SIZE - 1)) / 4) as usize;

        let frame_valid = pm.find_frame(phys).map(|f| f.valid);
        let Some(valid) = frame_valid else {
            // Outside RAM (device/ROM): bypass the cache entirely, decode once.
            let word = pm.read32(phys, true);
            return decode(word);
        };

        if let Some(pos) = self.entries.iter().position(|e| e.frame_address == frame_address) {
            if !valid {
                self.redecode(pm, pos, frame_address);
            }
            return self.entries[pos].decoded[slot];
        }

        // Miss: allocate a fresh entry for this RAM frame.
        let decoded = decode_frame(pm.ram_frame_bytes(phys));
        pm.mark_frame_valid(phys);
        self.entries.push(DicEntry { frame_address, decoded });
        self.entries.last().unwrap().decoded[slot]
    }

    fn redecode(&mut self, pm: &mut PhysicalMemory, pos: usize, frame_address: u64) {
        tracing::trace!(frame_address, "DIC frame rebuilt");
        self.entries[pos].decoded = decode_frame(pm.ram_frame_bytes(frame_address));
        pm.mark_frame_valid(frame_address);
    }

    /// Frees every entry. Called when any hart finishes (open question 9.2:
    /// the cache is scoped per-simulator, not per-hart, matching the source).
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

fn decode_frame(bytes: Option<&[u8]>) -> Vec<Decoded> {
    let bytes = bytes.unwrap_or(&[]);
    (0..INSTRUCTIONS_PER_FRAME)
        .map(|i| {
            let off = i * 4;
            let word = if off + 4 <= bytes.len() {
                u32::from_le_bytes(bytes[off..off + 4].try_into().unwrap())
            } else {
                0
            };
            decode(word)
        })
        .collect()
}
