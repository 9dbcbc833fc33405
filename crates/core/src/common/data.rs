//! Memory access classification.

/// Type of memory access an MMU translation or PM access is performed for.
///
/// Used to select the correct permission bit (R/W/X) and the correct
/// page-fault exception code when a translation fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch. Requires execute (X) permission.
    Fetch,
    /// Data load. Requires read (R) permission.
    Read,
    /// Data store. Requires write (W) permission.
    Write,
}
