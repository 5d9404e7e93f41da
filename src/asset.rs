//! Asset descriptors carried by callers into ledger operations.

use crate::Address;

/// Declared identity and precision of a fungible asset.
///
/// The ledger re-checks both fields against its own record on every
/// transfer; a mismatch aborts the operation before any value moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct Asset {
    /// Ledger identity of the asset.
    pub id: Address,
    /// Number of decimals in the smallest unit.
    pub decimals: u8,
}

impl Asset {
    pub const fn new(id: Address, decimals: u8) -> Self {
        Self { id, decimals }
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Asset[{} ({} decimals)]", self.id, self.decimals)
    }
}
