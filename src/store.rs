//! Exclusive storage for open offer records.
//!
//! Records are immutable between creation and consumption; there is no
//! update primitive. Exclusivity on the derived address serializes
//! concurrent creates, and consume's read-and-delete makes racing takes
//! mutually exclusive.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::{Address, Offer, Result, SwapError};

/// Offer records keyed by their derived address, held in their
/// serialized layout.
#[derive(Debug, Clone, Default)]
pub struct OfferStore {
    records: HashMap<Address, Vec<u8>>,
}

impl OfferStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists a record at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::DuplicateOffer`] if a record already lives
    /// there.
    pub fn create(&mut self, address: Address, offer: &Offer) -> Result<()> {
        let bytes = offer.to_bytes()?;
        match self.records.entry(address) {
            Entry::Occupied(_) => Err(SwapError::DuplicateOffer),
            Entry::Vacant(slot) => {
                slot.insert(bytes);
                Ok(())
            }
        }
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.records.contains_key(address)
    }

    /// Decodes the record at `address` without consuming it.
    pub fn get(&self, address: &Address) -> Result<Offer> {
        let bytes = self.records.get(address).ok_or(SwapError::OfferNotFound)?;
        Offer::from_bytes(bytes)
    }

    /// Atomically reads and deletes the record at `address`.
    pub fn consume(&mut self, address: &Address) -> Result<Offer> {
        let bytes = self
            .records
            .remove(address)
            .ok_or(SwapError::OfferNotFound)?;
        Offer::from_bytes(&bytes)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::assert_err;

    fn sample(id: u64) -> Offer {
        Offer {
            id,
            maker: Address::new([1; 32]),
            asset_a: Address::new([2; 32]),
            asset_b: Address::new([3; 32]),
            amount_b_wanted: 5,
            authority_proof: 255,
        }
    }

    #[test]
    fn create_is_exclusive() {
        let addr = Address::new([9; 32]);
        let mut store = OfferStore::new();
        store.create(addr, &sample(1)).unwrap();
        assert_err(store.create(addr, &sample(2)), SwapError::DuplicateOffer);
        // first record untouched
        assert_eq!(store.get(&addr).unwrap().id, 1);
    }

    #[test]
    fn consume_is_once() {
        let addr = Address::new([9; 32]);
        let mut store = OfferStore::new();
        store.create(addr, &sample(1)).unwrap();
        assert_eq!(store.consume(&addr).unwrap().id, 1);
        assert_err(store.consume(&addr), SwapError::OfferNotFound);
        assert!(store.is_empty());
    }

    #[test]
    fn get_missing_record() {
        let store = OfferStore::new();
        assert_err(store.get(&Address::new([9; 32])), SwapError::OfferNotFound);
    }
}
