//! Authorization capabilities consumed by the ledger adapter.
//!
//! A transfer or close is authorized either by the human identity that
//! owns the debited account, or by re-deriving a custody authority from
//! its seed tuple. The derived form is producible only by code holding
//! the exact seeds; no signature is ever involved.

use crate::derive::offer_address;
use crate::{Address, Result};

/// Seed tuple that re-derives an offer's custody authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedAuthorization {
    pub maker: Address,
    pub id: u64,
    /// The one-byte authority proof found at offer creation.
    pub bump: u8,
}

impl DerivedAuthorization {
    /// Re-derives the authority address from the seed tuple.
    pub fn address(&self) -> Result<Address> {
        offer_address(&self.maker, self.id, self.bump)
    }
}

/// Who vouches for a ledger mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorizer {
    /// The owning identity consents to the debit.
    User(Address),
    /// A custody authority acts through its derivation seeds.
    Derived(DerivedAuthorization),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::find_offer_address;

    #[test]
    fn derived_authorization_matches_resolver() {
        let maker = Address::new([5; 32]);
        let (addr, bump) = find_offer_address(&maker, 9).unwrap();
        let auth = DerivedAuthorization { maker, id: 9, bump };
        assert_eq!(auth.address().unwrap(), addr);
    }

    #[test]
    fn wrong_seed_tuple_derives_elsewhere() {
        let maker = Address::new([5; 32]);
        let (addr, bump) = find_offer_address(&maker, 9).unwrap();
        let auth = DerivedAuthorization {
            maker,
            id: 10,
            bump,
        };
        match auth.address() {
            Ok(other) => assert_ne!(other, addr),
            // the mismatched tuple may land on a signable digest
            Err(_) => {}
        }
    }
}
