//! Make, take and cancel operations over the offer/vault pair.
//!
//! Each operation is a single indivisible unit: it runs against a clone
//! of the engine's ledger and store, which replace the live state only
//! when every step succeeds. A failing step leaves no observable
//! intermediate state, so precondition checks rather than rollback code
//! carry the failure semantics.

use crate::derive::{find_offer_address, find_vault_address, offer_address};
use crate::error::LedgerError;
use crate::{Address, Asset, Authorizer, Ledger, Offer, OfferStore, Result, SwapError};

/// Refundable deposit charged for persisting an offer record.
pub const RECORD_STORAGE_DEPOSIT: u64 = 1_572_960;

/// Inputs to offer creation.
#[derive(Debug, Clone)]
pub struct MakeOffer {
    /// Caller-chosen identifier, unique per maker.
    pub id: u64,
    pub maker: Address,
    /// Maker's asset-A source account.
    pub maker_account_a: Address,
    pub asset_a: Asset,
    pub asset_b: Asset,
    pub amount_a_offered: u64,
    pub amount_b_wanted: u64,
}

/// Inputs to taking an offer. The offer address is resolved off-band
/// by the caller from the known maker and id.
#[derive(Debug, Clone)]
pub struct TakeOffer {
    pub offer: Address,
    pub maker: Address,
    pub asset_a: Asset,
    pub asset_b: Asset,
    pub taker: Address,
    /// Taker's asset-B source account.
    pub taker_account_b: Address,
    /// Taker's asset-A destination account.
    pub taker_account_a: Address,
    /// Maker's asset-B destination account.
    pub maker_account_b: Address,
}

/// Inputs to a maker-initiated withdraw of an open offer.
#[derive(Debug, Clone)]
pub struct CancelOffer {
    pub offer: Address,
    pub maker: Address,
    /// Maker's asset-A destination account.
    pub maker_account_a: Address,
    pub asset_a: Asset,
}

/// Addresses established by a successful make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferReceipt {
    pub offer: Address,
    pub vault: Address,
    pub authority_proof: u8,
}

/// The escrow state machine over a ledger and an offer store.
#[derive(Debug, Clone, Default)]
pub struct SwapEngine<L: Ledger + Clone> {
    ledger: L,
    store: OfferStore,
}

impl<L: Ledger + Clone> SwapEngine<L> {
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            store: OfferStore::new(),
        }
    }

    /// Rebuilds an engine from previously persisted state.
    pub fn with_state(ledger: L, store: OfferStore) -> Self {
        Self { ledger, store }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Host-side access for fixtures and account administration.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn store(&self) -> &OfferStore {
        &self.store
    }

    /// Runs `op` as an atomic unit: all steps commit or none do.
    fn commit<T>(&mut self, op: impl FnOnce(&mut L, &mut OfferStore) -> Result<T>) -> Result<T> {
        let mut ledger = self.ledger.clone();
        let mut store = self.store.clone();
        let out = op(&mut ledger, &mut store)?;
        self.ledger = ledger;
        self.store = store;
        Ok(out)
    }

    /// Creates the vault, escrows the maker's asset A and persists the
    /// offer record.
    ///
    /// # Errors
    ///
    /// [`SwapError::ZeroAmount`], [`SwapError::AssetPairIdentical`],
    /// [`SwapError::DuplicateOffer`], or a ledger error; any failure
    /// leaves no partial state.
    pub fn make_offer(&mut self, op: MakeOffer) -> Result<OfferReceipt> {
        if op.amount_a_offered == 0 || op.amount_b_wanted == 0 {
            return Err(SwapError::ZeroAmount);
        }
        if op.asset_a.id == op.asset_b.id {
            return Err(SwapError::AssetPairIdentical);
        }

        let (offer_addr, bump) = find_offer_address(&op.maker, op.id)?;
        if self.store.contains(&offer_addr) {
            return Err(SwapError::DuplicateOffer);
        }
        let have = self.ledger.balance_of(&op.maker_account_a)?;
        if have < op.amount_a_offered {
            return Err(LedgerError::InsufficientBalance {
                have,
                need: op.amount_a_offered,
            }
            .into());
        }
        let (vault_addr, _) = find_vault_address(&offer_addr, &op.asset_a.id)?;

        let record = Offer {
            id: op.id,
            maker: op.maker,
            asset_a: op.asset_a.id,
            asset_b: op.asset_b.id,
            amount_b_wanted: op.amount_b_wanted,
            authority_proof: bump,
        };

        self.commit(|ledger, store| {
            ledger.open_account(vault_addr, &op.asset_a, offer_addr, &op.maker)?;
            ledger.transfer(
                &op.maker_account_a,
                &vault_addr,
                op.amount_a_offered,
                &op.asset_a,
                &Authorizer::User(op.maker),
            )?;
            ledger.debit_native(&op.maker, RECORD_STORAGE_DEPOSIT)?;
            store.create(offer_addr, &record)
        })?;

        Ok(OfferReceipt {
            offer: offer_addr,
            vault: vault_addr,
            authority_proof: bump,
        })
    }

    /// Completes the trade: asset B to the maker, the entire vault
    /// balance of asset A to the taker, custody torn down with the
    /// vault deposit refunded to the taker and the record deposit to
    /// the maker.
    ///
    /// # Errors
    ///
    /// [`SwapError::OfferNotFound`], [`SwapError::OfferMismatch`],
    /// [`SwapError::InvalidAuthorityProof`],
    /// [`SwapError::AccountOwnerMismatch`], or a ledger error; every
    /// precondition is checked before any transfer.
    pub fn take_offer(&mut self, op: TakeOffer) -> Result<()> {
        let record = self.store.get(&op.offer)?;
        if record.maker != op.maker
            || record.asset_a != op.asset_a.id
            || record.asset_b != op.asset_b.id
        {
            return Err(SwapError::OfferMismatch);
        }
        self.verify_authority(&record, &op.offer)?;

        // the payment must land with the stored maker and the swept
        // asset with the taker; a transfer only checks its source
        if self.ledger.owner_of(&op.maker_account_b)? != record.maker {
            return Err(SwapError::AccountOwnerMismatch);
        }
        if self.ledger.owner_of(&op.taker_account_a)? != op.taker {
            return Err(SwapError::AccountOwnerMismatch);
        }

        let have = self.ledger.balance_of(&op.taker_account_b)?;
        if have < record.amount_b_wanted {
            return Err(LedgerError::InsufficientBalance {
                have,
                need: record.amount_b_wanted,
            }
            .into());
        }
        let (vault, _) = find_vault_address(&op.offer, &record.asset_a)?;
        let authority = record.derived_authorization();

        self.commit(|ledger, store| {
            ledger.transfer(
                &op.taker_account_b,
                &op.maker_account_b,
                record.amount_b_wanted,
                &op.asset_b,
                &Authorizer::User(op.taker),
            )?;

            // live read right before the sweep; the vault balance is
            // never cached
            let escrowed = ledger.balance_of(&vault)?;
            ledger.transfer(
                &vault,
                &op.taker_account_a,
                escrowed,
                &op.asset_a,
                &Authorizer::Derived(authority),
            )?;

            ledger.close_and_refund(&vault, &op.taker, &Authorizer::Derived(authority))?;
            store.consume(&op.offer)?;
            ledger.credit_native(&record.maker, RECORD_STORAGE_DEPOSIT)
        })
    }

    /// Maker-initiated withdraw: returns the escrowed asset A and both
    /// storage deposits to the maker, destroying the offer.
    ///
    /// # Errors
    ///
    /// [`SwapError::OfferNotFound`], [`SwapError::OfferMismatch`] when
    /// the caller is not the stored maker or names the wrong asset,
    /// [`SwapError::InvalidAuthorityProof`],
    /// [`SwapError::AccountOwnerMismatch`], or a ledger error.
    pub fn cancel_offer(&mut self, op: CancelOffer) -> Result<()> {
        let record = self.store.get(&op.offer)?;
        if record.maker != op.maker || record.asset_a != op.asset_a.id {
            return Err(SwapError::OfferMismatch);
        }
        self.verify_authority(&record, &op.offer)?;
        if self.ledger.owner_of(&op.maker_account_a)? != record.maker {
            return Err(SwapError::AccountOwnerMismatch);
        }

        let (vault, _) = find_vault_address(&op.offer, &record.asset_a)?;
        let authority = record.derived_authorization();

        self.commit(|ledger, store| {
            let escrowed = ledger.balance_of(&vault)?;
            ledger.transfer(
                &vault,
                &op.maker_account_a,
                escrowed,
                &op.asset_a,
                &Authorizer::Derived(authority),
            )?;
            ledger.close_and_refund(&vault, &record.maker, &Authorizer::Derived(authority))?;
            store.consume(&op.offer)?;
            ledger.credit_native(&record.maker, RECORD_STORAGE_DEPOSIT)
        })
    }

    /// The re-derived address from the stored seeds must match the
    /// address being acted upon; defends against authority spoofing.
    fn verify_authority(&self, record: &Offer, target: &Address) -> Result<()> {
        let expected = offer_address(&record.maker, record.id, record.authority_proof)
            .map_err(|_| SwapError::InvalidAuthorityProof)?;
        if !expected.ct_eq(target) {
            return Err(SwapError::InvalidAuthorityProof);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::assert_err;
    use crate::MemoryLedger;

    const MAKER: Address = Address::new([1; 32]);
    const MINT_A: Address = Address::new([3; 32]);

    #[test]
    fn make_rejects_zero_amounts() {
        let mut engine = SwapEngine::new(MemoryLedger::new());
        let op = MakeOffer {
            id: 1,
            maker: MAKER,
            maker_account_a: Address::new([10; 32]),
            asset_a: Asset::new(MINT_A, 6),
            asset_b: Asset::new(Address::new([4; 32]), 6),
            amount_a_offered: 0,
            amount_b_wanted: 5,
        };
        assert_err(engine.make_offer(op), SwapError::ZeroAmount);
    }

    #[test]
    fn make_rejects_identical_assets() {
        let mut engine = SwapEngine::new(MemoryLedger::new());
        let op = MakeOffer {
            id: 1,
            maker: MAKER,
            maker_account_a: Address::new([10; 32]),
            asset_a: Asset::new(MINT_A, 6),
            asset_b: Asset::new(MINT_A, 6),
            amount_a_offered: 5,
            amount_b_wanted: 5,
        };
        assert_err(engine.make_offer(op), SwapError::AssetPairIdentical);
    }
}
