//! The asset-ledger adapter: a thin seam over the external
//! asset-transfer primitive.
//!
//! Transfers are "checked": the caller-declared asset id and precision
//! must match the ledger's own record for both accounts. Custody
//! accounts carry a refundable storage deposit, charged to the payer at
//! creation and returned to a designated party on close.

use std::collections::HashMap;

use crate::error::LedgerError;
use crate::{Address, Asset, Authorizer, Result, SwapError};

/// Refundable deposit charged for persisting a token custody account.
pub const ACCOUNT_STORAGE_DEPOSIT: u64 = 2_039_280;

/// Contract interface to the external asset-transfer primitive.
pub trait Ledger {
    /// Creates a token account at `address` holding `asset`, controlled
    /// by `owner`. Charges `payer` the account storage deposit.
    fn open_account(
        &mut self,
        address: Address,
        asset: &Asset,
        owner: Address,
        payer: &Address,
    ) -> Result<()>;

    /// Live balance of a token account. The custody account itself is
    /// the source of truth for escrowed amounts; callers must read it
    /// immediately before acting on it.
    fn balance_of(&self, account: &Address) -> Result<u64>;

    /// Recorded owning identity of a token account. Payout destinations
    /// are checked against this before any value moves.
    fn owner_of(&self, account: &Address) -> Result<Address>;

    /// Moves `amount` of `asset` from `from` to `to`, checking the
    /// declared asset against both account records.
    fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u64,
        asset: &Asset,
        authorizer: &Authorizer,
    ) -> Result<()>;

    /// Deletes an empty token account, refunding its storage deposit
    /// to `refund_to`.
    fn close_and_refund(
        &mut self,
        account: &Address,
        refund_to: &Address,
        authorizer: &Authorizer,
    ) -> Result<()>;

    /// Debits a native balance (record storage deposits).
    fn debit_native(&mut self, from: &Address, amount: u64) -> Result<()>;

    /// Credits a native balance (deposit refunds).
    fn credit_native(&mut self, to: &Address, amount: u64) -> Result<()>;
}

#[derive(Debug, Clone)]
struct TokenAccount {
    asset: Address,
    decimals: u8,
    owner: Address,
    balance: u64,
    deposit: u64,
}

/// In-memory ledger used by the engine's atomic units and by tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    accounts: HashMap<Address, TokenAccount>,
    native: HashMap<Address, u64>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints `amount` into an existing token account.
    pub fn credit(&mut self, account: &Address, amount: u64) -> Result<()> {
        let acct = self
            .accounts
            .get_mut(account)
            .ok_or(LedgerError::AccountNotFound)?;
        acct.balance = acct
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        Ok(())
    }

    /// Native balance of `who`, zero if unknown.
    pub fn native_balance(&self, who: &Address) -> u64 {
        self.native.get(who).copied().unwrap_or(0)
    }

    pub fn account_exists(&self, account: &Address) -> bool {
        self.accounts.contains_key(account)
    }

    fn authorized(&self, account: &TokenAccount, authorizer: &Authorizer) -> Result<bool> {
        match authorizer {
            Authorizer::User(identity) => Ok(identity.ct_eq(&account.owner)),
            Authorizer::Derived(seeds) => {
                let derived = seeds
                    .address()
                    .map_err(|_| SwapError::InvalidAuthorityProof)?;
                Ok(derived.ct_eq(&account.owner))
            }
        }
    }
}

impl Ledger for MemoryLedger {
    fn open_account(
        &mut self,
        address: Address,
        asset: &Asset,
        owner: Address,
        payer: &Address,
    ) -> Result<()> {
        if self.accounts.contains_key(&address) {
            return Err(LedgerError::AccountExists.into());
        }
        self.debit_native(payer, ACCOUNT_STORAGE_DEPOSIT)?;
        self.accounts.insert(
            address,
            TokenAccount {
                asset: asset.id,
                decimals: asset.decimals,
                owner,
                balance: 0,
                deposit: ACCOUNT_STORAGE_DEPOSIT,
            },
        );
        Ok(())
    }

    fn balance_of(&self, account: &Address) -> Result<u64> {
        self.accounts
            .get(account)
            .map(|acct| acct.balance)
            .ok_or_else(|| LedgerError::AccountNotFound.into())
    }

    fn owner_of(&self, account: &Address) -> Result<Address> {
        self.accounts
            .get(account)
            .map(|acct| acct.owner)
            .ok_or_else(|| LedgerError::AccountNotFound.into())
    }

    fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u64,
        asset: &Asset,
        authorizer: &Authorizer,
    ) -> Result<()> {
        let from_acct = self
            .accounts
            .get(from)
            .ok_or(LedgerError::AccountNotFound)?;
        if from_acct.asset != asset.id || from_acct.decimals != asset.decimals {
            return Err(LedgerError::AssetMismatch.into());
        }
        if !self.authorized(from_acct, authorizer)? {
            return match authorizer {
                Authorizer::User(_) => Err(LedgerError::UnauthorizedTransfer.into()),
                Authorizer::Derived(_) => Err(SwapError::InvalidAuthorityProof),
            };
        }
        if from_acct.balance < amount {
            return Err(LedgerError::InsufficientBalance {
                have: from_acct.balance,
                need: amount,
            }
            .into());
        }

        let to_acct = self.accounts.get(to).ok_or(LedgerError::AccountNotFound)?;
        if to_acct.asset != asset.id || to_acct.decimals != asset.decimals {
            return Err(LedgerError::AssetMismatch.into());
        }
        // a self-transfer leaves the balance untouched
        if from == to {
            return Ok(());
        }
        let credited = to_acct
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;

        if let Some(acct) = self.accounts.get_mut(from) {
            acct.balance -= amount;
        }
        if let Some(acct) = self.accounts.get_mut(to) {
            acct.balance = credited;
        }
        Ok(())
    }

    fn close_and_refund(
        &mut self,
        account: &Address,
        refund_to: &Address,
        authorizer: &Authorizer,
    ) -> Result<()> {
        let acct = self
            .accounts
            .get(account)
            .ok_or(LedgerError::AccountNotFound)?;
        if acct.balance != 0 {
            return Err(LedgerError::AccountNotEmpty.into());
        }
        if !self.authorized(acct, authorizer)? {
            return Err(LedgerError::UnauthorizedClose.into());
        }
        let acct = self
            .accounts
            .remove(account)
            .ok_or(LedgerError::AccountNotFound)?;
        self.credit_native(refund_to, acct.deposit)?;
        Ok(())
    }

    fn debit_native(&mut self, from: &Address, amount: u64) -> Result<()> {
        let balance = self
            .native
            .get_mut(from)
            .ok_or(LedgerError::AccountNotFound)?;
        if *balance < amount {
            return Err(LedgerError::InsufficientBalance {
                have: *balance,
                need: amount,
            }
            .into());
        }
        *balance -= amount;
        Ok(())
    }

    fn credit_native(&mut self, to: &Address, amount: u64) -> Result<()> {
        let balance = self.native.entry(*to).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::utils::assert_err;

    const ALICE: Address = Address::new([1; 32]);
    const BOB: Address = Address::new([2; 32]);
    const MINT: Address = Address::new([3; 32]);
    const ALICE_ACCT: Address = Address::new([4; 32]);
    const BOB_ACCT: Address = Address::new([5; 32]);

    fn funded_ledger() -> (MemoryLedger, Asset) {
        let asset = Asset::new(MINT, 6);
        let mut ledger = MemoryLedger::new();
        ledger.credit_native(&ALICE, 10 * ACCOUNT_STORAGE_DEPOSIT).unwrap();
        ledger.credit_native(&BOB, 10 * ACCOUNT_STORAGE_DEPOSIT).unwrap();
        ledger.open_account(ALICE_ACCT, &asset, ALICE, &ALICE).unwrap();
        ledger.open_account(BOB_ACCT, &asset, BOB, &BOB).unwrap();
        ledger.credit(&ALICE_ACCT, 1_000).unwrap();
        (ledger, asset)
    }

    #[test]
    fn checked_transfer_moves_value() {
        let (mut ledger, asset) = funded_ledger();
        ledger
            .transfer(&ALICE_ACCT, &BOB_ACCT, 400, &asset, &Authorizer::User(ALICE))
            .unwrap();
        assert_eq!(ledger.balance_of(&ALICE_ACCT).unwrap(), 600);
        assert_eq!(ledger.balance_of(&BOB_ACCT).unwrap(), 400);
    }

    #[test]
    fn transfer_rejects_precision_mismatch() {
        let (mut ledger, _) = funded_ledger();
        let wrong = Asset::new(MINT, 9);
        assert_err(
            ledger.transfer(&ALICE_ACCT, &BOB_ACCT, 1, &wrong, &Authorizer::User(ALICE)),
            SwapError::Ledger(LedgerError::AssetMismatch),
        );
    }

    #[test]
    fn transfer_rejects_non_owner() {
        let (mut ledger, asset) = funded_ledger();
        assert_err(
            ledger.transfer(&ALICE_ACCT, &BOB_ACCT, 1, &asset, &Authorizer::User(BOB)),
            SwapError::Ledger(LedgerError::UnauthorizedTransfer),
        );
    }

    #[test]
    fn transfer_rejects_overdraw() {
        let (mut ledger, asset) = funded_ledger();
        assert_err(
            ledger.transfer(&ALICE_ACCT, &BOB_ACCT, 1_001, &asset, &Authorizer::User(ALICE)),
            SwapError::Ledger(LedgerError::InsufficientBalance {
                have: 1_000,
                need: 1_001,
            }),
        );
    }

    #[test]
    fn close_rejects_non_empty_account() {
        let (mut ledger, _) = funded_ledger();
        assert_err(
            ledger.close_and_refund(&ALICE_ACCT, &ALICE, &Authorizer::User(ALICE)),
            SwapError::Ledger(LedgerError::AccountNotEmpty),
        );
    }

    #[test]
    fn close_rejects_wrong_authority() {
        let (mut ledger, _) = funded_ledger();
        assert_err(
            ledger.close_and_refund(&BOB_ACCT, &BOB, &Authorizer::User(ALICE)),
            SwapError::Ledger(LedgerError::UnauthorizedClose),
        );
    }

    #[test]
    fn close_refunds_deposit() {
        let (mut ledger, _) = funded_ledger();
        let before = ledger.native_balance(&ALICE);
        ledger
            .close_and_refund(&BOB_ACCT, &ALICE, &Authorizer::User(BOB))
            .unwrap();
        assert_eq!(
            ledger.native_balance(&ALICE),
            before + ACCOUNT_STORAGE_DEPOSIT
        );
        assert!(!ledger.account_exists(&BOB_ACCT));
    }

    #[test]
    fn owner_of_reports_recorded_owner() {
        let (ledger, _) = funded_ledger();
        assert_eq!(ledger.owner_of(&ALICE_ACCT).unwrap(), ALICE);
        assert_err(
            ledger.owner_of(&Address::new([9; 32])),
            SwapError::Ledger(LedgerError::AccountNotFound),
        );
    }

    #[test]
    fn transfer_rejects_destination_overflow() {
        let (mut ledger, asset) = funded_ledger();
        ledger.credit(&BOB_ACCT, u64::MAX - 100).unwrap();
        assert_err(
            ledger.transfer(&ALICE_ACCT, &BOB_ACCT, 200, &asset, &Authorizer::User(ALICE)),
            SwapError::Ledger(LedgerError::BalanceOverflow),
        );
        // source untouched
        assert_eq!(ledger.balance_of(&ALICE_ACCT).unwrap(), 1_000);
    }

    #[test]
    fn credit_rejects_overflow() {
        let (mut ledger, _) = funded_ledger();
        ledger.credit(&BOB_ACCT, u64::MAX).unwrap();
        assert_err(
            ledger.credit(&BOB_ACCT, 1),
            SwapError::Ledger(LedgerError::BalanceOverflow),
        );
    }

    #[test]
    fn credit_native_rejects_overflow() {
        let (mut ledger, _) = funded_ledger();
        let headroom = u64::MAX - ledger.native_balance(&ALICE);
        ledger.credit_native(&ALICE, headroom).unwrap();
        assert_err(
            ledger.credit_native(&ALICE, 1),
            SwapError::Ledger(LedgerError::BalanceOverflow),
        );
    }

    #[test]
    fn open_rejects_existing_address() {
        let (mut ledger, asset) = funded_ledger();
        assert_err(
            ledger.open_account(ALICE_ACCT, &asset, ALICE, &ALICE),
            SwapError::Ledger(LedgerError::AccountExists),
        );
    }
}
