//! Deterministic derived-address resolution.
//!
//! Custody addresses are hashes of stable seed material plus a one-byte
//! bump. A candidate is accepted only when the digest is *not* a valid
//! ed25519 verifying key, so no external keyholder can ever sign for it;
//! logic holding the exact seed tuple is the sole authority.

use std::sync::OnceLock;

use sha2::{Digest, Sha256};

use crate::error::AddressError;
use crate::{Address, Result, SwapError};

/// Seed prefixes and hash domain for address derivation.
///
/// Resolved once per process; immutable afterwards.
#[derive(Debug)]
pub struct SeedRegistry {
    /// Namespace prefix for offer-record addresses.
    pub offer_prefix: &'static [u8],
    /// Namespace prefix for vault custody addresses.
    pub vault_prefix: &'static [u8],
    /// Domain-separation tag appended to every derivation hash.
    pub domain_tag: &'static [u8],
}

static SEEDS: OnceLock<SeedRegistry> = OnceLock::new();

impl Default for SeedRegistry {
    fn default() -> Self {
        Self {
            offer_prefix: b"offer",
            vault_prefix: b"vault",
            domain_tag: b"SwaplockDerivedAddress",
        }
    }
}

impl SeedRegistry {
    /// Installs a custom registry. Fails (returning the rejected value)
    /// if one was already resolved.
    pub fn install(self) -> std::result::Result<(), SeedRegistry> {
        SEEDS.set(self)
    }

    /// The process-wide registry, resolving defaults on first use.
    pub fn global() -> &'static SeedRegistry {
        SEEDS.get_or_init(SeedRegistry::default)
    }
}

/// Derives an address from `seeds` and `bump`.
///
/// # Errors
///
/// Returns [`AddressError::SignableAddress`] when the digest decodes as
/// a valid curve point; callers searching for a usable bump skip such
/// candidates.
pub fn derive_address(seeds: &[&[u8]], bump: u8) -> Result<Address> {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(SeedRegistry::global().domain_tag);
    let digest: [u8; 32] = hasher.finalize().into();

    if ed25519_dalek::VerifyingKey::from_bytes(&digest).is_ok() {
        return Err(AddressError::SignableAddress(bump).into());
    }
    Ok(Address::new(digest))
}

/// Searches bumps 255 down to 0 for the first non-signable address.
///
/// # Errors
///
/// Returns [`AddressError::DerivationExhausted`] when no bump in the
/// search space yields a usable address. This is a hard failure; the
/// search is never retried past the bound.
pub fn find_address(seeds: &[&[u8]]) -> Result<(Address, u8)> {
    for bump in (0..=u8::MAX).rev() {
        match derive_address(seeds, bump) {
            Ok(address) => return Ok((address, bump)),
            Err(SwapError::Address(AddressError::SignableAddress(_))) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(AddressError::DerivationExhausted.into())
}

/// Resolves the offer address and authority proof for `(maker, id)`.
pub fn find_offer_address(maker: &Address, id: u64) -> Result<(Address, u8)> {
    let reg = SeedRegistry::global();
    find_address(&[reg.offer_prefix, maker.as_ref(), &id.to_le_bytes()])
}

/// Re-derives the offer address from a known authority proof.
pub fn offer_address(maker: &Address, id: u64, bump: u8) -> Result<Address> {
    let reg = SeedRegistry::global();
    derive_address(&[reg.offer_prefix, maker.as_ref(), &id.to_le_bytes()], bump)
}

/// Resolves the vault address bound to an offer and the escrowed asset.
pub fn find_vault_address(offer: &Address, asset_a: &Address) -> Result<(Address, u8)> {
    let reg = SeedRegistry::global();
    find_address(&[reg.vault_prefix, offer.as_ref(), asset_a.as_ref()])
}
