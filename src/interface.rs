//! Core types for JSON (de)serialization of offer parameters and
//! metadata.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{Address, Asset};

/// Reads a JSON-encoded file from the given `path` and deserializes into type `T`.
///
/// # Errors
///
/// Returns an `anyhow::Error` if the file cannot be opened, read, or parsed.
pub fn load_offer_data<P, T>(path: P) -> anyhow::Result<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let content =
        std::fs::read_to_string(path).with_context(|| format!("loading offer data: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("parsing JSON from {:?}", path))
}

/// Writes `data` (serializable) as pretty-printed JSON to the given `path`.
///
/// # Errors
///
/// Returns an `anyhow::Error` if the file cannot be created or data cannot be serialized.
pub fn save_offer_data<P, T>(path: P, data: &T) -> anyhow::Result<()>
where
    P: AsRef<Path>,
    T: Serialize,
{
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating file {:?}", path))?;
    serde_json::to_writer_pretty(file, data)
        .with_context(|| format!("serializing to JSON to {:?}", path))
}

/// Lifecycle of an offer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OfferState {
    /// Custody established; awaiting a taker or a cancel.
    Open,
    /// Consumed by a successful take.
    Settled,
    /// Withdrawn by the maker.
    Cancelled,
}

/// Parameters a client submits to **create** an offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfferParams {
    /// Caller-chosen identifier, unique per maker.
    pub id: u64,

    /// Who is funding the vault.
    pub maker: Address,

    /// The maker's asset-A source account.
    pub maker_account_a: Address,

    /// Asset to lock in the vault.
    pub asset_a: Asset,

    /// Asset wanted in return.
    pub asset_b: Asset,

    /// Quantity of asset A to escrow, in the smallest unit.
    pub amount_a_offered: u64,

    /// Quantity of asset B required to take the offer.
    pub amount_b_wanted: u64,
}

/// Metadata **returned** from offer creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfferMetadata {
    /// The derived offer-record address.
    pub offer: Address,

    /// The derived vault custody address.
    pub vault: Address,

    /// The bump that re-derives the custody authority.
    pub authority_proof: u8,

    /// Where in the lifecycle the offer currently is.
    pub state: OfferState,
}
