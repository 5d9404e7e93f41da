//! The persisted offer record.
//!
//! The escrowed quantity of asset A is deliberately *not* stored here;
//! it is defined to equal the vault's live balance at all times. Only
//! `amount_b_wanted` is persisted, because asset B is never in custody
//! before the take and the taker has no other way to learn it.

use bincode::{Decode, Encode};

use crate::authority::DerivedAuthorization;
use crate::derive::offer_address;
use crate::error::CodecError;
use crate::{Address, Result};

/// Type tag prefixing every serialized offer record.
pub const RECORD_TAG: [u8; 4] = *b"OFFR";
/// Current record layout version.
pub const RECORD_VERSION: u8 = 1;

/// An open offer: asset A sits in the vault, `amount_b_wanted` of
/// asset B completes the trade.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct Offer {
    /// Caller-chosen identifier, unique per maker.
    pub id: u64,
    /// Identity of the offer creator.
    pub maker: Address,
    /// Asset held in the vault.
    pub asset_a: Address,
    /// Asset wanted in return.
    pub asset_b: Address,
    /// Quantity of asset B required to take the offer.
    pub amount_b_wanted: u64,
    /// Bump that re-derives the vault's controlling address.
    pub authority_proof: u8,
}

fn codec_config() -> impl bincode::config::Config {
    bincode::config::standard().with_fixed_int_encoding()
}

impl Offer {
    /// Serializes the record in its fixed, versioned binary layout.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let body = bincode::encode_to_vec(self, codec_config())
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        let mut buf = Vec::with_capacity(RECORD_TAG.len() + 1 + body.len());
        buf.extend_from_slice(&RECORD_TAG);
        buf.push(RECORD_VERSION);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// Decodes a record, rejecting foreign or malformed bytes before
    /// interpretation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < RECORD_TAG.len() + 1 {
            return Err(CodecError::Malformed("record shorter than header".into()).into());
        }
        let (header, body) = bytes.split_at(RECORD_TAG.len() + 1);
        if header[..RECORD_TAG.len()] != RECORD_TAG {
            return Err(CodecError::ForeignRecord.into());
        }
        let version = header[RECORD_TAG.len()];
        if version != RECORD_VERSION {
            return Err(CodecError::UnsupportedVersion(version).into());
        }
        let (offer, read) = bincode::decode_from_slice(body, codec_config())
            .map_err(|e| CodecError::Malformed(e.to_string()))?;
        if read != body.len() {
            return Err(CodecError::Malformed("trailing bytes after record".into()).into());
        }
        Ok(offer)
    }

    /// Re-derives this record's own address from the stored proof.
    pub fn address(&self) -> Result<Address> {
        offer_address(&self.maker, self.id, self.authority_proof)
    }

    /// Capability that lets the engine act as the vault's authority.
    pub fn derived_authorization(&self) -> DerivedAuthorization {
        DerivedAuthorization {
            maker: self.maker,
            id: self.id,
            bump: self.authority_proof,
        }
    }
}
