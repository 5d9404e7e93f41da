//! Addresses of parties, assets, accounts and derived authorities.

use base64::Engine as _;
use bincode::{Decode, Encode};
use subtle::ConstantTimeEq;

use crate::error::AddressError;
use crate::{Result, SwapError};

/// Opaque 32-byte address identifying a party, asset, account
/// or derived authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
pub struct Address(pub [u8; 32]);

impl Address {
    pub const LEN: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Constant-time equality. Use on the authority-validation path
    /// instead of `==`.
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.0.as_slice().ct_eq(other.0.as_slice()).unwrap_u8() == 1
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", bs58::encode(&self.0).into_string())
    }
}

impl std::str::FromStr for Address {
    type Err = SwapError;

    /// Parses an address from `0x`-prefixed hex, base58 or base64.
    ///
    /// Unprefixed input is tried as base58 first, then base64.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::EmptyIdentity`] for empty input,
    /// [`AddressError::BadLength`] when the decoded payload is not
    /// 32 bytes, and [`AddressError::UnsupportedFormat`] when no
    /// decoder accepts the input.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(AddressError::EmptyIdentity.into());
        }

        let bytes = if let Some(hex_str) = s.strip_prefix("0x") {
            hex::decode(hex_str).map_err(AddressError::Hex)?
        } else if let Ok(bytes) = bs58::decode(s).into_vec() {
            bytes
        } else if let Ok(bytes) = base64::engine::general_purpose::STANDARD.decode(s) {
            bytes
        } else {
            return Err(AddressError::UnsupportedFormat.into());
        };

        let len = bytes.len();
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| AddressError::BadLength(len))?;
        Ok(Self(bytes))
    }
}

#[cfg(feature = "json")]
impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "json")]
impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
