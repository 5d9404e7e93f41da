use thiserror::Error;

/// Swap-engine errors.
#[derive(Debug, Error, PartialEq)]
pub enum SwapError {
    /// An offer already exists at the derived `(maker, id)` address.
    #[error("offer already exists at derived address")]
    DuplicateOffer,

    /// No offer record at the given address.
    #[error("offer not found")]
    OfferNotFound,

    /// Supplied maker or asset pair does not match the stored record.
    #[error("supplied fields do not match the stored offer")]
    OfferMismatch,

    /// Authority proof does not re-derive the address being acted upon.
    #[error("authority proof does not re-derive the offer address")]
    InvalidAuthorityProof,

    /// Offered and wanted amounts must both be non-zero.
    #[error("amount must be non-zero")]
    ZeroAmount,

    /// An offer must exchange two distinct assets.
    #[error("offered and wanted assets must differ")]
    AssetPairIdentical,

    /// A payout destination is not owned by the party it must pay.
    #[error("account owner does not match the required party")]
    AccountOwnerMismatch,

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("address error: {0}")]
    Address(#[from] AddressError),

    #[error("record codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Errors surfaced by the asset-ledger adapter.
#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    /// Declared asset id or precision differs from the ledger record.
    #[error("declared asset does not match ledger record")]
    AssetMismatch,

    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u64, need: u64 },

    /// Close attempted on an account still holding a balance.
    #[error("account not empty")]
    AccountNotEmpty,

    /// Close authorizer does not match the account's recorded authority.
    #[error("unauthorized close")]
    UnauthorizedClose,

    /// Transfer authorizer does not own the debited account.
    #[error("unauthorized transfer")]
    UnauthorizedTransfer,

    #[error("no account at the given address")]
    AccountNotFound,

    #[error("account already exists at the given address")]
    AccountExists,

    /// Credit would overflow the destination balance.
    #[error("balance overflow")]
    BalanceOverflow,
}

/// Errors while parsing or deriving an `Address`.
#[derive(Debug, Error, PartialEq)]
pub enum AddressError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid base58: {0}")]
    Base58(#[from] bs58::decode::Error),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("cannot parse identity from empty string")]
    EmptyIdentity,

    #[error("unsupported identity format")]
    UnsupportedFormat,

    #[error("identity must be 32 bytes, got {0}")]
    BadLength(usize),

    /// The candidate digest decodes as a signable curve point.
    #[error("derived address is signable for bump {0}")]
    SignableAddress(u8),

    /// No bump in the search space yields a non-signable address.
    #[error("address derivation space exhausted")]
    DerivationExhausted,
}

/// Errors while encoding or decoding persisted offer records.
#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    /// Record tag does not identify an offer record.
    #[error("foreign record tag")]
    ForeignRecord,

    #[error("unsupported record version: {0}")]
    UnsupportedVersion(u8),

    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("record encoding failed: {0}")]
    Encode(String),
}
