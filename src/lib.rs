/// Asset descriptors checked against ledger records on every transfer.
pub mod asset;
/// Authorization capabilities consumed by the ledger adapter.
pub mod authority;
/// Deterministic derived-address resolution and the seed registry.
pub mod derive;
/// Make, take and cancel operations over the offer/vault pair.
pub mod engine;
/// Addresses of parties, assets, accounts and derived authorities.
pub mod identity;
/// The asset-ledger adapter seam and its in-memory implementation.
pub mod ledger;
/// The persisted offer record and its versioned binary layout.
pub mod offer;
/// Exclusive create/consume storage for offer records.
pub mod store;
/// Test support.
pub mod utils;

pub mod error;
pub use error::SwapError;

/// JSON (de)serialization of offer parameters and metadata.
#[cfg(feature = "json")]
pub mod interface;

pub use asset::Asset;
pub use authority::{Authorizer, DerivedAuthorization};
pub use derive::SeedRegistry;
pub use engine::{CancelOffer, MakeOffer, OfferReceipt, SwapEngine, TakeOffer, RECORD_STORAGE_DEPOSIT};
pub use identity::Address;
pub use ledger::{Ledger, MemoryLedger, ACCOUNT_STORAGE_DEPOSIT};
pub use offer::Offer;
pub use store::OfferStore;

pub type Result<T> = std::result::Result<T, SwapError>;
