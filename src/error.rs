use crate::domain::gift_card::{AccountId, GiftCardId, GiftCardStatus};
use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GiftCardError>;

/// Failures reported by a `GiftCardStore` backend.
///
/// An absent row is never a `StoreError`; stores report it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("column family not found: {0}")]
    MissingColumnFamily(&'static str),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),
}

#[derive(Error, Debug, Diagnostic)]
pub enum GiftCardError {
    #[error("gift card {0} not found")]
    #[diagnostic(code(gift_card::not_found))]
    NotFound(GiftCardId),

    #[error("forbidden: account {account} is not the receiver of gift card {card}")]
    #[diagnostic(code(gift_card::unauthorized))]
    Unauthorized { account: AccountId, card: GiftCardId },

    #[error("invalid gift card status: {0}")]
    #[diagnostic(
        code(gift_card::invalid_status),
        help("valid statuses are 0 (accepted), 1 (rejected) and 2 (pending)")
    )]
    InvalidStatus(i64),

    #[error("gift card {card} cannot move from {from} to {to}")]
    #[diagnostic(code(gift_card::invalid_transition))]
    InvalidTransition {
        card: GiftCardId,
        from: GiftCardStatus,
        to: GiftCardStatus,
    },

    #[error("validation error: {0}")]
    #[diagnostic(code(gift_card::validation))]
    Validation(String),

    #[error(transparent)]
    #[diagnostic(code(gift_card::storage))]
    Storage(#[from] StoreError),

    #[error("CSV error: {0}")]
    #[diagnostic(code(gift_card::csv))]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(gift_card::io))]
    Io(#[from] std::io::Error),
}
