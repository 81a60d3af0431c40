//! Ledger error types

use thiserror::Error;

/// Precondition violations raised by ledger operations.
///
/// Every variant aborts the whole operation before any table write, so
/// a returned error always means the ledger is unchanged.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid symbol name")]
    InvalidSymbol,

    #[error("invalid precision: {0}")]
    InvalidPrecision(u8),

    #[error("invalid asset")]
    InvalidAsset,

    #[error("asset symbols do not match")]
    SymbolMismatch,

    #[error("symbol precision mismatch")]
    PrecisionMismatch,

    #[error("asset amount overflow")]
    AmountOverflow,

    #[error("memo has more than 256 bytes")]
    MemoTooLong,

    #[error("missing required authority: {0}")]
    MissingAuthority(String),

    #[error("account does not exist: {0}")]
    UnknownAccount(String),

    #[error("token with symbol already exists")]
    DuplicateSymbol,

    #[error("token with symbol does not exist")]
    UnknownSymbol,

    #[error("issuer must be the ledger owner account")]
    ForeignIssuer,

    #[error("max-supply must be positive")]
    NonPositiveMaxSupply,

    #[error("positive rewards are impossible, increase the max supply or symbol precision")]
    RewardUnrepresentable,

    #[error("tokens can only be issued to the issuer account")]
    IssueToNonIssuer,

    #[error("supply has already been issued for this symbol")]
    SupplyAlreadyIssued,

    #[error("must {action} positive quantity")]
    NonPositiveQuantity { action: &'static str },

    #[error("quantity must be less than the maximum supply")]
    ExceedsMaxSupply,

    #[error("mine is empty, reward would breach the maximum supply")]
    MineExhausted,

    #[error("cannot transfer to self")]
    SelfTransfer,

    #[error("issuer may not transfer tokens")]
    IssuerTransfer,

    #[error("overdrawn balance")]
    Overdrawn,

    #[error("no balance record found")]
    NoBalance,

    #[error("cannot close because the balance is not zero")]
    NonZeroBalance,
}

pub type Result<T> = std::result::Result<T, LedgerError>;
