//! Orecoin Core Library
//!
//! Deterministic accounting engine for a mined fungible token

pub mod asset;
pub mod error;
pub mod event;
pub mod host;
pub mod ledger;
pub mod snapshot;
pub mod timestamp;

// Re-export main types
pub use asset::{Asset, Symbol, SymbolCode, MAX_AMOUNT, MAX_PRECISION};
pub use error::{LedgerError, Result};
pub use event::LedgerEvent;
pub use host::{Host, LocalHost};
pub use ledger::{
    AccountName, BalanceRecord, MineOutcome, SupplyRecord, TokenLedger, MAX_MEMO_BYTES,
};
pub use snapshot::{BalanceEntry, LedgerSnapshot};
pub use timestamp::BlockTimestamp;
