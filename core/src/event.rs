//! Ledger notification events
//!
//! Mining outcomes are announced as events dispatched through the host,
//! so observers can react without re-deriving ledger diffs. Events are
//! receipts only; the matching ledger operations never mutate state.

use serde::{Deserialize, Serialize};

use crate::asset::{Asset, Symbol};
use crate::ledger::AccountName;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A mining claim succeeded and `reward` was credited to `to`
    MiningReward {
        from: AccountName,
        to: AccountName,
        reward: Asset,
        memo: String,
    },
    /// A mining claim arrived inside an already-rewarded slot
    MiningFail {
        from: AccountName,
        to: AccountName,
        symbol: Symbol,
        memo: String,
    },
}
