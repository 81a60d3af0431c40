//! Ledger snapshots
//!
//! A snapshot captures the owner and both tables as plain record lists,
//! which keeps the encoding stable and representable in JSON as well as
//! binary formats. The symbol embedded in each asset keys the rebuild.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::ledger::{AccountName, BalanceRecord, SupplyRecord, TokenLedger};

/// One balance row together with its owning account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub owner: AccountName,
    pub balance: Asset,
    pub payer: AccountName,
}

/// Serializable capture of a whole ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub owner: AccountName,
    pub supplies: Vec<SupplyRecord>,
    pub balances: Vec<BalanceEntry>,
}

impl TokenLedger {
    /// Captures the full ledger state
    pub fn snapshot(&self) -> LedgerSnapshot {
        let (owner, supplies, balances) = self.parts();
        LedgerSnapshot {
            owner: owner.clone(),
            supplies: supplies.values().cloned().collect(),
            balances: balances
                .iter()
                .map(|((owner, _), record)| BalanceEntry {
                    owner: owner.clone(),
                    balance: record.balance.clone(),
                    payer: record.payer.clone(),
                })
                .collect(),
        }
    }

    /// Rebuilds a ledger observationally identical to the captured one
    pub fn restore(snapshot: LedgerSnapshot) -> Self {
        let mut supplies = BTreeMap::new();
        for record in snapshot.supplies {
            supplies.insert(record.supply.symbol.code().clone(), record);
        }
        let mut balances = BTreeMap::new();
        for entry in snapshot.balances {
            let key = (entry.owner, entry.balance.symbol.code().clone());
            balances.insert(
                key,
                BalanceRecord {
                    balance: entry.balance,
                    payer: entry.payer,
                },
            );
        }
        TokenLedger::from_parts(snapshot.owner, supplies, balances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{Symbol, SymbolCode};
    use crate::host::LocalHost;

    fn populated_ledger() -> TokenLedger {
        let mut host = LocalHost::new();
        host.sign_as("oretoken");
        host.sign_as("digger");

        let mut ledger = TokenLedger::new("oretoken");
        ledger
            .create(&mut host, "oretoken", "2000000000.0000 ORE".parse().unwrap())
            .unwrap();
        ledger
            .issue(
                &mut host,
                "oretoken",
                "1000000000.0000 ORE".parse().unwrap(),
                "genesis",
            )
            .unwrap();
        host.advance_block();
        ledger
            .mine(&mut host, "digger", &Symbol::new("ORE", 4).unwrap())
            .unwrap();
        ledger
    }

    #[test]
    fn test_snapshot_round_trip() {
        let ledger = populated_ledger();
        let restored = TokenLedger::restore(ledger.snapshot());
        let code = SymbolCode::new("ORE").unwrap();

        assert_eq!(restored.owner(), ledger.owner());
        assert_eq!(restored.get_supply(&code), ledger.get_supply(&code));
        assert_eq!(
            restored.supply_record(&code),
            ledger.supply_record(&code)
        );
        assert_eq!(
            restored.get_balance("digger", &code),
            ledger.get_balance("digger", &code)
        );
        assert_eq!(restored.total_balance(&code), ledger.total_balance(&code));
    }

    #[test]
    fn test_snapshot_encodes_with_bincode_and_json() {
        let snapshot = populated_ledger().snapshot();

        let json = serde_json::to_string(&snapshot).unwrap();
        let from_json: LedgerSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(from_json, snapshot);
    }
}
