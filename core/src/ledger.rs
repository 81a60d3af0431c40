//! Token ledger state machine
//!
//! One `TokenLedger` owns the supply table (one record per symbol) and
//! the balance table (one record per owner/symbol pair). Every mutation
//! validates its preconditions before the first table write, so a
//! returned error always leaves the ledger untouched. The host
//! serializes operations, which makes the mining time gate a race-free
//! compare-then-set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use economics::RewardCalculator;

use crate::asset::{Asset, Symbol, SymbolCode};
use crate::error::{LedgerError, Result};
use crate::event::LedgerEvent;
use crate::host::Host;
use crate::timestamp::BlockTimestamp;

/// Account identity, as registered with the host
pub type AccountName = String;

/// Longest accepted memo, in bytes
pub const MAX_MEMO_BYTES: usize = 256;

/// Per-symbol supply accounting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyRecord {
    /// Circulating supply; zero until the genesis issue
    pub supply: Asset,
    /// Issuance ceiling, fixed at creation
    pub max_supply: Asset,
    /// Identity that performed `create` and receives the genesis mint
    pub issuer: AccountName,
    /// Slot of the most recent successful mining claim
    pub last_reward_time: BlockTimestamp,
}

/// One account's holding of one symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub balance: Asset,
    /// Account whose resources paid for this row
    pub payer: AccountName,
}

/// Outcome of a `mine` call that committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MineOutcome {
    /// The reward was credited to the miner
    Rewarded(Asset),
    /// The current slot was already rewarded; only a `MiningFail`
    /// notification was emitted
    TooEarly,
}

/// The accounting engine for one ledger-owner identity.
///
/// Tables are ordered maps keyed by symbol code and by the
/// (owner, symbol code) pair; the owner identity is fixed at
/// construction.
#[derive(Debug, Clone)]
pub struct TokenLedger {
    owner: AccountName,
    supplies: BTreeMap<SymbolCode, SupplyRecord>,
    balances: BTreeMap<(AccountName, SymbolCode), BalanceRecord>,
}

impl TokenLedger {
    pub fn new(owner: impl Into<AccountName>) -> Self {
        TokenLedger {
            owner: owner.into(),
            supplies: BTreeMap::new(),
            balances: BTreeMap::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Registers a new symbol with a fixed issuance ceiling.
    ///
    /// Requires the ledger owner's authority; the issuer must be the
    /// owner itself. Rejects symbols whose ceiling is too small to ever
    /// pay a one-minor-unit reward.
    pub fn create(&mut self, host: &mut dyn Host, issuer: &str, max_supply: Asset) -> Result<()> {
        host.require_auth(&self.owner)?;

        let symbol = max_supply.symbol.clone();
        if !symbol.is_valid() {
            return Err(LedgerError::InvalidSymbol);
        }
        if !max_supply.is_valid() {
            return Err(LedgerError::InvalidAsset);
        }
        if max_supply.amount == 0 {
            return Err(LedgerError::NonPositiveMaxSupply);
        }
        if self.supplies.contains_key(symbol.code()) {
            return Err(LedgerError::DuplicateSymbol);
        }
        if issuer != self.owner {
            return Err(LedgerError::ForeignIssuer);
        }
        if RewardCalculator::reward_units(max_supply.amount) == 0 {
            return Err(LedgerError::RewardUnrepresentable);
        }

        log::info!("created token {} with max supply {}", symbol, max_supply);
        self.supplies.insert(
            symbol.code().clone(),
            SupplyRecord {
                supply: Asset::zero(symbol),
                max_supply,
                issuer: issuer.to_string(),
                last_reward_time: BlockTimestamp::default(),
            },
        );
        Ok(())
    }

    /// Performs the one-time genesis mint for a symbol.
    ///
    /// Only the issuer may issue, only to itself, and only while the
    /// supply is still zero.
    pub fn issue(&mut self, host: &mut dyn Host, to: &str, quantity: Asset, memo: &str) -> Result<()> {
        let symbol = quantity.symbol.clone();
        if !symbol.is_valid() {
            return Err(LedgerError::InvalidSymbol);
        }
        check_memo(memo)?;

        let record = self
            .supplies
            .get(symbol.code())
            .ok_or(LedgerError::UnknownSymbol)?;
        host.require_auth(&record.issuer)?;

        if to != record.issuer {
            return Err(LedgerError::IssueToNonIssuer);
        }
        if record.supply.amount != 0 {
            return Err(LedgerError::SupplyAlreadyIssued);
        }
        if !quantity.is_valid() {
            return Err(LedgerError::InvalidAsset);
        }
        if quantity.amount == 0 {
            return Err(LedgerError::NonPositiveQuantity { action: "issue" });
        }
        if quantity.amount >= record.max_supply.amount {
            return Err(LedgerError::ExceedsMaxSupply);
        }
        if quantity.symbol != record.supply.symbol {
            return Err(LedgerError::PrecisionMismatch);
        }

        let issuer = record.issuer.clone();
        let new_supply = record.supply.checked_add(&quantity)?;

        let record = self
            .supplies
            .get_mut(symbol.code())
            .ok_or(LedgerError::UnknownSymbol)?;
        record.supply = new_supply;
        self.add_balance(&issuer, &quantity, &issuer)?;

        log::info!("issued {} to {}", quantity, issuer);
        Ok(())
    }

    /// Moves tokens between two non-issuer accounts.
    ///
    /// The recipient pays for a newly created balance row when it has
    /// independently authorized the transaction, otherwise the sender
    /// does.
    pub fn transfer(
        &mut self,
        host: &mut dyn Host,
        from: &str,
        to: &str,
        quantity: Asset,
        memo: &str,
    ) -> Result<()> {
        if from == to {
            return Err(LedgerError::SelfTransfer);
        }
        host.require_auth(from)?;
        if !host.is_account(to) {
            return Err(LedgerError::UnknownAccount(to.to_string()));
        }

        let record = self
            .supplies
            .get(quantity.symbol.code())
            .ok_or(LedgerError::UnknownSymbol)?;
        if from == record.issuer {
            return Err(LedgerError::IssuerTransfer);
        }
        if !quantity.is_valid() {
            return Err(LedgerError::InvalidAsset);
        }
        if quantity.amount == 0 {
            return Err(LedgerError::NonPositiveQuantity { action: "transfer" });
        }
        if quantity.symbol != record.supply.symbol {
            return Err(LedgerError::PrecisionMismatch);
        }
        check_memo(memo)?;

        let payer = if host.has_auth(to) { to } else { from };
        let payer = payer.to_string();

        self.sub_balance(from, &quantity)?;
        self.add_balance(to, &quantity, &payer)?;

        host.notify(from);
        host.notify(to);
        Ok(())
    }

    /// Creates a zero balance row so `owner` can receive the symbol
    /// without charging the sender for storage. Idempotent.
    pub fn open(&mut self, host: &mut dyn Host, owner: &str, symbol: &Symbol, payer: &str) -> Result<()> {
        host.require_auth(payer)?;
        if !host.is_account(owner) {
            return Err(LedgerError::UnknownAccount(owner.to_string()));
        }

        let record = self
            .supplies
            .get(symbol.code())
            .ok_or(LedgerError::UnknownSymbol)?;
        if record.supply.symbol != *symbol {
            return Err(LedgerError::PrecisionMismatch);
        }

        let key = (owner.to_string(), symbol.code().clone());
        self.balances.entry(key).or_insert_with(|| BalanceRecord {
            balance: Asset::zero(symbol.clone()),
            payer: payer.to_string(),
        });
        Ok(())
    }

    /// Deletes an empty balance row, releasing its storage.
    pub fn close(&mut self, host: &mut dyn Host, owner: &str, symbol: &Symbol) -> Result<()> {
        host.require_auth(owner)?;

        let key = (owner.to_string(), symbol.code().clone());
        let record = self.balances.get(&key).ok_or(LedgerError::NoBalance)?;
        if record.balance.amount != 0 {
            return Err(LedgerError::NonZeroBalance);
        }
        self.balances.remove(&key);
        Ok(())
    }

    /// Claims the inflation reward for the current block slot.
    ///
    /// At most one claim per slot per symbol: a claim inside an
    /// already-rewarded slot commits nothing but a `MiningFail` event
    /// and reports `MineOutcome::TooEarly`.
    pub fn mine(&mut self, host: &mut dyn Host, miner: &str, symbol: &Symbol) -> Result<MineOutcome> {
        host.require_auth(miner)?;
        if !symbol.is_valid() {
            return Err(LedgerError::InvalidSymbol);
        }

        let record = self
            .supplies
            .get(symbol.code())
            .ok_or(LedgerError::UnknownSymbol)?;
        if *symbol != record.supply.symbol {
            return Err(LedgerError::PrecisionMismatch);
        }

        let now = host.current_time();
        if record.last_reward_time >= now {
            log::debug!("mine for {} rejected, slot {} already rewarded", symbol, now.slot());
            host.dispatch(LedgerEvent::MiningFail {
                from: record.issuer.clone(),
                to: miner.to_string(),
                symbol: symbol.clone(),
                memo: "Fail".to_string(),
            });
            return Ok(MineOutcome::TooEarly);
        }

        let reward = Asset::new(
            RewardCalculator::reward_units(record.supply.amount),
            record.supply.symbol.clone(),
        );
        if !reward.is_valid() {
            return Err(LedgerError::InvalidAsset);
        }
        if reward.amount == 0 {
            return Err(LedgerError::NonPositiveQuantity { action: "reward" });
        }
        let headroom = record.max_supply.amount.saturating_sub(record.supply.amount);
        if reward.amount > headroom {
            return Err(LedgerError::MineExhausted);
        }

        let issuer = record.issuer.clone();
        let new_supply = record.supply.checked_add(&reward)?;

        let record = self
            .supplies
            .get_mut(symbol.code())
            .ok_or(LedgerError::UnknownSymbol)?;
        record.last_reward_time = now;
        record.supply = new_supply;
        self.add_balance(miner, &reward, miner)?;

        host.notify(&self.owner);
        host.notify(miner);
        host.dispatch(LedgerEvent::MiningReward {
            from: issuer,
            to: miner.to_string(),
            reward: reward.clone(),
            memo: "Success!".to_string(),
        });

        log::info!("mining reward {} claimed by {}", reward, miner);
        Ok(MineOutcome::Rewarded(reward))
    }

    /// Receipt for a successful mining claim. Requires the issuer's
    /// authority and notifies both named parties; no state change.
    pub fn mining_reward(
        &self,
        host: &mut dyn Host,
        from: &str,
        to: &str,
        reward: &Asset,
        _memo: &str,
    ) -> Result<()> {
        let record = self
            .supplies
            .get(reward.symbol.code())
            .ok_or(LedgerError::UnknownSymbol)?;
        host.require_auth(&record.issuer)?;
        host.notify(from);
        host.notify(to);
        Ok(())
    }

    /// Receipt for a rejected same-slot mining claim. Requires the
    /// issuer's authority and notifies both named parties; no state
    /// change.
    pub fn mining_fail(
        &self,
        host: &mut dyn Host,
        from: &str,
        to: &str,
        symbol: &Symbol,
        _memo: &str,
    ) -> Result<()> {
        let record = self
            .supplies
            .get(symbol.code())
            .ok_or(LedgerError::UnknownSymbol)?;
        host.require_auth(&record.issuer)?;
        host.notify(from);
        host.notify(to);
        Ok(())
    }

    /// Current circulating supply for a symbol
    pub fn get_supply(&self, code: &SymbolCode) -> Option<Asset> {
        self.supplies.get(code).map(|record| record.supply.clone())
    }

    /// One account's holding of a symbol
    pub fn get_balance(&self, owner: &str, code: &SymbolCode) -> Option<Asset> {
        self.balances
            .get(&(owner.to_string(), code.clone()))
            .map(|record| record.balance.clone())
    }

    /// Full supply record, including the last reward slot
    pub fn supply_record(&self, code: &SymbolCode) -> Option<&SupplyRecord> {
        self.supplies.get(code)
    }

    /// Full balance record, including the paying account
    pub fn balance_record(&self, owner: &str, code: &SymbolCode) -> Option<&BalanceRecord> {
        self.balances.get(&(owner.to_string(), code.clone()))
    }

    /// Sum of every balance row for a symbol; equals the supply while
    /// the conservation invariant holds
    pub fn total_balance(&self, code: &SymbolCode) -> u64 {
        self.balances
            .iter()
            .filter(|((_, sym_code), _)| sym_code == code)
            .map(|(_, record)| record.balance.amount)
            .sum()
    }

    fn sub_balance(&mut self, owner: &str, value: &Asset) -> Result<()> {
        let key = (owner.to_string(), value.symbol.code().clone());
        let record = self.balances.get_mut(&key).ok_or(LedgerError::NoBalance)?;
        if record.balance.amount < value.amount {
            return Err(LedgerError::Overdrawn);
        }
        record.balance = record.balance.checked_sub(value)?;
        Ok(())
    }

    fn add_balance(&mut self, owner: &str, value: &Asset, payer: &str) -> Result<()> {
        let key = (owner.to_string(), value.symbol.code().clone());
        match self.balances.get_mut(&key) {
            Some(record) => {
                record.balance = record.balance.checked_add(value)?;
            }
            None => {
                self.balances.insert(
                    key,
                    BalanceRecord {
                        balance: value.clone(),
                        payer: payer.to_string(),
                    },
                );
            }
        }
        Ok(())
    }

    pub(crate) fn parts(
        &self,
    ) -> (
        &AccountName,
        &BTreeMap<SymbolCode, SupplyRecord>,
        &BTreeMap<(AccountName, SymbolCode), BalanceRecord>,
    ) {
        (&self.owner, &self.supplies, &self.balances)
    }

    pub(crate) fn from_parts(
        owner: AccountName,
        supplies: BTreeMap<SymbolCode, SupplyRecord>,
        balances: BTreeMap<(AccountName, SymbolCode), BalanceRecord>,
    ) -> Self {
        TokenLedger {
            owner,
            supplies,
            balances,
        }
    }
}

fn check_memo(memo: &str) -> Result<()> {
    if memo.len() > MAX_MEMO_BYTES {
        return Err(LedgerError::MemoTooLong);
    }
    Ok(())
}
