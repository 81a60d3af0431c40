//! Host environment boundary
//!
//! The ledger never talks to the outside world directly. Authorization,
//! account existence, the block clock, and notification dispatch are all
//! supplied by the embedder through the `Host` trait; the engine stays
//! deterministic and synchronous.

use std::collections::BTreeSet;

use crate::error::{LedgerError, Result};
use crate::event::LedgerEvent;
use crate::ledger::AccountName;
use crate::timestamp::BlockTimestamp;

/// Services the host execution environment provides to the ledger.
///
/// The host executes one operation to completion before the next, so
/// implementations need no internal synchronization.
pub trait Host {
    /// True if `account` has authorized the current operation
    fn has_auth(&self, account: &str) -> bool;

    /// True if `account` exists in the host's account registry
    fn is_account(&self, account: &str) -> bool;

    /// Timestamp of the block the current operation executes in
    fn current_time(&self) -> BlockTimestamp;

    /// Marks `account` as a required observer of the current operation
    fn notify(&mut self, account: &str);

    /// Emits a follow-up event for independent delivery
    fn dispatch(&mut self, event: LedgerEvent);

    /// Fails the operation unless `account` authorized it
    fn require_auth(&self, account: &str) -> Result<()> {
        if self.has_auth(account) {
            Ok(())
        } else {
            Err(LedgerError::MissingAuthority(account.to_string()))
        }
    }
}

/// In-process host for single-node embedding and tests.
///
/// Signers and known accounts are plain sets, the clock is advanced
/// manually, and notifications and events are recorded for inspection.
#[derive(Debug, Clone, Default)]
pub struct LocalHost {
    signers: BTreeSet<AccountName>,
    accounts: BTreeSet<AccountName>,
    time: BlockTimestamp,
    notified: Vec<AccountName>,
    events: Vec<LedgerEvent>,
}

impl LocalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account and adds it to the current signer set
    pub fn sign_as(&mut self, account: &str) -> &mut Self {
        self.add_account(account);
        self.signers.insert(account.to_string());
        self
    }

    pub fn clear_signers(&mut self) -> &mut Self {
        self.signers.clear();
        self
    }

    pub fn add_account(&mut self, account: &str) -> &mut Self {
        self.accounts.insert(account.to_string());
        self
    }

    pub fn set_time(&mut self, time: BlockTimestamp) -> &mut Self {
        self.time = time;
        self
    }

    /// Moves the clock one block slot forward
    pub fn advance_block(&mut self) -> &mut Self {
        self.time = self.time.next();
        self
    }

    pub fn notified(&self) -> &[AccountName] {
        &self.notified
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear_notifications(&mut self) {
        self.notified.clear();
    }
}

impl Host for LocalHost {
    fn has_auth(&self, account: &str) -> bool {
        self.signers.contains(account)
    }

    fn is_account(&self, account: &str) -> bool {
        self.accounts.contains(account)
    }

    fn current_time(&self) -> BlockTimestamp {
        self.time
    }

    fn notify(&mut self, account: &str) {
        self.notified.push(account.to_string());
    }

    fn dispatch(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_auth_checks_signers() {
        let mut host = LocalHost::new();
        host.sign_as("alice");

        assert!(host.require_auth("alice").is_ok());
        let err = host.require_auth("bob").unwrap_err();
        assert!(matches!(err, LedgerError::MissingAuthority(name) if name == "bob"));
    }

    #[test]
    fn test_signing_registers_the_account() {
        let mut host = LocalHost::new();
        host.sign_as("alice");
        host.add_account("bob");

        assert!(host.is_account("alice"));
        assert!(host.is_account("bob"));
        assert!(!host.has_auth("bob"));
        assert!(!host.is_account("carol"));
    }

    #[test]
    fn test_clock_advances_by_slots() {
        let mut host = LocalHost::new();
        host.set_time(BlockTimestamp::from_slot(7));
        host.advance_block();
        assert_eq!(host.current_time().slot(), 8);
    }
}
