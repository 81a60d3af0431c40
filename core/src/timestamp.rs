//! Block timestamps
//!
//! Time is measured in half-second block slots since the Unix epoch.
//! The mining gate compares slots, never wall-clock instants, so two
//! claims inside one slot are indistinguishable by construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use economics::constants::BLOCK_INTERVAL_MS;

/// A block slot index since the Unix epoch
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BlockTimestamp(u32);

impl BlockTimestamp {
    pub const fn from_slot(slot: u32) -> Self {
        BlockTimestamp(slot)
    }

    pub const fn slot(&self) -> u32 {
        self.0
    }

    /// Truncates a millisecond wall-clock reading down to its slot.
    pub fn from_unix_millis(millis: u64) -> Self {
        BlockTimestamp((millis / BLOCK_INTERVAL_MS) as u32)
    }

    pub fn to_unix_millis(&self) -> u64 {
        self.0 as u64 * BLOCK_INTERVAL_MS
    }

    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self::from_unix_millis(datetime.timestamp_millis().max(0) as u64)
    }

    /// Current wall-clock slot, for hosts driven by real time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// The next slot, saturating at the representation limit.
    pub fn next(&self) -> Self {
        BlockTimestamp(self.0.saturating_add(1))
    }
}
