//! Mining reward calculation
//!
//! The annual inflation budget is split evenly across every block in a
//! year and truncated to whole minor units. Supplies too small for one
//! minor unit per block yield a zero reward.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BLOCKS_PER_DAY, BLOCKS_PER_YEAR, INFLATION_DENOMINATOR, INFLATION_NUMERATOR,
};

/// Projected mining yield for a given supply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEstimate {
    pub per_block: u64,
    pub per_day: u64,
    pub per_year: u64,
}

/// Pure per-block reward calculator
pub struct RewardCalculator;

impl RewardCalculator {
    /// Per-block reward in minor units for the given circulating supply.
    ///
    /// Computed as `supply * rate / blocks_per_year` in one truncating
    /// u128 division so the result cannot depend on platform float
    /// behavior.
    pub fn reward_units(supply_units: u64) -> u64 {
        let divisor = INFLATION_DENOMINATOR as u128 * BLOCKS_PER_YEAR as u128;
        let reward = supply_units as u128 * INFLATION_NUMERATOR as u128 / divisor;
        reward as u64
    }

    /// Yield projection at the current supply, assuming every block is
    /// claimed and ignoring compounding.
    pub fn estimate(supply_units: u64) -> RewardEstimate {
        let per_block = Self::reward_units(supply_units);
        RewardEstimate {
            per_block,
            per_day: per_block.saturating_mul(BLOCKS_PER_DAY),
            per_year: per_block.saturating_mul(BLOCKS_PER_YEAR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One minor unit per block requires rate_denominator * blocks_per_year
    // units of supply.
    const UNIT_THRESHOLD: u64 = 6_307_200_000;

    #[test]
    fn test_reward_truncates_to_zero_below_threshold() {
        assert_eq!(RewardCalculator::reward_units(0), 0);
        assert_eq!(RewardCalculator::reward_units(1_000_000), 0);
        assert_eq!(RewardCalculator::reward_units(UNIT_THRESHOLD - 1), 0);
    }

    #[test]
    fn test_reward_steps_at_threshold_multiples() {
        assert_eq!(RewardCalculator::reward_units(UNIT_THRESHOLD), 1);
        assert_eq!(RewardCalculator::reward_units(2 * UNIT_THRESHOLD - 1), 1);
        assert_eq!(RewardCalculator::reward_units(2 * UNIT_THRESHOLD), 2);
    }

    #[test]
    fn test_reward_for_large_supplies() {
        // 1,000,000,000.0000 at precision 4
        assert_eq!(RewardCalculator::reward_units(10_000_000_000_000), 1585);
        // No overflow anywhere in the u64 domain
        assert_eq!(RewardCalculator::reward_units(u64::MAX), 2_924_712_086);
    }

    #[test]
    fn test_estimate_scales_per_block_yield() {
        let estimate = RewardCalculator::estimate(10_000_000_000_000);
        assert_eq!(estimate.per_block, 1585);
        assert_eq!(estimate.per_day, 1585 * 172_800);
        assert_eq!(estimate.per_year, 1585 * 63_072_000);
    }

    #[test]
    fn test_estimate_serializes() {
        let estimate = RewardCalculator::estimate(UNIT_THRESHOLD);
        let json = serde_json::to_string(&estimate).unwrap();
        let back: RewardEstimate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, estimate);
    }
}
