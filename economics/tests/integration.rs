use economics::*;

#[test]
fn test_annual_issuance_tracks_inflation_rate() {
    // With every block claimed and no compounding, a year of rewards
    // stays within the per-block truncation loss of 1% of supply.
    let supply: u64 = 500_000_000_000_000;
    let per_block = RewardCalculator::reward_units(supply);
    let annual = per_block * constants::BLOCKS_PER_YEAR;
    let budget = supply / 100;

    assert!(annual <= budget);
    assert!(budget - annual < constants::BLOCKS_PER_YEAR);
}

#[test]
fn test_estimate_matches_per_block_reward() {
    let supply: u64 = 70_000_000_000_000;
    let estimate = RewardCalculator::estimate(supply);

    assert_eq!(estimate.per_block, RewardCalculator::reward_units(supply));
    assert_eq!(
        estimate.per_year,
        estimate.per_block * constants::BLOCKS_PER_YEAR
    );
}

#[test]
fn test_dust_supply_earns_nothing() {
    // Supplies below one minor unit per block truncate to zero across
    // the whole projection.
    let estimate = RewardCalculator::estimate(1_000_000);
    assert_eq!(estimate.per_block, 0);
    assert_eq!(estimate.per_day, 0);
    assert_eq!(estimate.per_year, 0);
}
