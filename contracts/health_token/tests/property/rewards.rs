//! Properties of the reward arithmetic.
//!
//! Invariants tested:
//! - Reward is non-decreasing in elapsed days for non-negative stake
//! - Reward is non-decreasing in stake, health score and completed predictions
//! - Splitting an accrual period never yields more than accruing it at once

use common::ComplianceCounts;
use health_token::rewards::{accrued_reward, apy_bps};
use proptest::prelude::*;

fn counts(total: u32, completed: u32) -> ComplianceCounts {
    ComplianceCounts {
        total,
        completed: completed.min(total),
    }
}

proptest! {
    #[test]
    fn prop_reward_monotonic_in_days(
        staked in 0i128..=1_000_000_000_000i128,
        days in 0u64..=3_650u64,
        extra in 0u64..=365u64,
        score in 0u32..=100u32,
        total in 0u32..=50u32,
        completed in 0u32..=50u32,
    ) {
        let c = counts(total, completed);
        let shorter = accrued_reward(staked, days, score, &c).unwrap();
        let longer = accrued_reward(staked, days + extra, score, &c).unwrap();
        prop_assert!(longer >= shorter);
        prop_assert!(shorter >= 0);
    }

    #[test]
    fn prop_reward_monotonic_in_inputs(
        staked in 0i128..=1_000_000_000_000i128,
        more in 0i128..=1_000_000i128,
        days in 0u64..=3_650u64,
        score in 0u32..=99u32,
        total in 1u32..=50u32,
        completed in 0u32..=49u32,
    ) {
        let c = counts(total, completed);
        let base = accrued_reward(staked, days, score, &c).unwrap();

        prop_assert!(accrued_reward(staked + more, days, score, &c).unwrap() >= base);
        prop_assert!(accrued_reward(staked, days, score + 1, &c).unwrap() >= base);
        let better = counts(total, (completed + 1).min(total));
        prop_assert!(accrued_reward(staked, days, score, &better).unwrap() >= base);
        prop_assert!(apy_bps(score, &better).unwrap() >= apy_bps(score, &c).unwrap());
    }

    #[test]
    fn prop_split_period_never_exceeds_whole(
        staked in 0i128..=1_000_000_000_000i128,
        first in 0u64..=1_000u64,
        second in 0u64..=1_000u64,
        score in 0u32..=100u32,
    ) {
        let c = counts(0, 0);
        let split = accrued_reward(staked, first, score, &c).unwrap()
            + accrued_reward(staked, second, score, &c).unwrap();
        let whole = accrued_reward(staked, first + second, score, &c).unwrap();
        prop_assert!(split <= whole);
    }
}
