//! Reward accrual arithmetic.
//!
//! The annual rate is
//!
//! ```text
//! rate = 0.10 + health_score * 0.01 + (completed / total) * 0.05
//! ```
//!
//! with the compliance term dropped when `total == 0`. Rewards are simple
//! interest over whole elapsed days:
//!
//! ```text
//! reward = staked * rate / 365 * days
//! ```
//!
//! Everything is evaluated as one rational number over integers and
//! truncated once at the end, so no precision is lost between steps.

use common::{ComplianceCounts, SECONDS_PER_DAY};

const BASE_RATE_PCT: i128 = 10;
const COMPLIANCE_BONUS_PCT: i128 = 5;
const DAYS_PER_YEAR: i128 = 365;
const PERCENT: i128 = 100;
const BPS_PER_PERCENT: i128 = 100;

/// Whole days between two timestamps; zero if `now` is not after `last`.
pub fn days_elapsed(last: u64, now: u64) -> u64 {
    now.saturating_sub(last) / SECONDS_PER_DAY
}

/// The annual rate as `numerator / denominator`.
///
/// Over a common denominator of `100 * total`:
/// `total * (10 + health_score) + 5 * completed`.
pub fn annual_rate(health_score: u32, counts: &ComplianceCounts) -> (i128, i128) {
    let (total, completed) = if counts.total == 0 {
        (1, 0)
    } else {
        (i128::from(counts.total), i128::from(counts.completed))
    };
    let numerator = total * (BASE_RATE_PCT + i128::from(health_score))
        + COMPLIANCE_BONUS_PCT * completed;
    (numerator, PERCENT * total)
}

/// Annual rate in basis points, truncated.
///
/// Returns `None` when the rate does not fit in a `u32`.
pub fn apy_bps(health_score: u32, counts: &ComplianceCounts) -> Option<u32> {
    let (num, den) = annual_rate(health_score, counts);
    let bps = num
        .checked_mul(PERCENT * BPS_PER_PERCENT)?
        .checked_div(den)?;
    u32::try_from(bps).ok()
}

/// Reward for holding `staked` for `days` whole days.
///
/// Returns `None` on overflow.
pub fn accrued_reward(
    staked: i128,
    days: u64,
    health_score: u32,
    counts: &ComplianceCounts,
) -> Option<i128> {
    if staked <= 0 || days == 0 {
        return Some(0);
    }
    let (num, den) = annual_rate(health_score, counts);
    staked
        .checked_mul(i128::from(days))?
        .checked_mul(num)?
        .checked_div(den.checked_mul(DAYS_PER_YEAR)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(total: u32, completed: u32) -> ComplianceCounts {
        ComplianceCounts { total, completed }
    }

    #[test]
    fn base_rate_without_score_or_predictions() {
        // 10 % of 365_000 over 365 days.
        assert_eq!(accrued_reward(365_000, 365, 0, &counts(0, 0)), Some(36_500));
        assert_eq!(apy_bps(0, &counts(0, 0)), Some(1_000));
    }

    #[test]
    fn health_score_and_compliance_raise_the_rate() {
        // 0.10 + 0.80 + 0.5 * 0.05 = 0.925
        assert_eq!(apy_bps(80, &counts(2, 1)), Some(9_250));
        assert_eq!(accrued_reward(365_000, 10, 80, &counts(2, 1)), Some(9_250));
        // Full compliance adds the whole 5 %.
        assert_eq!(apy_bps(0, &counts(4, 4)), Some(1_500));
    }

    #[test]
    fn truncates_once() {
        // 1 * 0.10 / 365 * 1 would round to zero at every step; over 3650
        // days the exact result is 1.
        assert_eq!(accrued_reward(1, 1, 0, &counts(0, 0)), Some(0));
        assert_eq!(accrued_reward(1, 3_650, 0, &counts(0, 0)), Some(1));
    }

    #[test]
    fn zero_inputs_accrue_nothing() {
        assert_eq!(accrued_reward(0, 100, 50, &counts(1, 1)), Some(0));
        assert_eq!(accrued_reward(1_000, 0, 50, &counts(1, 1)), Some(0));
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(accrued_reward(i128::MAX, 2, 100, &counts(1, 1)), None);
    }

    #[test]
    fn out_of_range_score_is_not_clamped() {
        // (0.10 + 4_294_967_295 * 0.01) in bps does not fit a u32.
        assert_eq!(apy_bps(u32::MAX, &counts(0, 0)), None);
        assert_eq!(apy_bps(100, &counts(0, 0)), Some(11_000));
    }

    #[test]
    fn counts_whole_days_only() {
        assert_eq!(days_elapsed(0, SECONDS_PER_DAY - 1), 0);
        assert_eq!(days_elapsed(0, 2 * SECONDS_PER_DAY + 5), 2);
        assert_eq!(days_elapsed(100, 50), 0);
    }
}
