//! Risk banding for model outputs. Scores are basis points (10_000 = 100 %).

use common::SECONDS_PER_DAY;
use soroban_sdk::contracttype;

pub const MAX_BPS: u32 = 10_000;

const MODERATE_FROM_BPS: u32 = 3_000;
const HIGH_FROM_BPS: u32 = 7_000;

/// Confidence at or above which a prediction counts as high risk.
pub const HIGH_CONFIDENCE_BPS: u32 = 8_000;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

pub fn risk_level(risk_score_bps: u32) -> RiskLevel {
    if risk_score_bps < MODERATE_FROM_BPS {
        RiskLevel::Low
    } else if risk_score_bps < HIGH_FROM_BPS {
        RiskLevel::Moderate
    } else {
        RiskLevel::High
    }
}

/// Days until the next recommended checkup.
///
/// The bands are exclusive at their lower edge, unlike [`risk_level`]: a
/// score of exactly 70 % is `High` risk but still gets the 30-day checkup.
pub fn checkup_interval_days(risk_score_bps: u32) -> u64 {
    if risk_score_bps > HIGH_FROM_BPS {
        7
    } else if risk_score_bps > MODERATE_FROM_BPS {
        30
    } else {
        90
    }
}

pub fn default_next_checkup(now: u64, risk_score_bps: u32) -> u64 {
    now.saturating_add(checkup_interval_days(risk_score_bps).saturating_mul(SECONDS_PER_DAY))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_risk_levels() {
        assert_eq!(risk_level(0), RiskLevel::Low);
        assert_eq!(risk_level(2_999), RiskLevel::Low);
        assert_eq!(risk_level(3_000), RiskLevel::Moderate);
        assert_eq!(risk_level(6_999), RiskLevel::Moderate);
        assert_eq!(risk_level(7_000), RiskLevel::High);
        assert_eq!(risk_level(MAX_BPS), RiskLevel::High);
    }

    #[test]
    fn checkup_bands_are_exclusive() {
        assert_eq!(checkup_interval_days(3_000), 90);
        assert_eq!(checkup_interval_days(3_001), 30);
        assert_eq!(checkup_interval_days(7_000), 30);
        assert_eq!(checkup_interval_days(7_001), 7);
        assert_eq!(default_next_checkup(100, 9_000), 100 + 7 * SECONDS_PER_DAY);
    }
}
