#![cfg(test)]

use crate::duration::{duration_multiplier, duration_multiply};
use crate::math::WAD;
use crate::parameters::{DEFAULT_DURATION_RATE, MAX_DURATION_RATE, MAX_LOCK_WEEKS_CEILING};
use crate::test_helpers::*;
use bonding_errors::BondingError;
use soroban_sdk::Env;

/// Golden multipliers for one unit, to nine decimals.
const GOLDEN: [(u32, i128); 6] = [
    (0, 1_000_000_000),
    (1, 1_001_000_000),
    (6, 1_014_696_938),
    (24, 1_117_575_507),
    (52, 1_374_977_332),
    (520, 12_857_824_421),
];

fn shares_for_one_unit(weeks: u32) -> i128 {
    duration_multiply(WAD, weeks, MAX_LOCK_WEEKS_CEILING, DEFAULT_DURATION_RATE).unwrap()
}

#[test]
fn test_golden_vectors_to_nine_decimals() {
    for (weeks, expected) in GOLDEN {
        let shares = shares_for_one_unit(weeks);
        assert_eq!(shares / 1_000_000_000, expected, "weeks = {}", weeks);
    }
}

#[test]
fn test_golden_vectors_within_relative_tolerance() {
    for (weeks, expected) in GOLDEN {
        let shares = shares_for_one_unit(weeks);
        let expected_wad = expected * 1_000_000_000;
        let diff = (shares - expected_wad).abs();
        // |shares - expected| / expected <= 1e-9
        assert!(diff * 1_000_000_000 <= expected_wad, "weeks = {}", weeks);
    }
}

#[test]
fn test_zero_weeks_is_identity() {
    assert_eq!(duration_multiplier(0, DEFAULT_DURATION_RATE).unwrap(), WAD);
    for principal in [1_i128, 7, 1_000_000, PRINCIPAL, i128::MAX / 2] {
        assert_eq!(
            duration_multiply(principal, 0, 208, DEFAULT_DURATION_RATE).unwrap(),
            principal
        );
    }
}

#[test]
fn test_multiplier_grows_with_weeks() {
    let mut previous = duration_multiplier(0, DEFAULT_DURATION_RATE).unwrap();
    for weeks in 1..=MAX_LOCK_WEEKS_CEILING {
        let current = duration_multiplier(weeks, DEFAULT_DURATION_RATE).unwrap();
        assert!(current > previous, "weeks = {}", weeks);
        previous = current;
    }
}

#[test]
fn test_rounds_down() {
    // 3 * 1.001 = 3.003 -> 3
    assert_eq!(duration_multiply(3, 1, 208, DEFAULT_DURATION_RATE).unwrap(), 3);
    assert_eq!(
        duration_multiply(PRINCIPAL, 1, 208, DEFAULT_DURATION_RATE).unwrap(),
        PRINCIPAL_ONE_WEEK_SHARES
    );
}

#[test]
fn test_zero_rate_gives_principal() {
    assert_eq!(duration_multiply(PRINCIPAL, 208, 208, 0).unwrap(), PRINCIPAL);
}

#[test]
fn test_weeks_above_max_rejected() {
    assert_eq!(
        duration_multiply(PRINCIPAL, 209, 208, DEFAULT_DURATION_RATE),
        Err(BondingError::MaxDurationExceeded)
    );
    assert!(duration_multiply(PRINCIPAL, 208, 208, DEFAULT_DURATION_RATE).is_ok());
}

#[test]
fn test_non_positive_principal_rejected() {
    assert_eq!(
        duration_multiply(0, 1, 208, DEFAULT_DURATION_RATE),
        Err(BondingError::InvalidAmount)
    );
    assert_eq!(
        duration_multiply(-5, 1, 208, DEFAULT_DURATION_RATE),
        Err(BondingError::InvalidAmount)
    );
}

#[test]
fn test_large_principal_does_not_overflow_at_ceiling() {
    let principal = 1_000_000_000_000_000_000_000_000_000_i128;
    let shares = duration_multiply(principal, 520, 520, DEFAULT_DURATION_RATE).unwrap();
    assert!(shares > principal * 12);
}

#[test]
fn test_contract_query_uses_configured_rate() {
    let e = Env::default();
    let s = setup(&e);

    assert_eq!(
        s.client.duration_multiply(&PRINCIPAL, &1),
        PRINCIPAL_ONE_WEEK_SHARES
    );
    assert_eq!(
        s.client.try_duration_multiply(&PRINCIPAL, &209),
        Err(Ok(BondingError::MaxDurationExceeded))
    );

    let rate = s.client.get_config().duration_rate;
    assert_eq!(
        s.client.duration_multiply(&PRINCIPAL, &52),
        duration_multiply(PRINCIPAL, 52, 208, rate).unwrap()
    );
}

#[test]
fn test_max_rate_at_ceiling_with_fractional_principal() {
    // Multiplier is ~1.19e21 here, so principal * multiplier leaves i128.
    assert_eq!(
        duration_multiply(WAD * 3 / 2, 520, 520, MAX_DURATION_RATE),
        Ok(1_780_173_663_154_596_000_000)
    );
    assert_eq!(
        duration_multiply(100_700_000_000_000_000_123, 520, 520, MAX_DURATION_RATE),
        Ok(119_508_991_919_778_544_945_974)
    );
    assert_eq!(
        duration_multiply(WAD - 1, 520, 520, MAX_DURATION_RATE),
        Ok(1_186_782_442_103_063_998_813)
    );
}
