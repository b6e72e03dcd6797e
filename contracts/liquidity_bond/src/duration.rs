//! Lock-duration share weighting.
//!
//! A position locked for `w` weeks receives
//! `shares = principal * (1 + rate * w^(3/2))`, computed in 18-decimal fixed
//! point and always rounded down. With the default rate of 0.001 one unit
//! locked for 52 weeks is worth 1.374977332 shares, and for 520 weeks
//! 12.857824421 shares.
//!
//! `w^(3/2)` is evaluated as `w * isqrt(w * 1e24) / 1e12`, which is exact to
//! 1e-12 per week and stays inside `i128` up to the ten-year ceiling.

use bonding_errors::BondingError;

use crate::math::{self, WAD};

/// Fixed-point scale of the square-root term.
const SQRT_PRECISION: u128 = 1_000_000_000_000;

/// Share multiplier for a lock of `weeks`, scaled by 1e18.
///
/// `weeks == 0` yields exactly `WAD`.
pub fn duration_multiplier(weeks: u32, rate: i128) -> Result<i128, BondingError> {
    if weeks == 0 {
        return Ok(WAD);
    }
    let weeks_scaled = (weeks as u128) * SQRT_PRECISION * SQRT_PRECISION;
    let root = math::isqrt(weeks_scaled) as i128;
    let weighted = math::mul_i128(math::mul_i128(rate, weeks as i128)?, root)?;
    let bonus = math::div_i128(weighted, SQRT_PRECISION as i128)?;
    math::add_i128(WAD, bonus)
}

/// Duration-weighted shares for `principal` locked `weeks`.
///
/// # Errors
/// * `InvalidAmount` if `principal <= 0`
/// * `MaxDurationExceeded` if `weeks > max_weeks`
pub fn duration_multiply(
    principal: i128,
    weeks: u32,
    max_weeks: u32,
    rate: i128,
) -> Result<i128, BondingError> {
    if principal <= 0 {
        return Err(BondingError::InvalidAmount);
    }
    if weeks > max_weeks {
        return Err(BondingError::MaxDurationExceeded);
    }
    let multiplier = duration_multiplier(weeks, rate)?;
    math::mul_div_floor(principal, multiplier, WAD)
}
