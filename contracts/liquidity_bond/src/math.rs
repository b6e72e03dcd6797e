//! Overflow-safe fixed-point arithmetic for reward and share calculations.
//!
//! Every helper returns `BondingError::Overflow` or
//! `BondingError::DivisionByZero` instead of wrapping or panicking, so callers
//! can propagate with `?`.

use bonding_errors::BondingError;

/// Accumulator scale for reward-per-share values.
pub const ACC_PRECISION: i128 = 1_000_000_000_000;

/// 18-decimal fixed-point one (multipliers, prices, rates).
pub const WAD: i128 = 1_000_000_000_000_000_000;

/// Basis-point denominator.
pub const BPS_DENOMINATOR: i128 = 10_000;

#[inline]
pub fn add_i128(a: i128, b: i128) -> Result<i128, BondingError> {
    a.checked_add(b).ok_or(BondingError::Overflow)
}

#[inline]
pub fn sub_i128(a: i128, b: i128) -> Result<i128, BondingError> {
    a.checked_sub(b).ok_or(BondingError::Overflow)
}

#[inline]
pub fn mul_i128(a: i128, b: i128) -> Result<i128, BondingError> {
    a.checked_mul(b).ok_or(BondingError::Overflow)
}

#[inline]
pub fn div_i128(a: i128, b: i128) -> Result<i128, BondingError> {
    if b == 0 {
        return Err(BondingError::DivisionByZero);
    }
    a.checked_div(b).ok_or(BondingError::Overflow)
}

#[inline]
pub fn add_u64(a: u64, b: u64) -> Result<u64, BondingError> {
    a.checked_add(b).ok_or(BondingError::Overflow)
}

#[inline]
pub fn mul_u64(a: u64, b: u64) -> Result<u64, BondingError> {
    a.checked_mul(b).ok_or(BondingError::Overflow)
}

/// `floor(a * b / d)` for non-negative operands.
///
/// When the direct product overflows, `a` is split around `d` and, if the
/// remainder product still overflows, `b` is split as well. The result is
/// exact whenever it fits in `i128` and `(d - 1)^2` does.
pub fn mul_div_floor(a: i128, b: i128, d: i128) -> Result<i128, BondingError> {
    if d == 0 {
        return Err(BondingError::DivisionByZero);
    }
    if let Some(product) = a.checked_mul(b) {
        return Ok(product / d);
    }
    let whole = mul_i128(a / d, b)?;
    let r = a % d;
    let rest = match r.checked_mul(b) {
        Some(product) => product / d,
        // r * b = r * (b / d) * d + r * (b % d)
        None => add_i128(mul_i128(r, b / d)?, mul_i128(r, b % d)? / d)?,
    };
    add_i128(whole, rest)
}

/// Basis-point share of an amount: `amount * bps / 10_000`, rounded down.
pub fn bps(amount: i128, bps: u32) -> Result<i128, BondingError> {
    mul_div_floor(amount, bps as i128, BPS_DENOMINATOR)
}

/// Integer square root, rounded down.
pub fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = (x >> 1) + (x & 1);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}
