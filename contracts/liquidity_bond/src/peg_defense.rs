//! Peg defense.
//!
//! A manager can burn custodied liquidity units into one side of the pool to
//! push the protocol asset back toward its peg. Proceeds go to the treasury.
//! Positions and accumulators are left as they are; the shortfall shows up as
//! a pro-rata haircut on later withdrawals.

use bonding_errors::BondingError;
use soroban_sdk::{Address, Env};

use crate::access::{self, Role};
use crate::events;
use crate::interfaces::{LiquidityPoolClient, PriceOracleClient};
use crate::math;
use crate::parameters;
use crate::registry;
use crate::token_integration;

/// Pool coin index of the protocol asset.
pub const PRIMARY_COIN: u32 = 0;
/// Pool coin index of the paired asset.
pub const SECONDARY_COIN: u32 = 1;

/// Withdraw `amount` liquidity units single-sided into `coin`, send the coin
/// to the treasury and refresh the oracle. Returns the coin amount received.
///
/// # Errors
/// * `Unauthorized` unless `manager` holds `Role::Manager`
/// * `InvalidAmount` if `amount <= 0`
/// * `InsufficientCustody` if `amount` exceeds the custodied balance
/// * `PoolWithdrawalFailed` for a non-positive quote or a failed pool call
/// * `OracleUnavailable` if the oracle refresh fails
pub fn price_reset(
    e: &Env,
    manager: &Address,
    amount: i128,
    coin: u32,
) -> Result<i128, BondingError> {
    access::require_role(e, Role::Manager, manager)?;
    if amount <= 0 {
        return Err(BondingError::InvalidAmount);
    }
    let cfg = parameters::get_config(e)?;
    let collab = registry::get_collaborators(e)?;
    if amount > token_integration::custodied_balance(e, &collab) {
        return Err(BondingError::InsufficientCustody);
    }

    let pool = LiquidityPoolClient::new(e, &collab.pool);
    let quote = match pool.try_calc_withdraw_one_coin(&amount, &coin) {
        Ok(Ok(quote)) if quote > 0 => quote,
        _ => return Err(BondingError::PoolWithdrawalFailed),
    };
    let min_out = math::sub_i128(quote, math::bps(quote, cfg.max_slippage_bps)?)?;

    token_integration::transfer_from_contract(e, &collab, &collab.pool, amount)?;
    let received = match pool.try_remove_liquidity_one_coin(&amount, &coin, &min_out, &collab.treasury)
    {
        Ok(Ok(received)) => received,
        _ => return Err(BondingError::PoolWithdrawalFailed),
    };

    let oracle = PriceOracleClient::new(e, &collab.oracle);
    if !matches!(oracle.try_update(), Ok(Ok(()))) {
        return Err(BondingError::OracleUnavailable);
    }

    events::emit_price_reset(e, manager, coin, amount, received);
    Ok(received)
}
