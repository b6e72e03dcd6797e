//! Client interfaces for the external contracts the engine calls.
//!
//! Only the entry points the engine needs are declared; any contract exposing
//! them with the same names and types can be plugged in through
//! `Collaborators`.

use bonding_errors::BondingError;
use soroban_sdk::{contractclient, Address, Env};

use crate::parameters::BondingConfig;
use crate::types::Collaborators;

#[allow(dead_code)]
#[contractclient(name = "PriceOracleClient")]
pub trait PriceOracleInterface {
    /// Price of `asset`, 1e18 scale.
    fn consult(env: Env, asset: Address) -> i128;
    /// Refresh the oracle sample from its source pool.
    fn update(env: Env);
    /// Ledger sequence of the last sample.
    fn last_update_block(env: Env) -> u64;
}

#[allow(dead_code)]
#[contractclient(name = "LiquidityPoolClient")]
pub trait LiquidityPoolInterface {
    /// Quote for burning `amount` liquidity units into coin `coin`.
    fn calc_withdraw_one_coin(env: Env, amount: i128, coin: u32) -> i128;
    /// Burn `amount` liquidity units held by the pool into coin `coin` and
    /// send the proceeds to `receiver`. Fails below `min_amount`.
    fn remove_liquidity_one_coin(
        env: Env,
        amount: i128,
        coin: u32,
        min_amount: i128,
        receiver: Address,
    ) -> i128;
}

/// Read the current oracle price, failing closed.
///
/// # Errors
/// * `OracleUnavailable` when either oracle call fails
/// * `OracleStale` for a non-positive price or a sample older than
///   `max_oracle_age` blocks
pub fn consult_price(
    e: &Env,
    collab: &Collaborators,
    cfg: &BondingConfig,
    current_block: u64,
) -> Result<i128, BondingError> {
    let oracle = PriceOracleClient::new(e, &collab.oracle);
    let price = match oracle.try_consult(&collab.price_asset) {
        Ok(Ok(price)) => price,
        _ => return Err(BondingError::OracleUnavailable),
    };
    let updated_at = match oracle.try_last_update_block() {
        Ok(Ok(block)) => block,
        _ => return Err(BondingError::OracleUnavailable),
    };
    if price <= 0 || current_block.saturating_sub(updated_at) > cfg.max_oracle_age {
        return Err(BondingError::OracleStale);
    }
    Ok(price)
}
