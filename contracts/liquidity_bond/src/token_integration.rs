//! Token plumbing for the liquidity unit and the reward asset.
//! Centralizes allowance checks, custody transfers and reward minting.

use bonding_errors::BondingError;
use soroban_sdk::token::{StellarAssetClient, TokenClient};
use soroban_sdk::{Address, Env};

use crate::math;
use crate::types::Collaborators;

fn liquidity_client<'a>(e: &'a Env, collab: &Collaborators) -> TokenClient<'a> {
    TokenClient::new(e, &collab.liquidity_token)
}

/// Liquidity units currently held by the engine.
pub fn custodied_balance(e: &Env, collab: &Collaborators) -> i128 {
    liquidity_client(e, collab).balance(&e.current_contract_address())
}

/// Check that `owner` approved the engine for at least `amount`.
pub fn require_allowance(
    e: &Env,
    collab: &Collaborators,
    owner: &Address,
    amount: i128,
) -> Result<(), BondingError> {
    let allowance = liquidity_client(e, collab).allowance(owner, &e.current_contract_address());
    if allowance < amount {
        return Err(BondingError::InsufficientAllowance);
    }
    Ok(())
}

/// Pull `amount` liquidity units from `owner` into custody.
/// Requires prior approval with the engine as spender.
pub fn transfer_into_contract(
    e: &Env,
    collab: &Collaborators,
    owner: &Address,
    amount: i128,
) -> Result<(), BondingError> {
    if amount < 0 {
        return Err(BondingError::InvalidAmount);
    }
    if amount == 0 {
        return Ok(());
    }
    require_allowance(e, collab, owner, amount)?;
    let contract = e.current_contract_address();
    liquidity_client(e, collab).transfer_from(&contract, owner, &contract, &amount);
    Ok(())
}

/// Send `amount` liquidity units out of custody.
pub fn transfer_from_contract(
    e: &Env,
    collab: &Collaborators,
    recipient: &Address,
    amount: i128,
) -> Result<(), BondingError> {
    if amount < 0 {
        return Err(BondingError::InvalidAmount);
    }
    if amount == 0 {
        return Ok(());
    }
    let contract = e.current_contract_address();
    liquidity_client(e, collab).transfer(&contract, recipient, &amount);
    Ok(())
}

/// Mint `amount` reward tokens to `recipient` and, when `treasury_divider`
/// is non-zero, `amount / treasury_divider` on top to the treasury.
///
/// Returns the treasury share.
pub fn mint_reward(
    e: &Env,
    collab: &Collaborators,
    recipient: &Address,
    amount: i128,
    treasury_divider: u32,
) -> Result<i128, BondingError> {
    if amount <= 0 {
        return Ok(0);
    }
    let reward = StellarAssetClient::new(e, &collab.reward_token);
    reward.mint(recipient, &amount);
    if treasury_divider == 0 {
        return Ok(0);
    }
    let treasury_share = math::div_i128(amount, treasury_divider as i128)?;
    if treasury_share > 0 {
        reward.mint(&collab.treasury, &treasury_share);
    }
    Ok(treasury_share)
}
