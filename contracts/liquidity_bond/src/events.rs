use soroban_sdk::{Address, Env, Symbol};

use crate::access::Role;
use crate::parameters::BondingConfig;
use crate::types::Collaborators;

/// Emitted when the engine is initialised.
///
/// # Topics
/// * `Symbol` - "initialized"
/// * `Address` - The initial owner
///
/// # Data
/// * `u32` - Number of legacy holders in the snapshot
/// * `i128` - Total legacy principal awaiting migration
pub fn emit_initialized(e: &Env, owner: &Address, legacy_holders: u32, lp_to_migrate: i128) {
    let topics = (Symbol::new(e, "initialized"), owner.clone());
    e.events().publish(topics, (legacy_holders, lp_to_migrate));
}

/// Emitted when a position is opened by deposit, mint or migration.
///
/// # Topics
/// * `Symbol` - "bond_created"
/// * `Address` - The position owner
///
/// # Data
/// * `u64` - Position id
/// * `i128` - Principal
/// * `u32` - Lock weeks
/// * `i128` - Duration-weighted shares
/// * `u64` - Maturity block
pub fn emit_bond_created(
    e: &Env,
    owner: &Address,
    id: u64,
    principal: i128,
    lock_weeks: u32,
    shares: i128,
    maturity_block: u64,
) {
    let topics = (Symbol::new(e, "bond_created"), owner.clone());
    let data = (id, principal, lock_weeks, shares, maturity_block);
    e.events().publish(topics, data);
}

/// Emitted when a matured position is topped up.
///
/// # Topics
/// * `Symbol` - "liquidity_added"
/// * `Address` - The position owner
///
/// # Data
/// * `u64` - Position id
/// * `i128` - Amount transferred in
/// * `i128` - Bonus liquidity compounded into principal
/// * `i128` - New principal
pub fn emit_liquidity_added(
    e: &Env,
    owner: &Address,
    id: u64,
    amount: i128,
    compounded: i128,
    new_principal: i128,
) {
    let topics = (Symbol::new(e, "liquidity_added"), owner.clone());
    e.events().publish(topics, (id, amount, compounded, new_principal));
}

/// Emitted when principal leaves a position.
///
/// # Topics
/// * `Symbol` - "liquidity_removed"
/// * `Address` - The position owner
///
/// # Data
/// * `u64` - Position id
/// * `i128` - Principal removed
/// * `i128` - Liquidity units transferred
/// * `i128` - Remaining principal
pub fn emit_liquidity_removed(
    e: &Env,
    owner: &Address,
    id: u64,
    removed: i128,
    transferred: i128,
    remaining: i128,
) {
    let topics = (Symbol::new(e, "liquidity_removed"), owner.clone());
    e.events().publish(topics, (id, removed, transferred, remaining));
}

/// Emitted whenever base emission is paid for a position.
///
/// # Topics
/// * `Symbol` - "rewards_claimed"
/// * `Address` - The recipient
///
/// # Data
/// * `u64` - Position id
/// * `i128` - Reward minted to the recipient
/// * `i128` - Treasury share minted on top
pub fn emit_rewards_claimed(e: &Env, recipient: &Address, id: u64, reward: i128, treasury: i128) {
    let topics = (Symbol::new(e, "rewards_claimed"), recipient.clone());
    e.events().publish(topics, (id, reward, treasury));
}

pub fn emit_position_transferred(e: &Env, from: &Address, to: &Address, id: u64) {
    let topics = (Symbol::new(e, "position_transferred"), from.clone());
    e.events().publish(topics, (id, to.clone()));
}

/// Emitted when a legacy holder migrates.
///
/// # Topics
/// * `Symbol` - "migrated"
/// * `Address` - The legacy holder
///
/// # Data
/// * `u64` - New position id
/// * `i128` - Migrated principal
/// * `u32` - Lock weeks carried over
pub fn emit_migrated(e: &Env, holder: &Address, id: u64, principal: i128, lock_weeks: u32) {
    let topics = (Symbol::new(e, "migrated"), holder.clone());
    e.events().publish(topics, (id, principal, lock_weeks));
}

/// Emitted after a single-sided pool withdrawal.
///
/// # Topics
/// * `Symbol` - "price_reset"
/// * `Address` - The manager that triggered it
///
/// # Data
/// * `u32` - Coin index withdrawn
/// * `i128` - Liquidity units burned
/// * `i128` - Coin amount received by the treasury
pub fn emit_price_reset(e: &Env, manager: &Address, coin: u32, amount: i128, received: i128) {
    let topics = (Symbol::new(e, "price_reset"), manager.clone());
    e.events().publish(topics, (coin, amount, received));
}

/// Emitted when an oracle sample moves the emission multiplier.
///
/// # Data
/// * `i128` - Oracle price
/// * `i128` - New multiplier
pub fn emit_multiplier_updated(e: &Env, price: i128, multiplier: i128) {
    let topics = (Symbol::new(e, "multiplier_updated"),);
    e.events().publish(topics, (price, multiplier));
}

/// Emitted when bonus liquidity inflow is distributed.
///
/// # Data
/// * `i128` - Newly recognised amount
/// * `i128` - Bonus liquidity outstanding
pub fn emit_lp_rewards_recognized(e: &Env, amount: i128, outstanding: i128) {
    let topics = (Symbol::new(e, "lp_rewards_recognized"),);
    e.events().publish(topics, (amount, outstanding));
}

/// Emitted on any successful parameter write.
///
/// # Topics
/// * `Symbol` - "config_updated"
/// * `Address` - The manager
///
/// # Data
/// * `BondingConfig` - The full configuration after the write
pub fn emit_config_updated(e: &Env, manager: &Address, cfg: &BondingConfig) {
    let topics = (Symbol::new(e, "config_updated"), manager.clone());
    e.events().publish(topics, cfg.clone());
}

/// Emitted when the owner replaces the collaborator addresses.
///
/// # Topics
/// * `Symbol` - "collaborators_updated"
/// * `Address` - The owner
///
/// # Data
/// * `Collaborators` - The new addresses
pub fn emit_collaborators_updated(e: &Env, owner: &Address, collaborators: &Collaborators) {
    let topics = (Symbol::new(e, "collaborators_updated"), owner.clone());
    e.events().publish(topics, collaborators.clone());
}

pub fn emit_reward_rate_updated(e: &Env, manager: &Address, old_rate: i128, new_rate: i128) {
    let topics = (Symbol::new(e, "reward_rate_updated"), manager.clone());
    e.events().publish(topics, (old_rate, new_rate));
}

pub fn emit_role_granted(e: &Env, role: Role, who: &Address) {
    let topics = (Symbol::new(e, "role_granted"), who.clone());
    e.events().publish(topics, role);
}

pub fn emit_role_revoked(e: &Env, role: Role, who: &Address) {
    let topics = (Symbol::new(e, "role_revoked"), who.clone());
    e.events().publish(topics, role);
}

pub fn emit_paused(e: &Env, manager: &Address) {
    e.events()
        .publish((Symbol::new(e, "paused"), manager.clone()), e.ledger().sequence());
}

pub fn emit_unpaused(e: &Env, manager: &Address) {
    e.events()
        .publish((Symbol::new(e, "unpaused"), manager.clone()), e.ledger().sequence());
}

pub fn emit_migrating_set(e: &Env, manager: &Address, migrating: bool) {
    let topics = (Symbol::new(e, "migrating_set"), manager.clone());
    e.events().publish(topics, migrating);
}
