//! Liquidity Bond Contract
//!
//! Time-locked bonding of pooled liquidity units. Depositors lock liquidity
//! for a number of weeks and receive a position whose emission shares grow
//! with the lock length. Two reward streams accrue per position:
//!
//! - **Base emission** in the reward asset, minted on settlement. Distributed
//!   over duration-weighted shares; the emission rate follows the oracle price
//!   of the protocol asset.
//! - **Bonus liquidity**: liquidity units that arrive in custody beyond what
//!   the engine owes, distributed pro rata to principal.
//!
//! Holders of the legacy bonding scheme migrate once into a position, and a
//! manager can burn custodied liquidity single-sided into the pool to defend
//! the peg.
//!
//! ## Key design decisions
//!
//! - **O(1) settlement**: running accumulators with per-position debts.
//! - **Fail-closed oracle**: a missing or stale sample aborts the operation.
//! - **External calls last**: oracle and balance reads precede writes, token
//!   transfers and mints follow them.
//! - **Explicit capabilities**: `Role::{Owner, Manager, MinterAuthority,
//!   BurnerAuthority}` checked per privileged call.

#![no_std]

pub mod access;
pub mod duration;
pub mod events;
pub mod interfaces;
pub mod lp_rewards;
pub mod math;
pub mod migration;
pub mod parameters;
pub mod pausable;
pub mod peg_defense;
pub mod registry;
pub mod rewards;
pub mod token_integration;
pub mod types;

use bonding_errors::BondingError;
use soroban_sdk::{contract, contractimpl, Address, Env, Vec};

use access::Role;
use parameters::BondingConfig;
use types::{
    BondPosition, Collaborators, DataKey, LegacyEntry, LegacyRecord, LpPool, MigrationState,
    RewardPool, WithdrawalReceipt,
};

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
mod test_duration;
#[cfg(test)]
mod test_pausable;

// ─── Helpers ───────────────────────────────────────────────────────────────

/// Apply `update` to the stored config, validate and emit.
///
/// `duration_rate` is fixed at `initialize`: stored shares are derived from
/// it, so an update that changes it fails with `InvalidConfig`.
fn update_config_with<F>(e: &Env, manager: &Address, update: F) -> Result<BondingConfig, BondingError>
where
    F: FnOnce(&mut BondingConfig),
{
    access::require_role(e, Role::Manager, manager)?;
    let mut cfg = parameters::get_config(e)?;
    let duration_rate = cfg.duration_rate;
    update(&mut cfg);
    if cfg.duration_rate != duration_rate {
        return Err(BondingError::InvalidConfig);
    }
    parameters::set_config(e, &cfg)?;
    events::emit_config_updated(e, manager, &cfg);
    Ok(cfg)
}

// ─── Contract ──────────────────────────────────────────────────────────────

#[contract]
pub struct LiquidityBond;

#[contractimpl]
impl LiquidityBond {
    // ── Setup ──────────────────────────────────────────────────────────────

    /// One-time initialization.
    ///
    /// `owner` receives `Owner` and `Manager`. `legacy` is the immutable
    /// snapshot of the previous bonding scheme; its total principal must
    /// already be (or be about to be) in custody, and opens the migration
    /// window.
    pub fn initialize(
        e: Env,
        owner: Address,
        collaborators: Collaborators,
        config: BondingConfig,
        reward_per_block: i128,
        legacy: Vec<LegacyEntry>,
    ) -> Result<(), BondingError> {
        if e.storage().instance().has(&DataKey::Config) {
            return Err(BondingError::AlreadyInitialized);
        }
        owner.require_auth();
        if reward_per_block < 0 {
            return Err(BondingError::InvalidConfig);
        }
        parameters::set_config(&e, &config)?;
        e.storage()
            .instance()
            .set(&DataKey::Collaborators, &collaborators);

        let lp_to_migrate = migration::load_snapshot(&e, &config, &legacy)?;
        let block = registry::current_block(&e);
        rewards::store(&e, &RewardPool::new(reward_per_block, block));
        lp_rewards::store(&e, &LpPool::new(lp_to_migrate));

        access::set_role(&e, Role::Owner, &owner);
        access::set_role(&e, Role::Manager, &owner);
        e.storage()
            .instance()
            .extend_ttl(registry::BUMP_THRESHOLD, registry::BUMP_TARGET);

        events::emit_initialized(&e, &owner, legacy.len(), lp_to_migrate);
        Ok(())
    }

    /// Replace the collaborator addresses. Owner only.
    pub fn set_collaborators(
        e: Env,
        owner: Address,
        collaborators: Collaborators,
    ) -> Result<(), BondingError> {
        access::require_role(&e, Role::Owner, &owner)?;
        e.storage()
            .instance()
            .set(&DataKey::Collaborators, &collaborators);
        events::emit_collaborators_updated(&e, &owner, &collaborators);
        Ok(())
    }

    // ── Roles ──────────────────────────────────────────────────────────────

    pub fn grant_role(e: Env, owner: Address, role: Role, who: Address) -> Result<(), BondingError> {
        access::grant_role(&e, &owner, role, &who)
    }

    pub fn revoke_role(
        e: Env,
        owner: Address,
        role: Role,
        who: Address,
    ) -> Result<(), BondingError> {
        access::revoke_role(&e, &owner, role, &who)
    }

    pub fn has_role(e: Env, role: Role, who: Address) -> bool {
        access::has_role(&e, role, &who)
    }

    // ── Parameters ─────────────────────────────────────────────────────────

    pub fn set_blocks_per_week(
        e: Env,
        manager: Address,
        blocks_per_week: u64,
    ) -> Result<(), BondingError> {
        update_config_with(&e, &manager, |cfg| cfg.blocks_per_week = blocks_per_week)?;
        Ok(())
    }

    pub fn set_max_lock_weeks(
        e: Env,
        manager: Address,
        max_lock_weeks: u32,
    ) -> Result<(), BondingError> {
        update_config_with(&e, &manager, |cfg| cfg.max_lock_weeks = max_lock_weeks)?;
        Ok(())
    }

    /// Replace the whole configuration. `duration_rate` must match the
    /// stored value.
    pub fn update_config(
        e: Env,
        manager: Address,
        config: BondingConfig,
    ) -> Result<(), BondingError> {
        update_config_with(&e, &manager, |cfg| *cfg = config)?;
        Ok(())
    }

    /// Change the base emission. Blocks up to now are credited at the old
    /// rate first; the oracle is not consulted.
    pub fn set_reward_per_block(
        e: Env,
        manager: Address,
        reward_per_block: i128,
    ) -> Result<(), BondingError> {
        access::require_role(&e, Role::Manager, &manager)?;
        if reward_per_block < 0 {
            return Err(BondingError::InvalidConfig);
        }
        let mut pool = rewards::load(&e)?;
        pool.accrue(registry::current_block(&e))?;
        let old = pool.reward_per_block;
        pool.reward_per_block = reward_per_block;
        rewards::store(&e, &pool);
        events::emit_reward_rate_updated(&e, &manager, old, reward_per_block);
        Ok(())
    }

    // ── Pause ──────────────────────────────────────────────────────────────

    pub fn pause(e: Env, manager: Address) -> Result<(), BondingError> {
        pausable::pause(&e, &manager)
    }

    pub fn unpause(e: Env, manager: Address) -> Result<(), BondingError> {
        pausable::unpause(&e, &manager)
    }

    pub fn is_paused(e: Env) -> bool {
        pausable::is_paused(&e)
    }

    // ── Position lifecycle ─────────────────────────────────────────────────

    /// Lock `amount` liquidity units for `lock_weeks` weeks.
    ///
    /// Requirements:
    /// - `amount` > 0
    /// - `1 <= lock_weeks <= max_lock_weeks`
    /// - Caller has approved the contract to spend `amount`
    ///
    /// Returns the new position id.
    pub fn deposit(e: Env, owner: Address, amount: i128, lock_weeks: u32) -> Result<u64, BondingError> {
        owner.require_auth();
        pausable::require_not_paused(&e)?;
        registry::open(&e, &owner, &owner, amount, lock_weeks)
    }

    /// Open a position for `owner` funded by `minter`. MinterAuthority only.
    pub fn mint_position(
        e: Env,
        minter: Address,
        owner: Address,
        amount: i128,
        lock_weeks: u32,
    ) -> Result<u64, BondingError> {
        access::require_role(&e, Role::MinterAuthority, &minter)?;
        pausable::require_not_paused(&e)?;
        registry::open(&e, &minter, &owner, amount, lock_weeks)
    }

    /// Top up a matured position. Pays pending emission, compounds pending
    /// bonus liquidity and restarts the lock.
    pub fn add_liquidity(
        e: Env,
        owner: Address,
        id: u64,
        amount: i128,
    ) -> Result<BondPosition, BondingError> {
        owner.require_auth();
        pausable::require_not_paused(&e)?;
        registry::add_liquidity(&e, &owner, id, amount)
    }

    /// Withdraw principal from a matured position. The position is deleted
    /// when its principal reaches zero.
    pub fn remove_liquidity(
        e: Env,
        owner: Address,
        id: u64,
        amount: i128,
    ) -> Result<WithdrawalReceipt, BondingError> {
        owner.require_auth();
        pausable::require_not_paused(&e)?;
        registry::remove_liquidity(&e, &owner, id, amount, false)
    }

    /// Close a matured position on its owner's behalf. Proceeds go to the
    /// owner. BurnerAuthority only.
    pub fn burn_position(e: Env, burner: Address, id: u64) -> Result<WithdrawalReceipt, BondingError> {
        access::require_role(&e, Role::BurnerAuthority, &burner)?;
        pausable::require_not_paused(&e)?;
        let position = registry::load_position(&e, id)?;
        registry::remove_liquidity(&e, &burner, id, position.principal, true)
    }

    /// Pay pending base emission. Allowed before maturity.
    pub fn claim_rewards(e: Env, owner: Address, id: u64) -> Result<i128, BondingError> {
        owner.require_auth();
        pausable::require_not_paused(&e)?;
        registry::claim_rewards(&e, &owner, id)
    }

    pub fn transfer_position(e: Env, owner: Address, id: u64, to: Address) -> Result<(), BondingError> {
        owner.require_auth();
        pausable::require_not_paused(&e)?;
        registry::transfer_position(&e, &owner, id, &to)
    }

    // ── Migration ──────────────────────────────────────────────────────────

    /// Migrate the caller's legacy principal into one position.
    pub fn migrate(e: Env, holder: Address) -> Result<u64, BondingError> {
        migration::migrate(&e, &holder)
    }

    pub fn set_migrating(e: Env, manager: Address, migrating: bool) -> Result<(), BondingError> {
        migration::set_migrating(&e, &manager, migrating)
    }

    pub fn is_migrating(e: Env) -> bool {
        migration::is_migrating(&e)
    }

    pub fn legacy_record(e: Env, holder: Address) -> Option<LegacyRecord> {
        migration::legacy_record(&e, &holder)
    }

    pub fn migration_state(e: Env, holder: Address) -> Result<MigrationState, BondingError> {
        migration::legacy_record(&e, &holder)
            .map(|record| record.state)
            .ok_or(BondingError::NoLegacyBalance)
    }

    // ── Peg defense ────────────────────────────────────────────────────────

    /// Burn `amount` custodied liquidity into the protocol asset.
    pub fn primary_price_reset(e: Env, manager: Address, amount: i128) -> Result<i128, BondingError> {
        peg_defense::price_reset(&e, &manager, amount, peg_defense::PRIMARY_COIN)
    }

    /// Burn `amount` custodied liquidity into the paired asset.
    pub fn secondary_price_reset(
        e: Env,
        manager: Address,
        amount: i128,
    ) -> Result<i128, BondingError> {
        peg_defense::price_reset(&e, &manager, amount, peg_defense::SECONDARY_COIN)
    }

    // ── Queries ────────────────────────────────────────────────────────────

    pub fn get_position(e: Env, id: u64) -> Result<BondPosition, BondingError> {
        registry::load_position(&e, id)
    }

    pub fn positions_of(e: Env, owner: Address) -> Vec<u64> {
        registry::positions_of(&e, &owner)
    }

    pub fn position_count(e: Env) -> u64 {
        registry::position_count(&e)
    }

    pub fn pending_reward(e: Env, id: u64) -> Result<i128, BondingError> {
        registry::pending_reward(&e, id)
    }

    pub fn pending_lp_reward(e: Env, id: u64) -> Result<i128, BondingError> {
        registry::pending_lp_reward(&e, id)
    }

    pub fn reward_pool(e: Env) -> Result<RewardPool, BondingError> {
        rewards::load(&e)
    }

    pub fn lp_pool(e: Env) -> Result<LpPool, BondingError> {
        lp_rewards::load(&e)
    }

    /// Custodied liquidity per emission share, 1e18 scale.
    pub fn share_value(e: Env) -> Result<i128, BondingError> {
        registry::share_value(&e)
    }

    /// Shares a deposit of `principal` for `lock_weeks` would receive now.
    pub fn duration_multiply(e: Env, principal: i128, lock_weeks: u32) -> Result<i128, BondingError> {
        let cfg = parameters::get_config(&e)?;
        duration::duration_multiply(principal, lock_weeks, cfg.max_lock_weeks, cfg.duration_rate)
    }

    pub fn get_config(e: Env) -> Result<BondingConfig, BondingError> {
        parameters::get_config(&e)
    }

    pub fn get_collaborators(e: Env) -> Result<Collaborators, BondingError> {
        registry::get_collaborators(&e)
    }
}
