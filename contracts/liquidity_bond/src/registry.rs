//! Position registry.
//!
//! Positions live in `persistent()` storage keyed by id, with a per-owner id
//! list alongside. Every mutating operation follows the same order:
//!
//! 1. authorise and validate,
//! 2. read the oracle sample and custody balance ([`sync`]),
//! 3. settle both accumulators and write pools and positions,
//! 4. move tokens.
//!
//! Any error aborts the invocation, so a failure in step 4 also discards the
//! writes of step 3.

use bonding_errors::BondingError;
use soroban_sdk::{log, Address, Env, Vec};

use crate::duration;
use crate::events;
use crate::interfaces;
use crate::lp_rewards;
use crate::math::{self, WAD};
use crate::parameters::{self, BondingConfig};
use crate::rewards;
use crate::token_integration;
use crate::types::{BondPosition, Collaborators, DataKey, LpPool, RewardPool, WithdrawalReceipt};

// ─── Storage helpers ───────────────────────────────────────────────────────

/// Minimum ledger TTL before a persistent entry is bumped (~1 day).
pub(crate) const BUMP_THRESHOLD: u32 = 17_280;
/// Target TTL after a bump (~30 days).
pub(crate) const BUMP_TARGET: u32 = 518_400;

pub fn current_block(e: &Env) -> u64 {
    e.ledger().sequence() as u64
}

pub fn get_collaborators(e: &Env) -> Result<Collaborators, BondingError> {
    e.storage()
        .instance()
        .get(&DataKey::Collaborators)
        .ok_or(BondingError::NotInitialized)
}

pub fn load_position(e: &Env, id: u64) -> Result<BondPosition, BondingError> {
    let key = DataKey::Position(id);
    let storage = e.storage().persistent();
    let position: BondPosition = storage.get(&key).ok_or(BondingError::PositionNotFound)?;
    storage.extend_ttl(&key, BUMP_THRESHOLD, BUMP_TARGET);
    Ok(position)
}

fn save_position(e: &Env, position: &BondPosition) {
    let key = DataKey::Position(position.id);
    e.storage().persistent().set(&key, position);
    e.storage()
        .persistent()
        .extend_ttl(&key, BUMP_THRESHOLD, BUMP_TARGET);
}

fn delete_position(e: &Env, position: &BondPosition) {
    e.storage()
        .persistent()
        .remove(&DataKey::Position(position.id));
    unindex(e, &position.owner, position.id);
}

pub fn positions_of(e: &Env, owner: &Address) -> Vec<u64> {
    e.storage()
        .persistent()
        .get(&DataKey::OwnerPositions(owner.clone()))
        .unwrap_or_else(|| Vec::new(e))
}

fn store_index(e: &Env, owner: &Address, ids: &Vec<u64>) {
    let key = DataKey::OwnerPositions(owner.clone());
    if ids.is_empty() {
        e.storage().persistent().remove(&key);
        return;
    }
    e.storage().persistent().set(&key, ids);
    e.storage()
        .persistent()
        .extend_ttl(&key, BUMP_THRESHOLD, BUMP_TARGET);
}

fn index(e: &Env, owner: &Address, id: u64) {
    let mut ids = positions_of(e, owner);
    ids.push_back(id);
    store_index(e, owner, &ids);
}

fn unindex(e: &Env, owner: &Address, id: u64) {
    let mut ids = positions_of(e, owner);
    if let Some(i) = ids.first_index_of(id) {
        ids.remove(i);
    }
    store_index(e, owner, &ids);
}

/// Number of positions ever opened (ids are `0..position_count`).
pub fn position_count(e: &Env) -> u64 {
    e.storage()
        .instance()
        .get(&DataKey::NextPositionId)
        .unwrap_or(0)
}

fn next_position_id(e: &Env) -> Result<u64, BondingError> {
    let id = position_count(e);
    e.storage()
        .instance()
        .set(&DataKey::NextPositionId, &math::add_u64(id, 1)?);
    Ok(id)
}

// ─── Pool sync ─────────────────────────────────────────────────────────────

/// Both accumulators, brought up to the current block.
pub struct Pools {
    pub rewards: RewardPool,
    pub lp: LpPool,
    /// Custodied liquidity read during the sync.
    pub balance: i128,
}

/// Load both pools and fold in everything that happened since the last
/// operation: elapsed emission, a fresh oracle sample and custody inflow.
///
/// All external reads happen before any pool field changes.
pub fn sync(
    e: &Env,
    cfg: &BondingConfig,
    collab: &Collaborators,
    block: u64,
) -> Result<Pools, BondingError> {
    let mut reward_pool = rewards::load(e)?;
    let mut lp_pool = lp_rewards::load(e)?;
    e.storage()
        .instance()
        .extend_ttl(BUMP_THRESHOLD, BUMP_TARGET);

    let price = if block > reward_pool.last_reward_block {
        Some(interfaces::consult_price(e, collab, cfg, block)?)
    } else {
        None
    };
    let balance = token_integration::custodied_balance(e, collab);

    reward_pool.accrue(block)?;
    if let Some(price) = price {
        if reward_pool.apply_price(price, cfg)? {
            events::emit_multiplier_updated(e, price, reward_pool.reward_multiplier);
        }
    }

    let recognized = lp_pool.recognize_inflow(balance)?;
    if recognized > 0 {
        events::emit_lp_rewards_recognized(e, recognized, lp_pool.lp_rewards);
    }

    Ok(Pools {
        rewards: reward_pool,
        lp: lp_pool,
        balance,
    })
}

pub fn persist(e: &Env, pools: &Pools) {
    rewards::store(e, &pools.rewards);
    lp_rewards::store(e, &pools.lp);
}

// ─── Internal operations ───────────────────────────────────────────────────

/// Open a position for `owner` at `block` and register it with both
/// accumulators. Tokens are not moved here.
#[allow(clippy::too_many_arguments)]
pub fn create(
    e: &Env,
    cfg: &BondingConfig,
    pools: &mut Pools,
    owner: &Address,
    principal: i128,
    lock_weeks: u32,
    max_weeks: u32,
    block: u64,
) -> Result<BondPosition, BondingError> {
    let shares = duration::duration_multiply(principal, lock_weeks, max_weeks, cfg.duration_rate)?;
    let lock_blocks = math::mul_u64(lock_weeks as u64, cfg.blocks_per_week)?;
    let maturity_block = math::add_u64(block, lock_blocks)?;

    let mut position = BondPosition {
        id: next_position_id(e)?,
        owner: owner.clone(),
        principal: 0,
        lock_weeks,
        shares: 0,
        creation_block: block,
        maturity_block,
        reward_debt: 0,
        lp_reward_debt: 0,
    };
    pools.rewards.on_shares_changed(&mut position, shares, block)?;
    pools.lp.on_principal_changed(&mut position, principal)?;

    save_position(e, &position);
    index(e, owner, position.id);

    events::emit_bond_created(
        e,
        owner,
        position.id,
        principal,
        lock_weeks,
        shares,
        maturity_block,
    );
    log!(e, "bond created", position.id, shares);
    Ok(position)
}

fn require_owner(position: &BondPosition, caller: &Address) -> Result<(), BondingError> {
    if position.owner != *caller {
        return Err(BondingError::NotOwner);
    }
    Ok(())
}

fn require_matured(position: &BondPosition, block: u64) -> Result<(), BondingError> {
    if block < position.maturity_block {
        return Err(BondingError::NotMatured);
    }
    Ok(())
}

/// Pay `reward` for `position_id` to `recipient`, plus the treasury share.
fn pay_reward(
    e: &Env,
    cfg: &BondingConfig,
    collab: &Collaborators,
    recipient: &Address,
    position_id: u64,
    reward: i128,
) -> Result<(), BondingError> {
    if reward <= 0 {
        return Ok(());
    }
    let treasury = token_integration::mint_reward(e, collab, recipient, reward, cfg.treasury_divider)?;
    events::emit_rewards_claimed(e, recipient, position_id, reward, treasury);
    Ok(())
}

/// Open a position funded by `funder` and owned by `owner`.
pub fn open(
    e: &Env,
    funder: &Address,
    owner: &Address,
    amount: i128,
    lock_weeks: u32,
) -> Result<u64, BondingError> {
    if amount <= 0 {
        return Err(BondingError::InvalidAmount);
    }
    let cfg = parameters::get_config(e)?;
    if lock_weeks == 0 {
        return Err(BondingError::InvalidDuration);
    }
    if lock_weeks > cfg.max_lock_weeks {
        return Err(BondingError::MaxDurationExceeded);
    }
    let collab = get_collaborators(e)?;
    let block = current_block(e);

    let mut pools = sync(e, &cfg, &collab, block)?;
    let position = create(
        e,
        &cfg,
        &mut pools,
        owner,
        amount,
        lock_weeks,
        cfg.max_lock_weeks,
        block,
    )?;
    persist(e, &pools);

    token_integration::transfer_into_contract(e, &collab, funder, amount)?;
    Ok(position.id)
}

/// Top up a matured position. The pending bonus liquidity is compounded into
/// principal and the lock restarts from the current block.
pub fn add_liquidity(
    e: &Env,
    caller: &Address,
    id: u64,
    amount: i128,
) -> Result<BondPosition, BondingError> {
    if amount <= 0 {
        return Err(BondingError::InvalidAmount);
    }
    let cfg = parameters::get_config(e)?;
    let collab = get_collaborators(e)?;
    let block = current_block(e);
    let mut position = load_position(e, id)?;
    require_owner(&position, caller)?;
    require_matured(&position, block)?;

    let mut pools = sync(e, &cfg, &collab, block)?;

    let compounded = pools
        .lp
        .pending(position.principal, position.lp_reward_debt)?
        .min(pools.lp.lp_rewards);
    let new_principal = math::add_i128(math::add_i128(position.principal, amount)?, compounded)?;
    let new_shares = duration::duration_multiply(
        new_principal,
        position.lock_weeks,
        parameters::MAX_LOCK_WEEKS_CEILING,
        cfg.duration_rate,
    )?;

    let reward = pools.rewards.on_shares_changed(&mut position, new_shares, block)?;
    pools.lp.on_principal_changed(&mut position, new_principal)?;
    let lock_blocks = math::mul_u64(position.lock_weeks as u64, cfg.blocks_per_week)?;
    position.maturity_block = math::add_u64(block, lock_blocks)?;

    save_position(e, &position);
    persist(e, &pools);
    events::emit_liquidity_added(e, caller, id, amount, compounded, new_principal);

    token_integration::transfer_into_contract(e, &collab, caller, amount)?;
    pay_reward(e, &cfg, &collab, caller, id, reward)?;
    Ok(position)
}

/// Withdraw `amount` principal from a matured position to `recipient`.
///
/// `caller` must own the position unless `privileged` (burner path). The
/// transfer is principal plus settled bonus liquidity, scaled down by
/// `balance / obligations` when custody is short.
pub fn remove_liquidity(
    e: &Env,
    caller: &Address,
    id: u64,
    amount: i128,
    privileged: bool,
) -> Result<WithdrawalReceipt, BondingError> {
    if amount <= 0 {
        return Err(BondingError::InvalidAmount);
    }
    let cfg = parameters::get_config(e)?;
    let collab = get_collaborators(e)?;
    let block = current_block(e);
    let mut position = load_position(e, id)?;
    if !privileged {
        require_owner(&position, caller)?;
    }
    require_matured(&position, block)?;
    if amount > position.principal {
        return Err(BondingError::InsufficientPrincipal);
    }

    let mut pools = sync(e, &cfg, &collab, block)?;
    let balance = pools.balance;
    let obligations = pools.lp.obligations()?;

    let remaining = math::sub_i128(position.principal, amount)?;
    let new_shares = if remaining == 0 {
        0
    } else {
        duration::duration_multiply(
            remaining,
            position.lock_weeks,
            parameters::MAX_LOCK_WEEKS_CEILING,
            cfg.duration_rate,
        )?
    };
    let reward = pools.rewards.on_shares_changed(&mut position, new_shares, block)?;
    let lp_reward = pools.lp.on_principal_changed(&mut position, remaining)?;

    let owed = math::add_i128(amount, lp_reward)?;
    let transferred = if balance < obligations {
        math::mul_div_floor(owed, balance.max(0), obligations)?
    } else {
        owed
    };

    let closed = remaining == 0;
    if closed {
        delete_position(e, &position);
    } else {
        save_position(e, &position);
    }
    persist(e, &pools);
    events::emit_liquidity_removed(e, &position.owner, id, amount, transferred, remaining);

    let recipient = position.owner.clone();
    token_integration::transfer_from_contract(e, &collab, &recipient, transferred)?;
    pay_reward(e, &cfg, &collab, &recipient, id, reward)?;

    Ok(WithdrawalReceipt {
        position_id: id,
        principal_removed: amount,
        lp_reward,
        liquidity_transferred: transferred,
        reward,
        closed,
    })
}

/// Pay the pending base emission of a position without touching its shares.
pub fn claim_rewards(e: &Env, caller: &Address, id: u64) -> Result<i128, BondingError> {
    let cfg = parameters::get_config(e)?;
    let collab = get_collaborators(e)?;
    let block = current_block(e);
    let mut position = load_position(e, id)?;
    require_owner(&position, caller)?;

    let mut pools = sync(e, &cfg, &collab, block)?;
    let reward = pools.rewards.settle(&mut position)?;

    save_position(e, &position);
    persist(e, &pools);

    pay_reward(e, &cfg, &collab, caller, id, reward)?;
    Ok(reward)
}

/// Reassign a position to `to`. Accounting is untouched.
pub fn transfer_position(
    e: &Env,
    caller: &Address,
    id: u64,
    to: &Address,
) -> Result<(), BondingError> {
    let mut position = load_position(e, id)?;
    require_owner(&position, caller)?;
    if position.owner == *to {
        return Ok(());
    }
    unindex(e, caller, id);
    position.owner = to.clone();
    save_position(e, &position);
    index(e, to, id);
    events::emit_position_transferred(e, caller, to, id);
    Ok(())
}

// ─── Views ─────────────────────────────────────────────────────────────────

/// Base emission owed to a position if it were settled now.
///
/// Simulates the elapsed emission at the stored multiplier without
/// consulting the oracle.
pub fn pending_reward(e: &Env, id: u64) -> Result<i128, BondingError> {
    let position = load_position(e, id)?;
    let mut pool = rewards::load(e)?;
    pool.acc_reward_per_share = pool.projected_acc(current_block(e))?;
    pool.pending(position.shares, position.reward_debt)
}

/// Bonus liquidity owed to a position, including inflow not yet recognised.
pub fn pending_lp_reward(e: &Env, id: u64) -> Result<i128, BondingError> {
    let position = load_position(e, id)?;
    let collab = get_collaborators(e)?;
    let mut pool = lp_rewards::load(e)?;
    pool.recognize_inflow(token_integration::custodied_balance(e, &collab))?;
    Ok(pool
        .pending(position.principal, position.lp_reward_debt)?
        .min(pool.lp_rewards))
}

/// Custodied liquidity per share, 1e18 scale. Zero when no shares exist.
pub fn share_value(e: &Env) -> Result<i128, BondingError> {
    let pool = rewards::load(e)?;
    if pool.total_shares == 0 {
        return Ok(0);
    }
    let collab = get_collaborators(e)?;
    let balance = token_integration::custodied_balance(e, &collab);
    math::mul_div_floor(balance, WAD, pool.total_shares)
}
