use soroban_sdk::{contracttype, Address};

use crate::access::Role;

// ─── Positions ─────────────────────────────────────────────────────────────

/// A time-locked deposit of liquidity units.
///
/// `shares` always equals `duration_multiply(principal, lock_weeks)`; the
/// record is deleted as soon as `principal` reaches zero.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BondPosition {
    /// Monotonic id, never reused.
    pub id: u64,
    pub owner: Address,
    /// Liquidity units held for this position.
    pub principal: i128,
    pub lock_weeks: u32,
    /// Duration-weighted emission shares.
    pub shares: i128,
    pub creation_block: u64,
    /// `creation_block + lock_weeks * blocks_per_week`, refreshed on top-up.
    pub maturity_block: u64,
    /// Emission accumulator snapshot (`shares * acc / 1e12`).
    pub reward_debt: i128,
    /// Bonus accumulator snapshot (`principal * acc_lp / 1e12`).
    pub lp_reward_debt: i128,
}

/// What a withdrawal paid out.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawalReceipt {
    pub position_id: u64,
    /// Principal removed from the position.
    pub principal_removed: i128,
    /// Bonus liquidity settled with the withdrawal.
    pub lp_reward: i128,
    /// Liquidity units actually sent (after any custody shortfall correction).
    pub liquidity_transferred: i128,
    /// Reward tokens minted to the recipient.
    pub reward: i128,
    /// true when the position was deleted.
    pub closed: bool,
}

// ─── Global pools ──────────────────────────────────────────────────────────

/// Emission accumulator over duration-weighted shares.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPool {
    pub total_shares: i128,
    pub last_reward_block: u64,
    /// Reward per share, scaled by 1e12.
    pub acc_reward_per_share: i128,
    /// Base emission per block before the multiplier.
    pub reward_per_block: i128,
    /// Price-responsive emission multiplier, scaled by 1e18.
    pub reward_multiplier: i128,
    /// Oracle price last folded into the multiplier, scaled by 1e18.
    pub last_price: i128,
}

/// Bonus accumulator over deposited principal.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LpPool {
    pub total_principal: i128,
    /// Bonus liquidity per principal unit, scaled by 1e12.
    pub acc_lp_reward_per_share: i128,
    /// Bonus liquidity recognised and not yet paid out or compounded.
    pub lp_rewards: i128,
    /// Legacy principal in custody that has not been migrated yet.
    pub lp_to_migrate: i128,
}

// ─── Migration ─────────────────────────────────────────────────────────────

/// One row of the legacy snapshot supplied at initialisation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LegacyEntry {
    pub holder: Address,
    pub principal: i128,
    /// Principal-weighted average lock duration of the legacy deposits.
    pub lock_weeks: u32,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MigrationState {
    NotMigrated,
    Migrated,
}

/// Stored per legacy holder.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LegacyRecord {
    pub principal: i128,
    pub lock_weeks: u32,
    /// Principal still waiting to migrate (0 once migrated).
    pub remaining: i128,
    pub state: MigrationState,
}

// ─── Collaborators ─────────────────────────────────────────────────────────

/// External contracts the engine talks to.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Collaborators {
    /// Pooled liquidity unit (Soroban token interface).
    pub liquidity_token: Address,
    /// Reward asset; the engine must be its admin to mint.
    pub reward_token: Address,
    /// Price oracle contract.
    pub oracle: Address,
    /// Asset whose price the oracle is consulted for.
    pub price_asset: Address,
    /// AMM pool issuing the liquidity unit.
    pub pool: Address,
    /// Receives peg-defense proceeds and the treasury emission share.
    pub treasury: Address,
}

// ─── Storage keys ──────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// BondingConfig.
    Config,
    /// Collaborators.
    Collaborators,
    /// RewardPool.
    RewardPool,
    /// LpPool.
    LpPool,
    /// Next position id (u64).
    NextPositionId,
    /// Position id -> BondPosition.
    Position(u64),
    /// Owner -> Vec<u64> of owned position ids.
    OwnerPositions(Address),
    /// Legacy holder -> LegacyRecord.
    Legacy(Address),
    /// Migration window flag.
    Migrating,
    /// Pause flag.
    Paused,
    /// Capability table.
    Role(Role, Address),
}
