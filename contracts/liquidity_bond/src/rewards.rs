//! Emission accumulator.
//!
//! Base emission is distributed over duration-weighted shares with the usual
//! running-accumulator scheme: `acc_reward_per_share` only grows, and each
//! position remembers the accumulator value it has already been paid up to
//! (`reward_debt`). Pending reward is therefore O(1) per position.
//!
//! Blocks that pass while no shares exist are skipped: nothing is credited
//! retroactively when shares reappear.
//!
//! The emission multiplier follows the oracle price of the protocol asset:
//! `new = old * base_factor / (1 + |peg - price|)`. It is applied after the
//! elapsed interval has been credited, so it only affects future blocks.

use bonding_errors::BondingError;
use soroban_sdk::Env;

use crate::math::{self, ACC_PRECISION, WAD};
use crate::parameters::BondingConfig;
use crate::types::{BondPosition, DataKey, RewardPool};

/// Price the protocol asset is meant to track.
pub const PEG_PRICE: i128 = WAD;

/// Lower bound on the emission multiplier (0.2).
pub const MIN_REWARD_MULTIPLIER: i128 = 200_000_000_000_000_000;

/// Upper bound on the emission multiplier (5.0).
pub const MAX_REWARD_MULTIPLIER: i128 = 5 * WAD;

impl RewardPool {
    pub fn new(reward_per_block: i128, start_block: u64) -> Self {
        Self {
            total_shares: 0,
            last_reward_block: start_block,
            acc_reward_per_share: 0,
            reward_per_block,
            reward_multiplier: WAD,
            last_price: PEG_PRICE,
        }
    }

    /// Accumulator value at `current_block` without mutating the pool.
    pub fn projected_acc(&self, current_block: u64) -> Result<i128, BondingError> {
        if current_block <= self.last_reward_block || self.total_shares == 0 {
            return Ok(self.acc_reward_per_share);
        }
        let blocks = (current_block - self.last_reward_block) as i128;
        let emitted = math::mul_i128(blocks, self.reward_per_block)?;
        let reward = math::mul_div_floor(emitted, self.reward_multiplier, WAD)?;
        let per_share = math::mul_div_floor(reward, ACC_PRECISION, self.total_shares)?;
        math::add_i128(self.acc_reward_per_share, per_share)
    }

    /// Credit emission for the blocks since `last_reward_block`.
    ///
    /// Returns `false` (and changes nothing) when `current_block` has already
    /// been accrued.
    pub fn accrue(&mut self, current_block: u64) -> Result<bool, BondingError> {
        if current_block <= self.last_reward_block {
            return Ok(false);
        }
        self.acc_reward_per_share = self.projected_acc(current_block)?;
        self.last_reward_block = current_block;
        Ok(true)
    }

    /// Accumulator snapshot for `shares` at the current accumulator value.
    pub fn debt_for(&self, shares: i128) -> Result<i128, BondingError> {
        math::mul_div_floor(shares, self.acc_reward_per_share, ACC_PRECISION)
    }

    pub fn pending(&self, shares: i128, reward_debt: i128) -> Result<i128, BondingError> {
        let accrued = self.debt_for(shares)?;
        Ok(math::sub_i128(accrued, reward_debt)?.max(0))
    }

    /// Settle the position and reset its debt without changing shares.
    /// Returns the amount owed.
    pub fn settle(&mut self, position: &mut BondPosition) -> Result<i128, BondingError> {
        let owed = self.pending(position.shares, position.reward_debt)?;
        position.reward_debt = self.debt_for(position.shares)?;
        Ok(owed)
    }

    /// Move `position` to `new_shares`.
    ///
    /// Accrues and settles against the old share count before touching
    /// `total_shares`, then snapshots the debt for the new count. Returns the
    /// reward owed to the position up to `current_block`.
    pub fn on_shares_changed(
        &mut self,
        position: &mut BondPosition,
        new_shares: i128,
        current_block: u64,
    ) -> Result<i128, BondingError> {
        self.accrue(current_block)?;
        let owed = self.settle(position)?;
        let without = math::sub_i128(self.total_shares, position.shares)?;
        self.total_shares = math::add_i128(without, new_shares)?;
        position.shares = new_shares;
        position.reward_debt = self.debt_for(new_shares)?;
        Ok(owed)
    }

    /// Fold an oracle sample into the emission multiplier.
    ///
    /// Skipped when the price moved by no more than `min_price_diff` since the
    /// last folded sample, so re-applying a sample is a no-op. A result
    /// outside `[MIN_REWARD_MULTIPLIER, MAX_REWARD_MULTIPLIER]` keeps the old
    /// multiplier. Returns true when the multiplier changed.
    pub fn apply_price(&mut self, price: i128, cfg: &BondingConfig) -> Result<bool, BondingError> {
        let moved = math::sub_i128(price, self.last_price)?.abs();
        if moved <= cfg.min_price_diff {
            return Ok(false);
        }
        self.last_price = price;
        let next = next_multiplier(self.reward_multiplier, price, cfg.multiplier_base_factor)?;
        if !(MIN_REWARD_MULTIPLIER..=MAX_REWARD_MULTIPLIER).contains(&next) {
            return Ok(false);
        }
        let changed = next != self.reward_multiplier;
        self.reward_multiplier = next;
        Ok(changed)
    }
}

/// `multiplier * base_factor / (1 + |peg - price|)`, all 1e18 scale.
pub fn next_multiplier(
    multiplier: i128,
    price: i128,
    base_factor: i128,
) -> Result<i128, BondingError> {
    let deviation = math::sub_i128(PEG_PRICE, price)?.abs();
    let denominator = math::add_i128(WAD, deviation)?;
    let scaled = math::mul_div_floor(multiplier, base_factor, WAD)?;
    math::mul_div_floor(scaled, WAD, denominator)
}

pub fn load(e: &Env) -> Result<RewardPool, BondingError> {
    e.storage()
        .instance()
        .get(&DataKey::RewardPool)
        .ok_or(BondingError::NotInitialized)
}

pub fn store(e: &Env, pool: &RewardPool) {
    e.storage().instance().set(&DataKey::RewardPool, pool);
}
