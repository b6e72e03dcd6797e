//! Bonus liquidity accumulator.
//!
//! Liquidity units that land in custody beyond what the engine owes
//! (principal, unmigrated legacy principal, bonus already recognised) are
//! distributed pro rata to principal. Recognition is lazy: the excess is
//! measured from the custodied balance whenever the pools are synced.

use bonding_errors::BondingError;
use soroban_sdk::Env;

use crate::math::{self, ACC_PRECISION};
use crate::types::{BondPosition, DataKey, LpPool};

impl LpPool {
    pub fn new(lp_to_migrate: i128) -> Self {
        Self {
            total_principal: 0,
            acc_lp_reward_per_share: 0,
            lp_rewards: 0,
            lp_to_migrate,
        }
    }

    /// Liquidity the engine must be able to hand back.
    pub fn obligations(&self) -> Result<i128, BondingError> {
        math::add_i128(
            math::add_i128(self.total_principal, self.lp_to_migrate)?,
            self.lp_rewards,
        )
    }

    /// Recognise inflow measured against `balance`, the current custody.
    ///
    /// Returns the newly distributed amount (0 when there is nothing new, the
    /// balance is short of principal, or no principal is deposited).
    pub fn recognize_inflow(&mut self, balance: i128) -> Result<i128, BondingError> {
        if self.total_principal <= 0 {
            return Ok(0);
        }
        let owed = math::add_i128(self.total_principal, self.lp_to_migrate)?;
        if balance < owed {
            return Ok(0);
        }
        let excess = balance - owed;
        if excess <= self.lp_rewards {
            return Ok(0);
        }
        let fresh = excess - self.lp_rewards;
        let per_unit = math::mul_div_floor(fresh, ACC_PRECISION, self.total_principal)?;
        self.acc_lp_reward_per_share = math::add_i128(self.acc_lp_reward_per_share, per_unit)?;
        self.lp_rewards = excess;
        Ok(fresh)
    }

    pub fn debt_for(&self, principal: i128) -> Result<i128, BondingError> {
        math::mul_div_floor(principal, self.acc_lp_reward_per_share, ACC_PRECISION)
    }

    pub fn pending(&self, principal: i128, lp_reward_debt: i128) -> Result<i128, BondingError> {
        let accrued = self.debt_for(principal)?;
        Ok(math::sub_i128(accrued, lp_reward_debt)?.max(0))
    }

    /// Settle `position` and move it to `new_principal`.
    ///
    /// The settled bonus leaves `lp_rewards`; the caller either pays it out or
    /// folds it into `new_principal`. Returns the settled amount.
    pub fn on_principal_changed(
        &mut self,
        position: &mut BondPosition,
        new_principal: i128,
    ) -> Result<i128, BondingError> {
        let owed = self.pending(position.principal, position.lp_reward_debt)?.min(self.lp_rewards);
        self.lp_rewards = math::sub_i128(self.lp_rewards, owed)?;
        let without = math::sub_i128(self.total_principal, position.principal)?;
        self.total_principal = math::add_i128(without, new_principal)?;
        position.principal = new_principal;
        position.lp_reward_debt = self.debt_for(new_principal)?;
        Ok(owed)
    }
}

pub fn load(e: &Env) -> Result<LpPool, BondingError> {
    e.storage()
        .instance()
        .get(&DataKey::LpPool)
        .ok_or(BondingError::NotInitialized)
}

pub fn store(e: &Env, pool: &LpPool) {
    e.storage().instance().set(&DataKey::LpPool, pool);
}
