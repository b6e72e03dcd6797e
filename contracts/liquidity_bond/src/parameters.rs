//! Protocol Parameters Module
//!
//! Manager-controlled configuration of the bonding engine. Every parameter has
//! a documented default and bounds; out-of-range writes are rejected with
//! `InvalidConfig` and successful writes emit `config_updated`.
//!
//! ## Units
//! - Block counts are ledger sequence numbers.
//! - Rates, factors and prices are 18-decimal fixed point (`1e18` = 1.0).
//! - Slippage is in basis points.

use bonding_errors::BondingError;
use soroban_sdk::{contracttype, Env};

use crate::math::WAD;
use crate::types::DataKey;

// ============================================================================
// Parameter Bounds Constants
// ============================================================================

/// Default ledgers per week (5 second ledgers).
pub const DEFAULT_BLOCKS_PER_WEEK: u64 = 120_960;
/// Maximum ledgers per week accepted by the setter.
pub const MAX_BLOCKS_PER_WEEK: u64 = 10_000_000;

/// Default longest lock for a direct deposit (four years).
pub const DEFAULT_MAX_LOCK_WEEKS: u32 = 208;
/// Hard ceiling on lock duration (ten years).
pub const MAX_LOCK_WEEKS_CEILING: u32 = 520;

/// Default per-week duration rate (0.001).
pub const DEFAULT_DURATION_RATE: i128 = 1_000_000_000_000_000;
/// Maximum per-week duration rate (0.1).
pub const MAX_DURATION_RATE: i128 = 100_000_000_000_000_000;

/// Default numerator of the price-responsive multiplier update (1.05).
pub const DEFAULT_MULTIPLIER_BASE_FACTOR: i128 = 1_050_000_000_000_000_000;
/// Maximum base factor (2.0).
pub const MAX_MULTIPLIER_BASE_FACTOR: i128 = 2 * WAD;

/// Default minimum oracle move before the multiplier is recomputed (0.001).
pub const DEFAULT_MIN_PRICE_DIFF: i128 = 1_000_000_000_000_000;

/// Default oldest accepted oracle sample, in blocks (one day).
pub const DEFAULT_MAX_ORACLE_AGE: u64 = 17_280;

/// Default treasury divider: the treasury receives 1/5 on top of each payout.
pub const DEFAULT_TREASURY_DIVIDER: u32 = 5;

/// Default slippage tolerance for peg-defense withdrawals (1 %).
pub const DEFAULT_MAX_SLIPPAGE_BPS: u32 = 100;
/// Maximum slippage tolerance (100 %).
pub const MAX_SLIPPAGE_BPS: u32 = 10_000;

// ============================================================================
// Config
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BondingConfig {
    /// Ledgers per lock week.
    pub blocks_per_week: u64,
    /// Longest lock accepted for new positions.
    pub max_lock_weeks: u32,
    /// Per-week duration rate, 1e18 scale.
    pub duration_rate: i128,
    /// Numerator of `multiplier * factor / (1 + |peg - price|)`, 1e18 scale.
    pub multiplier_base_factor: i128,
    /// Oracle move below which the multiplier is left untouched, 1e18 scale.
    pub min_price_diff: i128,
    /// Oldest oracle sample accepted, in blocks.
    pub max_oracle_age: u64,
    /// Treasury emission divider; 0 disables the treasury share.
    pub treasury_divider: u32,
    /// Peg-defense minimum-out tolerance against the pool quote.
    pub max_slippage_bps: u32,
}

impl Default for BondingConfig {
    fn default() -> Self {
        Self {
            blocks_per_week: DEFAULT_BLOCKS_PER_WEEK,
            max_lock_weeks: DEFAULT_MAX_LOCK_WEEKS,
            duration_rate: DEFAULT_DURATION_RATE,
            multiplier_base_factor: DEFAULT_MULTIPLIER_BASE_FACTOR,
            min_price_diff: DEFAULT_MIN_PRICE_DIFF,
            max_oracle_age: DEFAULT_MAX_ORACLE_AGE,
            treasury_divider: DEFAULT_TREASURY_DIVIDER,
            max_slippage_bps: DEFAULT_MAX_SLIPPAGE_BPS,
        }
    }
}

impl BondingConfig {
    /// Check every field against its bounds.
    pub fn validate(&self) -> Result<(), BondingError> {
        if self.blocks_per_week == 0 || self.blocks_per_week > MAX_BLOCKS_PER_WEEK {
            return Err(BondingError::InvalidConfig);
        }
        if self.max_lock_weeks == 0 || self.max_lock_weeks > MAX_LOCK_WEEKS_CEILING {
            return Err(BondingError::InvalidConfig);
        }
        if self.duration_rate < 0 || self.duration_rate > MAX_DURATION_RATE {
            return Err(BondingError::InvalidConfig);
        }
        if self.multiplier_base_factor <= 0
            || self.multiplier_base_factor > MAX_MULTIPLIER_BASE_FACTOR
        {
            return Err(BondingError::InvalidConfig);
        }
        if self.min_price_diff < 0 || self.min_price_diff > WAD {
            return Err(BondingError::InvalidConfig);
        }
        if self.max_oracle_age == 0 {
            return Err(BondingError::InvalidConfig);
        }
        if self.max_slippage_bps > MAX_SLIPPAGE_BPS {
            return Err(BondingError::InvalidConfig);
        }
        Ok(())
    }
}

// ============================================================================
// Storage
// ============================================================================

pub fn get_config(e: &Env) -> Result<BondingConfig, BondingError> {
    e.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(BondingError::NotInitialized)
}

/// Validate and store `cfg`.
pub fn set_config(e: &Env, cfg: &BondingConfig) -> Result<(), BondingError> {
    cfg.validate()?;
    e.storage().instance().set(&DataKey::Config, cfg);
    Ok(())
}
