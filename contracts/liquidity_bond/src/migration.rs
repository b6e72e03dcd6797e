//! One-shot migration of legacy holders into positions.
//!
//! The legacy snapshot is written once by `initialize` and never extended.
//! Each holder migrates at most once, all of their principal at the
//! current block, into exactly one position.

use bonding_errors::BondingError;
use soroban_sdk::{Address, Env, Vec};

use crate::access::{self, Role};
use crate::events;
use crate::math;
use crate::parameters::{self, BondingConfig};
use crate::pausable;
use crate::registry;
use crate::types::{DataKey, LegacyEntry, LegacyRecord, MigrationState};

pub fn is_migrating(e: &Env) -> bool {
    e.storage()
        .instance()
        .get(&DataKey::Migrating)
        .unwrap_or(false)
}

pub fn legacy_record(e: &Env, holder: &Address) -> Option<LegacyRecord> {
    e.storage()
        .persistent()
        .get(&DataKey::Legacy(holder.clone()))
}

fn save_record(e: &Env, holder: &Address, record: &LegacyRecord) {
    let key = DataKey::Legacy(holder.clone());
    e.storage().persistent().set(&key, record);
    e.storage()
        .persistent()
        .extend_ttl(&key, registry::BUMP_THRESHOLD, registry::BUMP_TARGET);
}

/// Write the snapshot and return the total legacy principal.
///
/// # Errors
/// * `InvalidAmount` for a negative principal
/// * `InvalidConfig` for a duplicate holder or a lock beyond `max_lock_weeks`
pub fn load_snapshot(
    e: &Env,
    cfg: &BondingConfig,
    entries: &Vec<LegacyEntry>,
) -> Result<i128, BondingError> {
    let mut total: i128 = 0;
    for entry in entries.iter() {
        if entry.principal < 0 {
            return Err(BondingError::InvalidAmount);
        }
        if entry.lock_weeks > cfg.max_lock_weeks {
            return Err(BondingError::InvalidConfig);
        }
        if legacy_record(e, &entry.holder).is_some() {
            return Err(BondingError::InvalidConfig);
        }
        let record = LegacyRecord {
            principal: entry.principal,
            lock_weeks: entry.lock_weeks,
            remaining: entry.principal,
            state: MigrationState::NotMigrated,
        };
        save_record(e, &entry.holder, &record);
        total = math::add_i128(total, entry.principal)?;
    }
    e.storage().instance().set(&DataKey::Migrating, &true);
    Ok(total)
}

/// Move `holder`'s legacy principal into a new position.
pub fn migrate(e: &Env, holder: &Address) -> Result<u64, BondingError> {
    holder.require_auth();
    pausable::require_not_paused(e)?;
    if !is_migrating(e) {
        return Err(BondingError::MigrationClosed);
    }
    let mut record = legacy_record(e, holder).ok_or(BondingError::NoLegacyBalance)?;
    if record.state == MigrationState::Migrated {
        return Err(BondingError::AlreadyMigrated);
    }
    if record.remaining <= 0 {
        return Err(BondingError::NoLegacyBalance);
    }

    let cfg = parameters::get_config(e)?;
    let collab = registry::get_collaborators(e)?;
    let block = registry::current_block(e);

    let mut pools = registry::sync(e, &cfg, &collab, block)?;
    // Legacy principal already sits in custody under lp_to_migrate.
    pools.lp.lp_to_migrate = math::sub_i128(pools.lp.lp_to_migrate, record.remaining)?;
    let position = registry::create(
        e,
        &cfg,
        &mut pools,
        holder,
        record.remaining,
        record.lock_weeks,
        parameters::MAX_LOCK_WEEKS_CEILING,
        block,
    )?;
    registry::persist(e, &pools);

    let migrated = record.remaining;
    record.remaining = 0;
    record.state = MigrationState::Migrated;
    save_record(e, holder, &record);

    events::emit_migrated(e, holder, position.id, migrated, record.lock_weeks);
    Ok(position.id)
}

pub fn set_migrating(e: &Env, manager: &Address, migrating: bool) -> Result<(), BondingError> {
    access::require_role(e, Role::Manager, manager)?;
    e.storage().instance().set(&DataKey::Migrating, &migrating);
    events::emit_migrating_set(e, manager, migrating);
    Ok(())
}
