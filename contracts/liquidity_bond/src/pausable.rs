use bonding_errors::BondingError;
use soroban_sdk::{Address, Env};

use crate::access::{self, Role};
use crate::events;
use crate::types::DataKey;

pub fn is_paused(e: &Env) -> bool {
    e.storage().instance().get(&DataKey::Paused).unwrap_or(false)
}

pub fn require_not_paused(e: &Env) -> Result<(), BondingError> {
    if is_paused(e) {
        return Err(BondingError::ContractPaused);
    }
    Ok(())
}

pub fn pause(e: &Env, manager: &Address) -> Result<(), BondingError> {
    access::require_role(e, Role::Manager, manager)?;
    require_not_paused(e)?;
    e.storage().instance().set(&DataKey::Paused, &true);
    events::emit_paused(e, manager);
    Ok(())
}

pub fn unpause(e: &Env, manager: &Address) -> Result<(), BondingError> {
    access::require_role(e, Role::Manager, manager)?;
    if !is_paused(e) {
        return Err(BondingError::NotPaused);
    }
    e.storage().instance().set(&DataKey::Paused, &false);
    events::emit_unpaused(e, manager);
    Ok(())
}
