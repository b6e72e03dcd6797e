//! Capability table.
//!
//! Every privileged entry point names the role it needs. Roles are stored as
//! `Role(role, address) -> true` in instance storage and granted or revoked
//! by an `Owner`.

use bonding_errors::BondingError;
use soroban_sdk::{contracttype, Address, Env};

use crate::events;
use crate::types::DataKey;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    /// Grants and revokes roles, replaces collaborators.
    Owner = 1,
    /// Parameters, pause, migration window, peg defense.
    Manager = 2,
    /// May open positions funded by itself on behalf of another owner.
    MinterAuthority = 3,
    /// May close matured positions on behalf of their owner.
    BurnerAuthority = 4,
}

pub fn has_role(e: &Env, role: Role, who: &Address) -> bool {
    e.storage()
        .instance()
        .get(&DataKey::Role(role, who.clone()))
        .unwrap_or(false)
}

/// Require `caller`'s signature and membership in `role`.
pub fn require_role(e: &Env, role: Role, caller: &Address) -> Result<(), BondingError> {
    caller.require_auth();
    if !has_role(e, role, caller) {
        return Err(BondingError::Unauthorized);
    }
    Ok(())
}

pub(crate) fn set_role(e: &Env, role: Role, who: &Address) {
    e.storage()
        .instance()
        .set(&DataKey::Role(role, who.clone()), &true);
}

pub fn grant_role(e: &Env, owner: &Address, role: Role, who: &Address) -> Result<(), BondingError> {
    require_role(e, Role::Owner, owner)?;
    set_role(e, role, who);
    events::emit_role_granted(e, role, who);
    Ok(())
}

/// Owners cannot drop their own `Owner` role, so at least one always remains.
pub fn revoke_role(
    e: &Env,
    owner: &Address,
    role: Role,
    who: &Address,
) -> Result<(), BondingError> {
    require_role(e, Role::Owner, owner)?;
    if role == Role::Owner && owner == who {
        return Err(BondingError::InvalidConfig);
    }
    e.storage()
        .instance()
        .remove(&DataKey::Role(role, who.clone()));
    events::emit_role_revoked(e, role, who);
    Ok(())
}
