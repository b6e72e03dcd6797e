#![cfg(test)]

use crate::access::Role;
use crate::test_helpers::*;
use bonding_errors::BondingError;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{vec, Address, Env, InvokeError};

fn rejected_paused<T>(result: Result<T, Result<BondingError, InvokeError>>) -> bool {
    matches!(result, Err(Ok(BondingError::ContractPaused)))
}

#[test]
fn test_pause_blocks_position_changes_but_allows_reads() {
    let e = Env::default();
    let carol = Address::generate(&e);
    let s = setup_with(&e, vec![&e, legacy_entry(&carol, PRINCIPAL, 1)], REWARD_PER_BLOCK);
    let id = s.client.deposit(&s.alice, &PRINCIPAL, &1);
    advance(&e, BLOCKS_PER_WEEK as u32);

    assert!(!s.client.is_paused());
    s.client.pause(&s.owner);
    assert!(s.client.is_paused());

    assert!(rejected_paused(s.client.try_deposit(&s.alice, &PRINCIPAL, &1)));
    assert!(rejected_paused(s.client.try_add_liquidity(&s.alice, &id, &1)));
    assert!(rejected_paused(s.client.try_remove_liquidity(&s.alice, &id, &1)));
    assert!(rejected_paused(s.client.try_claim_rewards(&s.alice, &id)));
    assert!(rejected_paused(s.client.try_transfer_position(&s.alice, &id, &s.bob)));
    assert!(rejected_paused(s.client.try_migrate(&carol)));

    // Reads still work.
    assert_eq!(s.client.get_position(&id).principal, PRINCIPAL);
    assert!(s.client.pending_reward(&id) > 0);

    s.client.unpause(&s.owner);
    assert!(!s.client.is_paused());
    s.client.claim_rewards(&s.alice, &id);
    s.client.migrate(&carol);
}

#[test]
fn test_pause_blocks_authority_paths() {
    let e = Env::default();
    let s = setup(&e);
    s.client.grant_role(&s.owner, &Role::MinterAuthority, &s.owner);
    s.client.grant_role(&s.owner, &Role::BurnerAuthority, &s.owner);
    let id = s.client.deposit(&s.alice, &PRINCIPAL, &1);
    s.client.pause(&s.owner);

    assert!(rejected_paused(s.client.try_mint_position(&s.owner, &s.bob, &PRINCIPAL, &1)));
    assert!(rejected_paused(s.client.try_burn_position(&s.owner, &id)));
}

#[test]
fn test_pause_state_errors() {
    let e = Env::default();
    let s = setup(&e);

    assert_eq!(
        s.client.try_unpause(&s.owner),
        Err(Ok(BondingError::NotPaused))
    );
    s.client.pause(&s.owner);
    assert_eq!(
        s.client.try_pause(&s.owner),
        Err(Ok(BondingError::ContractPaused))
    );
}

#[test]
fn test_pause_requires_manager() {
    let e = Env::default();
    let s = setup(&e);

    assert_eq!(
        s.client.try_pause(&s.alice),
        Err(Ok(BondingError::Unauthorized))
    );
    s.client.pause(&s.owner);
    assert_eq!(
        s.client.try_unpause(&s.alice),
        Err(Ok(BondingError::Unauthorized))
    );
}
