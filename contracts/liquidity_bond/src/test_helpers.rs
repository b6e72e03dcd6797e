//! Shared test helpers for liquidity_bond tests.
//!
//! Deploys the engine next to Stellar asset contracts for the liquidity unit,
//! the reward asset and both pool coins, plus a scriptable oracle and pool.

#![cfg(test)]

use crate::math::WAD;
use crate::parameters::BondingConfig;
use crate::types::{Collaborators, LegacyEntry};
use crate::{LiquidityBond, LiquidityBondClient};
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::token::{StellarAssetClient, TokenClient};
use soroban_sdk::{Address, Env, Vec};

/// Ledger sequence every test starts at.
pub const START_BLOCK: u32 = 100;
/// Short weeks keep maturity reachable without large ledger jumps.
pub const BLOCKS_PER_WEEK: u64 = 100;
/// Liquidity minted to each test user.
pub const DEFAULT_MINT: i128 = 1_000_000_000_000_000;
/// A typical deposit: 1 000 units at 7 decimals.
pub const PRINCIPAL: i128 = 10_000_000_000;
/// Shares of `PRINCIPAL` locked one week at the default rate.
pub const PRINCIPAL_ONE_WEEK_SHARES: i128 = 10_010_000_000;
/// Base emission per block used by most tests.
pub const REWARD_PER_BLOCK: i128 = 10_010_000;

// ─── Mock oracle ───────────────────────────────────────────────────────────

mod oracle_mock {
    use crate::math::WAD;
    use soroban_sdk::{contract, contractimpl, contracttype, Address, Env};

    #[contracttype]
    #[derive(Clone)]
    enum OracleKey {
        Price,
        UpdatedAt,
        Fail,
        Updates,
    }

    #[contract]
    pub struct MockOracle;

    #[contractimpl]
    impl MockOracle {
        /// Set the price and stamp the sample with the current ledger.
        pub fn set_price(e: Env, price: i128) {
            e.storage().instance().set(&OracleKey::Price, &price);
            e.storage()
                .instance()
                .set(&OracleKey::UpdatedAt, &(e.ledger().sequence() as u64));
        }

        pub fn set_updated_at(e: Env, block: u64) {
            e.storage().instance().set(&OracleKey::UpdatedAt, &block);
        }

        pub fn set_fail(e: Env, fail: bool) {
            e.storage().instance().set(&OracleKey::Fail, &fail);
        }

        pub fn consult(e: Env, _asset: Address) -> i128 {
            Self::check(&e);
            e.storage().instance().get(&OracleKey::Price).unwrap_or(WAD)
        }

        pub fn update(e: Env) {
            Self::check(&e);
            let updates: u32 = e.storage().instance().get(&OracleKey::Updates).unwrap_or(0);
            e.storage().instance().set(&OracleKey::Updates, &(updates + 1));
            e.storage()
                .instance()
                .set(&OracleKey::UpdatedAt, &(e.ledger().sequence() as u64));
        }

        pub fn last_update_block(e: Env) -> u64 {
            Self::check(&e);
            e.storage().instance().get(&OracleKey::UpdatedAt).unwrap_or(0)
        }

        pub fn update_count(e: Env) -> u32 {
            e.storage().instance().get(&OracleKey::Updates).unwrap_or(0)
        }

        fn check(e: &Env) {
            if e.storage().instance().get(&OracleKey::Fail).unwrap_or(false) {
                panic!("oracle unavailable");
            }
        }
    }
}

// ─── Mock pool ─────────────────────────────────────────────────────────────

mod pool_mock {
    use crate::math::BPS_DENOMINATOR;
    use soroban_sdk::token::TokenClient;
    use soroban_sdk::{contract, contractimpl, contracttype, Address, Env};

    #[contracttype]
    #[derive(Clone)]
    enum PoolKey {
        Lp,
        Coin(u32),
        RateBps,
        Fail,
    }

    /// Two-coin pool paying `amount * rate_bps / 10_000` of either coin per
    /// liquidity unit. Coins must be pre-funded.
    #[contract]
    pub struct MockPool;

    #[contractimpl]
    impl MockPool {
        pub fn init(e: Env, lp: Address, coin0: Address, coin1: Address, rate_bps: u32) {
            e.storage().instance().set(&PoolKey::Lp, &lp);
            e.storage().instance().set(&PoolKey::Coin(0), &coin0);
            e.storage().instance().set(&PoolKey::Coin(1), &coin1);
            e.storage().instance().set(&PoolKey::RateBps, &rate_bps);
        }

        pub fn set_fail(e: Env, fail: bool) {
            e.storage().instance().set(&PoolKey::Fail, &fail);
        }

        pub fn set_rate(e: Env, rate_bps: u32) {
            e.storage().instance().set(&PoolKey::RateBps, &rate_bps);
        }

        pub fn calc_withdraw_one_coin(e: Env, amount: i128, _coin: u32) -> i128 {
            Self::check(&e);
            Self::quote(&e, amount)
        }

        pub fn remove_liquidity_one_coin(
            e: Env,
            amount: i128,
            coin: u32,
            min_amount: i128,
            receiver: Address,
        ) -> i128 {
            Self::check(&e);
            let out = Self::quote(&e, amount);
            if out < min_amount {
                panic!("slippage");
            }
            let pool = e.current_contract_address();
            let lp: Address = e.storage().instance().get(&PoolKey::Lp).unwrap();
            TokenClient::new(&e, &lp).burn(&pool, &amount);
            let coin: Address = e.storage().instance().get(&PoolKey::Coin(coin)).unwrap();
            TokenClient::new(&e, &coin).transfer(&pool, &receiver, &out);
            out
        }

        fn quote(e: &Env, amount: i128) -> i128 {
            let rate: u32 = e.storage().instance().get(&PoolKey::RateBps).unwrap_or(0);
            amount * rate as i128 / BPS_DENOMINATOR
        }

        fn check(e: &Env) {
            if e.storage().instance().get(&PoolKey::Fail).unwrap_or(false) {
                panic!("pool failure");
            }
        }
    }
}

pub use oracle_mock::{MockOracle, MockOracleClient};
pub use pool_mock::{MockPool, MockPoolClient};

// ─── Setup ─────────────────────────────────────────────────────────────────

pub struct Setup<'a> {
    pub client: LiquidityBondClient<'a>,
    pub contract_id: Address,
    /// Holds Owner and Manager.
    pub owner: Address,
    pub alice: Address,
    pub bob: Address,
    pub treasury: Address,
    pub lp: TokenClient<'a>,
    pub lp_admin: StellarAssetClient<'a>,
    pub reward: TokenClient<'a>,
    pub coin0: TokenClient<'a>,
    pub coin1: TokenClient<'a>,
    pub oracle: MockOracleClient<'a>,
    pub pool: MockPoolClient<'a>,
}

pub fn test_config() -> BondingConfig {
    BondingConfig {
        blocks_per_week: BLOCKS_PER_WEEK,
        max_oracle_age: 1_000_000,
        ..BondingConfig::default()
    }
}

pub fn legacy_entry(holder: &Address, principal: i128, lock_weeks: u32) -> LegacyEntry {
    LegacyEntry {
        holder: holder.clone(),
        principal,
        lock_weeks,
    }
}

/// Engine with no legacy holders and `REWARD_PER_BLOCK` emission.
pub fn setup(e: &Env) -> Setup<'_> {
    setup_with(e, Vec::new(e), REWARD_PER_BLOCK)
}

/// Engine seeded with `legacy`; the snapshot total is minted into custody.
pub fn setup_with(e: &Env, legacy: Vec<LegacyEntry>, reward_per_block: i128) -> Setup<'_> {
    e.mock_all_auths();
    e.ledger().with_mut(|li| li.sequence_number = START_BLOCK);

    let contract_id = e.register(LiquidityBond, ());
    let client = LiquidityBondClient::new(e, &contract_id);
    let owner = Address::generate(e);
    let alice = Address::generate(e);
    let bob = Address::generate(e);
    let treasury = Address::generate(e);
    let token_admin = Address::generate(e);

    let lp_addr = e
        .register_stellar_asset_contract_v2(token_admin.clone())
        .address();
    let reward_addr = e
        .register_stellar_asset_contract_v2(contract_id.clone())
        .address();
    let coin0_addr = e
        .register_stellar_asset_contract_v2(token_admin.clone())
        .address();
    let coin1_addr = e
        .register_stellar_asset_contract_v2(token_admin.clone())
        .address();

    let oracle_id = e.register(MockOracle, ());
    let oracle = MockOracleClient::new(e, &oracle_id);
    oracle.set_price(&WAD);

    let pool_id = e.register(MockPool, ());
    let pool = MockPoolClient::new(e, &pool_id);
    pool.init(&lp_addr, &coin0_addr, &coin1_addr, &10_000);
    StellarAssetClient::new(e, &coin0_addr).mint(&pool_id, &DEFAULT_MINT);
    StellarAssetClient::new(e, &coin1_addr).mint(&pool_id, &DEFAULT_MINT);

    let lp_admin = StellarAssetClient::new(e, &lp_addr);
    let lp = TokenClient::new(e, &lp_addr);
    let expiry = e.ledger().sequence() + 100_000;
    for user in [&alice, &bob, &owner] {
        lp_admin.mint(user, &DEFAULT_MINT);
        lp.approve(user, &contract_id, &DEFAULT_MINT, &expiry);
    }

    let legacy_total: i128 = legacy.iter().map(|entry| entry.principal).sum();
    if legacy_total > 0 {
        lp_admin.mint(&contract_id, &legacy_total);
    }

    let collaborators = Collaborators {
        liquidity_token: lp_addr,
        reward_token: reward_addr.clone(),
        oracle: oracle_id,
        price_asset: coin0_addr.clone(),
        pool: pool_id,
        treasury: treasury.clone(),
    };
    client.initialize(&owner, &collaborators, &test_config(), &reward_per_block, &legacy);

    Setup {
        client,
        contract_id,
        owner,
        alice,
        bob,
        treasury,
        lp,
        lp_admin,
        reward: TokenClient::new(e, &reward_addr),
        coin0: TokenClient::new(e, &coin0_addr),
        coin1: TokenClient::new(e, &coin1_addr),
        oracle,
        pool,
    }
}

pub fn advance(e: &Env, blocks: u32) {
    e.ledger().with_mut(|li| li.sequence_number += blocks);
}

pub fn current_block(e: &Env) -> u64 {
    e.ledger().sequence() as u64
}

/// Sum of shares over the given position ids.
pub fn sum_shares(s: &Setup, ids: &[u64]) -> i128 {
    ids.iter().map(|id| s.client.get_position(id).shares).sum()
}
