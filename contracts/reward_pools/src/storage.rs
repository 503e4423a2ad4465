use soroban_sdk::{symbol_short, Address, Env, Symbol, Vec};

use crate::{
    types::{Config, EmergencyState, FundingState, Pool, Position},
    ContractError,
};

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");
const FUNDING: Symbol = symbol_short!("FUNDING");
const TOTAL_WEIGHT: Symbol = symbol_short!("TOT_WGHT");
const POOL_LIST: Symbol = symbol_short!("POOLS");
const EMERGENCY: Symbol = symbol_short!("EMRG");

// Per-pool and per-position persistent storage uses tuple keys.
const POOL: Symbol = symbol_short!("POOL");
const POSITION: Symbol = symbol_short!("POS");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Time source ──────────────────────────────────────────────────────────────

/// The engine's tick: the ledger sequence number.
pub fn current_tick(env: &Env) -> u64 {
    u64::from(env.ledger().sequence())
}

// ── Instance state ───────────────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn mark_initialized(env: &Env) {
    env.storage().instance().set(&INITIALIZED, &true);
}

pub fn load_config(env: &Env) -> Result<Config, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

pub fn save_config(env: &Env, config: &Config) {
    env.storage().instance().set(&CONFIG, config);
}

pub fn load_funding(env: &Env) -> Result<FundingState, ContractError> {
    env.storage()
        .instance()
        .get(&FUNDING)
        .ok_or(ContractError::NotInitialized)
}

pub fn save_funding(env: &Env, funding: &FundingState) {
    env.storage().instance().set(&FUNDING, funding);
}

pub fn total_weight(env: &Env) -> u64 {
    env.storage().instance().get(&TOTAL_WEIGHT).unwrap_or(0)
}

pub fn set_total_weight(env: &Env, weight: u64) {
    env.storage().instance().set(&TOTAL_WEIGHT, &weight);
}

pub fn emergency_state(env: &Env) -> EmergencyState {
    env.storage()
        .instance()
        .get(&EMERGENCY)
        .unwrap_or(EmergencyState::Normal)
}

pub fn set_emergency_state(env: &Env, state: EmergencyState) {
    env.storage().instance().set(&EMERGENCY, &state);
}

// ── Pool registry ────────────────────────────────────────────────────────────

/// Stake assets in registration order; a pool's id is its index here.
pub fn pool_list(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&POOL_LIST)
        .unwrap_or(Vec::new(env))
}

pub fn save_pool_list(env: &Env, pools: &Vec<Address>) {
    env.storage().instance().set(&POOL_LIST, pools);
}

fn pool_key(stake_asset: &Address) -> (Symbol, Address) {
    (POOL, stake_asset.clone())
}

pub fn has_pool(env: &Env, stake_asset: &Address) -> bool {
    env.storage().persistent().has(&pool_key(stake_asset))
}

pub fn load_pool(env: &Env, stake_asset: &Address) -> Result<Pool, ContractError> {
    let key = pool_key(stake_asset);
    let pool: Pool = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::NotFound)?;
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(pool)
}

pub fn save_pool(env: &Env, pool: &Pool) {
    let key = pool_key(&pool.stake_asset);
    env.storage().persistent().set(&key, pool);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn pool_asset_by_id(env: &Env, pool_id: u32) -> Result<Address, ContractError> {
    pool_list(env).get(pool_id).ok_or(ContractError::NotFound)
}

// ── Positions ────────────────────────────────────────────────────────────────

fn position_key(stake_asset: &Address, user: &Address) -> (Symbol, Address, Address) {
    (POSITION, stake_asset.clone(), user.clone())
}

pub fn load_position(env: &Env, stake_asset: &Address, user: &Address) -> Option<Position> {
    let key = position_key(stake_asset, user);
    let position: Option<Position> = env.storage().persistent().get(&key);
    if position.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    position
}

pub fn save_position(env: &Env, stake_asset: &Address, user: &Address, position: &Position) {
    let key = position_key(stake_asset, user);
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
