#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::{
    storage::current_tick,
    types::{EmergencyState, FundingAccounted, HarvestReceipt},
};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub reward_token: Address,
    pub fee_treasury: Address,
    pub reward_per_tick: i128,
    pub tick: u64,
}

/// Fired when a new stake asset gets a pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pool_id: u32,
    pub stake_asset: Address,
    pub weight: u64,
    pub total_weight: u64,
    pub tick: u64,
}

/// Fired when a pool is re-weighted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WeightSetEvent {
    pub pool_id: u32,
    pub old_weight: u64,
    pub new_weight: u64,
    pub total_weight: u64,
    pub tick: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EarlyExitParamsSetEvent {
    pub pool_id: u32,
    pub commission_bps: u32,
    pub window_ticks: u64,
    pub tick: u64,
}

/// Fired when a user deposits stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub user: Address,
    pub stake_asset: Address,
    pub amount: i128,
    pub new_staked: i128,
    pub tick: u64,
}

/// Fired when a user withdraws stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub user: Address,
    pub stake_asset: Address,
    pub amount: i128,
    pub new_staked: i128,
    pub tick: u64,
}

/// Fired when pending reward is paid out.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarvestedEvent {
    pub user: Address,
    pub stake_asset: Address,
    pub paid: i128,
    pub commission: i128,
    pub referral: i128,
    pub referrer: Option<Address>,
    pub tick: u64,
}

/// Fired when a harvest lands inside the harvest interval.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarvestDeferredEvent {
    pub user: Address,
    pub stake_asset: Address,
    pub stored_reward: i128,
    pub tick: u64,
}

/// Fired when a user pulls their stake and forfeits reward.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyExitEvent {
    pub user: Address,
    pub stake_asset: Address,
    pub amount: i128,
    pub forfeited: i128,
    pub tick: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferrerBoundEvent {
    pub user: Address,
    pub stake_asset: Address,
    pub referrer: Address,
    pub tick: u64,
}

/// Fired when new reward tokens extend or re-anchor the funding horizon.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundingAccountedEvent {
    pub amount: i128,
    pub new_end_tick: u64,
    pub new_remainder: i128,
    pub new_observed_balance: i128,
    pub gap_anchored: bool,
    pub tick: u64,
}

/// Fired whenever the emission rate changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateChangedEvent {
    pub new_rate: i128,
    pub new_end_tick: u64,
    pub tick: u64,
}

/// Fired when a numeric global setting changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SettingUpdatedEvent {
    pub name: Symbol,
    pub value: u64,
    pub tick: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddressUpdatedEvent {
    pub address: Option<Address>,
    pub tick: u64,
}

/// Fired on every owner-initiated token transfer out of the contract.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetRecoveredEvent {
    pub asset: Address,
    pub to: Address,
    pub amount: i128,
    pub tick: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseChangedEvent {
    pub paused: bool,
    pub tick: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyStateChangedEvent {
    pub from: EmergencyState,
    pub to: EmergencyState,
    pub tick: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferEvent {
    pub from: Address,
    pub to: Address,
    pub tick: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    reward_token: Address,
    fee_treasury: Address,
    reward_per_tick: i128,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            reward_token,
            fee_treasury,
            reward_per_tick,
            tick: current_tick(env),
        },
    );
}

pub fn publish_pool_added(
    env: &Env,
    pool_id: u32,
    stake_asset: Address,
    weight: u64,
    total_weight: u64,
) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), stake_asset.clone()),
        PoolAddedEvent {
            pool_id,
            stake_asset,
            weight,
            total_weight,
            tick: current_tick(env),
        },
    );
}

pub fn publish_weight_set(
    env: &Env,
    pool_id: u32,
    old_weight: u64,
    new_weight: u64,
    total_weight: u64,
) {
    env.events().publish(
        (symbol_short!("WGHT_SET"), pool_id),
        WeightSetEvent {
            pool_id,
            old_weight,
            new_weight,
            total_weight,
            tick: current_tick(env),
        },
    );
}

pub fn publish_early_exit_params_set(env: &Env, pool_id: u32, commission_bps: u32, window_ticks: u64) {
    env.events().publish(
        (symbol_short!("EXIT_SET"), pool_id),
        EarlyExitParamsSetEvent {
            pool_id,
            commission_bps,
            window_ticks,
            tick: current_tick(env),
        },
    );
}

pub fn publish_deposited(
    env: &Env,
    user: Address,
    stake_asset: Address,
    amount: i128,
    new_staked: i128,
) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), user.clone()),
        DepositedEvent {
            user,
            stake_asset,
            amount,
            new_staked,
            tick: current_tick(env),
        },
    );
}

pub fn publish_withdrawn(
    env: &Env,
    user: Address,
    stake_asset: Address,
    amount: i128,
    new_staked: i128,
) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), user.clone()),
        WithdrawnEvent {
            user,
            stake_asset,
            amount,
            new_staked,
            tick: current_tick(env),
        },
    );
}

pub fn publish_harvested(
    env: &Env,
    user: Address,
    stake_asset: Address,
    receipt: &HarvestReceipt,
    referrer: Option<Address>,
) {
    env.events().publish(
        (symbol_short!("HARVEST"), user.clone()),
        HarvestedEvent {
            user,
            stake_asset,
            paid: receipt.paid,
            commission: receipt.commission,
            referral: receipt.referral,
            referrer,
            tick: current_tick(env),
        },
    );
}

pub fn publish_harvest_deferred(env: &Env, user: Address, stake_asset: Address, stored_reward: i128) {
    env.events().publish(
        (symbol_short!("HRV_DEFER"), user.clone()),
        HarvestDeferredEvent {
            user,
            stake_asset,
            stored_reward,
            tick: current_tick(env),
        },
    );
}

pub fn publish_emergency_exit(
    env: &Env,
    user: Address,
    stake_asset: Address,
    amount: i128,
    forfeited: i128,
) {
    env.events().publish(
        (symbol_short!("EMRG_EXIT"), user.clone()),
        EmergencyExitEvent {
            user,
            stake_asset,
            amount,
            forfeited,
            tick: current_tick(env),
        },
    );
}

pub fn publish_referrer_bound(env: &Env, user: Address, stake_asset: Address, referrer: Address) {
    env.events().publish(
        (symbol_short!("REF_BIND"), referrer.clone()),
        ReferrerBoundEvent {
            user,
            stake_asset,
            referrer,
            tick: current_tick(env),
        },
    );
}

pub fn publish_no_funding_accounted(env: &Env) {
    env.events()
        .publish((symbol_short!("NO_FUND"),), current_tick(env));
}

pub fn publish_funding_accounted(env: &Env, accounted: &FundingAccounted) {
    env.events().publish(
        (symbol_short!("FUNDED"),),
        FundingAccountedEvent {
            amount: accounted.amount,
            new_end_tick: accounted.new_end_tick,
            new_remainder: accounted.new_remainder,
            new_observed_balance: accounted.new_observed_balance,
            gap_anchored: accounted.gap_anchored,
            tick: current_tick(env),
        },
    );
}

pub fn publish_rate_recalculated(env: &Env, new_rate: i128, new_end_tick: u64) {
    env.events().publish(
        (symbol_short!("RATE_CALC"),),
        RateChangedEvent {
            new_rate,
            new_end_tick,
            tick: current_tick(env),
        },
    );
}

pub fn publish_rate_set(env: &Env, new_rate: i128, new_end_tick: u64) {
    env.events().publish(
        (symbol_short!("RATE_SET"),),
        RateChangedEvent {
            new_rate,
            new_end_tick,
            tick: current_tick(env),
        },
    );
}

pub fn publish_setting_updated(env: &Env, name: Symbol, value: u64) {
    env.events().publish(
        (symbol_short!("SETTING"), name.clone()),
        SettingUpdatedEvent {
            name,
            value,
            tick: current_tick(env),
        },
    );
}

pub fn publish_treasury_updated(env: &Env, fee_treasury: Address) {
    env.events().publish(
        (symbol_short!("TREASURY"),),
        AddressUpdatedEvent {
            address: Some(fee_treasury),
            tick: current_tick(env),
        },
    );
}

pub fn publish_rate_updater_set(env: &Env, rate_updater: Option<Address>) {
    env.events().publish(
        (symbol_short!("RATE_UPD"),),
        AddressUpdatedEvent {
            address: rate_updater,
            tick: current_tick(env),
        },
    );
}

pub fn publish_asset_recovered(env: &Env, asset: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RECOVERED"), asset.clone()),
        AssetRecoveredEvent {
            asset,
            to,
            amount,
            tick: current_tick(env),
        },
    );
}

pub fn publish_unallocated_withdrawn(env: &Env, asset: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("UNALLOC"), asset.clone()),
        AssetRecoveredEvent {
            asset,
            to,
            amount,
            tick: current_tick(env),
        },
    );
}

pub fn publish_emergency_recovered(env: &Env, asset: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("EMRG_RCVR"), asset.clone()),
        AssetRecoveredEvent {
            asset,
            to,
            amount,
            tick: current_tick(env),
        },
    );
}

pub fn publish_pause_changed(env: &Env, paused: bool) {
    let topic = if paused {
        symbol_short!("PAUSED")
    } else {
        symbol_short!("UNPAUSED")
    };
    env.events().publish(
        (topic,),
        PauseChangedEvent {
            paused,
            tick: current_tick(env),
        },
    );
}

pub fn publish_emergency_state_changed(env: &Env, from: EmergencyState, to: EmergencyState) {
    env.events().publish(
        (symbol_short!("EMRG_SET"),),
        EmergencyStateChangedEvent {
            from,
            to,
            tick: current_tick(env),
        },
    );
}

pub fn publish_owner_transfer_proposed(env: &Env, from: Address, to: Address) {
    env.events().publish(
        (symbol_short!("OWN_PROP"), from.clone()),
        OwnerTransferEvent {
            from,
            to,
            tick: current_tick(env),
        },
    );
}

pub fn publish_owner_transfer_accepted(env: &Env, from: Address, to: Address) {
    env.events().publish(
        (symbol_short!("OWN_ACPT"), to.clone()),
        OwnerTransferEvent {
            from,
            to,
            tick: current_tick(env),
        },
    );
}

pub fn publish_owner_transfer_cancelled(env: &Env, from: Address, to: Address) {
    env.events().publish(
        (symbol_short!("OWN_CNCL"), from.clone()),
        OwnerTransferEvent {
            from,
            to,
            tick: current_tick(env),
        },
    );
}
