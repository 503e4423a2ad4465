#![no_std]

pub mod custody;
pub mod emergency;
pub mod events;
pub mod funding;
pub mod harvest;
pub mod rewards;
pub mod storage;
pub mod types;

use common::{access, bps};
use soroban_sdk::{contract, contractimpl, log, symbol_short, Address, Env, Vec};

use storage::current_tick;
pub use types::*;

// ── Defaults ─────────────────────────────────────────────────────────────────

/// Ledgers close roughly every five seconds.
pub const DEFAULT_TICKS_PER_DAY: u64 = 17_280;
pub const DEFAULT_ESTIMATION_PERIOD_DAYS: u64 = 30;
/// Eight hours.
pub const DEFAULT_HARVEST_INTERVAL_TICKS: u64 = 5_760;
/// Fourteen days.
pub const DEFAULT_EARLY_EXIT_WINDOW_TICKS: u64 = 241_920;
pub const DEFAULT_EARLY_EXIT_COMMISSION_BPS: u32 = 1_000;
pub const DEFAULT_REFERRAL_BPS: u32 = 60;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    Paused = 4,
    NotFound = 5,
    AlreadyExists = 6,
    InsufficientBalance = 7,
    InvalidAddress = 8,
    ForbiddenAsset = 9,
    InvalidState = 10,
    /// The emergency state already reached a terminal value.
    ForeverStateLocked = 11,
    ExternalTransferFailed = 12,
    InvalidInput = 13,
    /// The contract holds fewer reward tokens than it last observed.
    FundingDeficit = 14,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct RewardPoolsContract;

#[contractimpl]
impl RewardPoolsContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `reward_token`    – SAC address of the token paid as reward.
    /// * `reward_per_tick` – nominal emission per ledger across all pools.
    /// * `fee_treasury`    – receiver of early-exit commission and forfeits.
    ///
    /// The funding horizon starts closed (`end_tick == start_tick`); nothing
    /// accrues until reward tokens are sent in and `account_new_funding` runs.
    pub fn initialize(
        env: Env,
        owner: Address,
        reward_token: Address,
        reward_per_tick: i128,
        fee_treasury: Address,
    ) -> Result<(), ContractError> {
        if storage::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        if reward_per_tick < 0 {
            return Err(ContractError::InvalidInput);
        }
        if fee_treasury == env.current_contract_address() {
            return Err(ContractError::InvalidAddress);
        }

        let now = current_tick(&env);
        storage::save_config(
            &env,
            &Config {
                reward_token: reward_token.clone(),
                fee_treasury: fee_treasury.clone(),
                rate_updater: None,
                referral_bps: DEFAULT_REFERRAL_BPS,
                harvest_interval_ticks: DEFAULT_HARVEST_INTERVAL_TICKS,
                ticks_per_day: DEFAULT_TICKS_PER_DAY,
                estimation_period_days: DEFAULT_ESTIMATION_PERIOD_DAYS,
            },
        );
        storage::save_funding(
            &env,
            &FundingState {
                reward_per_tick,
                start_tick: now,
                end_tick: now,
                unallocated_remainder: 0,
                last_observed_balance: 0,
            },
        );
        access::set_owner(&env, &owner);
        storage::mark_initialized(&env);

        events::publish_initialized(&env, owner, reward_token, fee_treasury, reward_per_tick);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` of `stake_asset` into its pool.
    ///
    /// Reward accrued so far is moved into `stored_reward`; deposits never pay
    /// out. A zero amount is a plain checkpoint. `referrer` is bound only if
    /// the position has none yet, and earns from the binding onward.
    pub fn deposit(
        env: Env,
        user: Address,
        stake_asset: Address,
        amount: i128,
        referrer: Option<Address>,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();
        Self::require_not_paused(&env)?;

        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        let now = current_tick(&env);
        let mut pool = Self::synced_pool(&env, &stake_asset)?;
        let mut position = storage::load_position(&env, &stake_asset, &user)
            .unwrap_or_else(|| Position::opened_at(now));

        Self::checkpoint(&pool, &mut position);

        let mut newly_bound = None;
        if let Some(referrer) = referrer {
            if referrer == user {
                return Err(ContractError::InvalidAddress);
            }
            if position.referrer.is_none() {
                position.referrer = Some(referrer.clone());
                newly_bound = Some(referrer);
            }
        }

        custody::transfer_in(&env, &stake_asset, &user, amount)?;

        position.staked += amount;
        if amount > 0 {
            position.deposit_tick = now;
        }
        pool.total_staked += amount;

        storage::save_pool(&env, &pool);
        storage::save_position(&env, &stake_asset, &user, &position);

        if let Some(referrer) = newly_bound {
            events::publish_referrer_bound(&env, user.clone(), stake_asset.clone(), referrer);
        }
        events::publish_deposited(&env, user, stake_asset, amount, position.staked);

        Ok(())
    }

    /// Withdraw `amount` of stake.
    ///
    /// Pending reward is settled through the harvest gate first: paid if the
    /// harvest interval has elapsed, otherwise kept in `stored_reward`.
    pub fn withdraw(
        env: Env,
        user: Address,
        stake_asset: Address,
        amount: i128,
    ) -> Result<HarvestReceipt, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();
        Self::require_not_paused(&env)?;

        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut pool = Self::synced_pool(&env, &stake_asset)?;
        let mut position = match storage::load_position(&env, &stake_asset, &user) {
            Some(position) => position,
            None if amount == 0 => return Ok(HarvestReceipt::default()),
            None => return Err(ContractError::InsufficientBalance),
        };
        if amount > position.staked {
            return Err(ContractError::InsufficientBalance);
        }

        let config = storage::load_config(&env)?;
        let mut funding = storage::load_funding(&env)?;
        let receipt = Self::settle(&env, &config, &mut funding, &pool, &mut position, &user)?;

        position.staked -= amount;
        pool.total_staked -= amount;

        custody::transfer_out(&env, &stake_asset, &user, amount)?;

        storage::save_funding(&env, &funding);
        storage::save_pool(&env, &pool);
        storage::save_position(&env, &stake_asset, &user, &position);

        events::publish_withdrawn(&env, user, stake_asset, amount, position.staked);

        Ok(receipt)
    }

    /// Collect pending reward, subject to the harvest interval.
    pub fn harvest(
        env: Env,
        user: Address,
        stake_asset: Address,
    ) -> Result<HarvestReceipt, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();
        Self::require_not_paused(&env)?;

        let pool = Self::synced_pool(&env, &stake_asset)?;
        let Some(mut position) = storage::load_position(&env, &stake_asset, &user) else {
            return Ok(HarvestReceipt::default());
        };

        let config = storage::load_config(&env)?;
        let mut funding = storage::load_funding(&env)?;
        let receipt = Self::settle(&env, &config, &mut funding, &pool, &mut position, &user)?;

        storage::save_funding(&env, &funding);
        storage::save_pool(&env, &pool);
        storage::save_position(&env, &stake_asset, &user, &position);

        Ok(receipt)
    }

    /// Withdraw the full stake and forfeit every unpaid reward.
    ///
    /// The forfeit, including any referral owed, goes to the fee treasury,
    /// capped at the observed balance. Returns the amount of stake sent back.
    pub fn emergency_exit(env: Env, user: Address, stake_asset: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();
        Self::require_not_paused(&env)?;

        let mut pool = Self::synced_pool(&env, &stake_asset)?;
        let Some(mut position) = storage::load_position(&env, &stake_asset, &user) else {
            return Ok(0);
        };

        let config = storage::load_config(&env)?;
        let mut funding = storage::load_funding(&env)?;

        Self::checkpoint(&pool, &mut position);
        let amount = position.staked;
        let forfeited = position.stored_reward + position.stored_referral;
        // Only short after an emergency recovery drained the reward balance.
        let swept = forfeited.min(funding.last_observed_balance);

        position.staked = 0;
        position.stored_reward = 0;
        position.stored_referral = 0;
        pool.total_staked -= amount;
        funding.last_observed_balance -= swept;

        custody::transfer_out(&env, &stake_asset, &user, amount)?;
        custody::transfer_out(&env, &config.reward_token, &config.fee_treasury, swept)?;

        storage::save_funding(&env, &funding);
        storage::save_pool(&env, &pool);
        storage::save_position(&env, &stake_asset, &user, &position);

        events::publish_emergency_exit(&env, user, stake_asset, amount, forfeited);

        Ok(amount)
    }

    // ── Pool accumulators ───────────────────────────────────────────────────

    /// Bring one pool's accumulator up to date.
    pub fn sync_pool(env: Env, pool_id: u32) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        let stake_asset = storage::pool_asset_by_id(&env, pool_id)?;
        let pool = Self::synced_pool(&env, &stake_asset)?;
        storage::save_pool(&env, &pool);
        Ok(())
    }

    /// Bring every pool's accumulator up to date.
    pub fn mass_sync(env: Env) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        let funding = storage::load_funding(&env)?;
        Self::sync_all(&env, &funding, false)
    }

    // ── Funding ledger ──────────────────────────────────────────────────────

    /// Fold reward tokens that arrived since the last call into the schedule.
    ///
    /// Anyone may call this. A lapsed horizon is re-anchored at the current
    /// tick; the unfunded gap earns nothing.
    pub fn account_new_funding(env: Env) -> Result<FundingOutcome, ContractError> {
        Self::require_initialized(&env)?;
        let config = storage::load_config(&env)?;
        let mut funding = storage::load_funding(&env)?;

        let balance = custody::balance(&env, &config.reward_token);
        if balance == funding.last_observed_balance {
            events::publish_no_funding_accounted(&env);
            return Ok(FundingOutcome::NothingToAccount);
        }
        if balance < funding.last_observed_balance {
            log!(&env, "reward balance below observed", balance, funding.last_observed_balance);
            return Err(ContractError::FundingDeficit);
        }

        let delta = balance - funding.last_observed_balance;
        let now = current_tick(&env);
        let eff = funding::effective_rate(funding.reward_per_tick, config.referral_bps);
        let accounted = funding::account(&funding, eff, now, delta);

        if accounted.gap_anchored {
            Self::sync_all(&env, &funding, true)?;
        }

        funding.end_tick = accounted.new_end_tick;
        funding.unallocated_remainder = accounted.new_remainder;
        funding.last_observed_balance = accounted.new_observed_balance;
        storage::save_funding(&env, &funding);

        log!(&env, "funding accounted", delta, accounted.new_end_tick, accounted.gap_anchored);
        events::publish_funding_accounted(&env, &accounted);

        Ok(FundingOutcome::Accounted(accounted))
    }

    /// Re-derive the rate so the unspent budget lasts
    /// `ticks_per_day · estimation_period_days` ticks.
    ///
    /// Callable by the owner or the rate updater. Returns the new rate.
    pub fn recalculate_rate(env: Env, caller: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        let config = storage::load_config(&env)?;
        Self::require_rate_updater(&env, &config, &caller)?;

        let mut funding = storage::load_funding(&env)?;
        let now = current_tick(&env);
        let eff = funding::effective_rate(funding.reward_per_tick, config.referral_bps);
        let budget = funding::future_unallocated(&funding, eff, now);
        let window = config.ticks_per_day * config.estimation_period_days;
        let new_rate = funding::recalculated_rate(budget, window, config.referral_bps)
            .ok_or(ContractError::InvalidState)?;

        Self::sync_all(&env, &funding, true)?;
        Self::reschedule(&env, &mut funding, new_rate, config.referral_bps, budget);
        storage::save_funding(&env, &funding);

        events::publish_rate_recalculated(&env, new_rate, funding.end_tick);

        Ok(new_rate)
    }

    /// Set the emission rate directly. Callable by the owner or the rate updater.
    pub fn set_rate(env: Env, caller: Address, new_rate: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        let config = storage::load_config(&env)?;
        Self::require_rate_updater(&env, &config, &caller)?;

        if new_rate < 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut funding = storage::load_funding(&env)?;
        let now = current_tick(&env);
        let eff = funding::effective_rate(funding.reward_per_tick, config.referral_bps);
        let budget = funding::future_unallocated(&funding, eff, now);

        Self::sync_all(&env, &funding, true)?;
        Self::reschedule(&env, &mut funding, new_rate, config.referral_bps, budget);
        storage::save_funding(&env, &funding);

        events::publish_rate_set(&env, new_rate, funding.end_tick);

        Ok(())
    }

    /// Pull `amount` of not-yet-emitted reward back to the owner.
    ///
    /// Only the unspent budget is eligible; reward already accrued to pools
    /// stays in the contract. The horizon shrinks accordingly.
    pub fn withdraw_unallocated(env: Env, caller: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        let config = storage::load_config(&env)?;
        let mut funding = storage::load_funding(&env)?;
        let now = current_tick(&env);
        let eff = funding::effective_rate(funding.reward_per_tick, config.referral_bps);
        let budget = funding::future_unallocated(&funding, eff, now);
        if amount > budget {
            return Err(ContractError::InsufficientBalance);
        }

        Self::sync_all(&env, &funding, true)?;
        let rate = funding.reward_per_tick;
        Self::reschedule(&env, &mut funding, rate, config.referral_bps, budget - amount);
        funding.last_observed_balance -= amount;
        storage::save_funding(&env, &funding);

        custody::transfer_out(&env, &config.reward_token, &caller, amount)?;

        events::publish_unallocated_withdrawn(&env, config.reward_token, caller, amount);

        Ok(())
    }

    // ── Pool registry ───────────────────────────────────────────────────────

    /// Register a pool for `stake_asset`. Returns the new pool id.
    pub fn add_pool(
        env: Env,
        caller: Address,
        stake_asset: Address,
        weight: u64,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let config = storage::load_config(&env)?;
        if stake_asset == config.reward_token {
            return Err(ContractError::ForbiddenAsset);
        }
        if storage::has_pool(&env, &stake_asset) {
            return Err(ContractError::AlreadyExists);
        }

        let funding = storage::load_funding(&env)?;
        Self::sync_all(&env, &funding, false)?;

        storage::save_pool(
            &env,
            &Pool {
                stake_asset: stake_asset.clone(),
                weight,
                acc_reward_per_share: 0,
                acc_referral_per_share: 0,
                last_synced_tick: current_tick(&env).min(funding.end_tick),
                total_staked: 0,
                early_exit_commission_bps: DEFAULT_EARLY_EXIT_COMMISSION_BPS,
                early_exit_window_ticks: DEFAULT_EARLY_EXIT_WINDOW_TICKS,
            },
        );

        let mut pools = storage::pool_list(&env);
        let pool_id = pools.len();
        pools.push_back(stake_asset.clone());
        storage::save_pool_list(&env, &pools);

        let total_weight = storage::total_weight(&env) + weight;
        storage::set_total_weight(&env, total_weight);

        events::publish_pool_added(&env, pool_id, stake_asset, weight, total_weight);

        Ok(pool_id)
    }

    /// Change a pool's weight. Every pool is synced first.
    pub fn set_weight(env: Env, caller: Address, pool_id: u32, weight: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let stake_asset = storage::pool_asset_by_id(&env, pool_id)?;
        let funding = storage::load_funding(&env)?;
        Self::sync_all(&env, &funding, false)?;

        let mut pool = storage::load_pool(&env, &stake_asset)?;
        let old_weight = pool.weight;
        pool.weight = weight;
        storage::save_pool(&env, &pool);

        let total_weight = storage::total_weight(&env) - old_weight + weight;
        storage::set_total_weight(&env, total_weight);

        events::publish_weight_set(&env, pool_id, old_weight, weight, total_weight);

        Ok(())
    }

    pub fn set_early_exit_params(
        env: Env,
        caller: Address,
        pool_id: u32,
        commission_bps: u32,
        window_ticks: u64,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        if !bps::is_valid_bps(commission_bps) {
            return Err(ContractError::InvalidInput);
        }

        let stake_asset = storage::pool_asset_by_id(&env, pool_id)?;
        let mut pool = storage::load_pool(&env, &stake_asset)?;
        pool.early_exit_commission_bps = commission_bps;
        pool.early_exit_window_ticks = window_ticks;
        storage::save_pool(&env, &pool);

        events::publish_early_exit_params_set(&env, pool_id, commission_bps, window_ticks);

        Ok(())
    }

    // ── Global settings ─────────────────────────────────────────────────────

    /// Change the referral share.
    ///
    /// The referral share is part of the effective rate, so the unspent
    /// budget is measured at the old share and rescheduled at the new one.
    /// Pools are synced first, so reward accrued so far keeps the old share.
    pub fn set_referral_bps(env: Env, caller: Address, referral_bps: u32) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        if !bps::is_valid_bps(referral_bps) {
            return Err(ContractError::InvalidInput);
        }

        let mut config = storage::load_config(&env)?;
        let mut funding = storage::load_funding(&env)?;
        let now = current_tick(&env);
        let eff = funding::effective_rate(funding.reward_per_tick, config.referral_bps);
        let budget = funding::future_unallocated(&funding, eff, now);

        Self::sync_all(&env, &funding, true)?;
        let rate = funding.reward_per_tick;
        Self::reschedule(&env, &mut funding, rate, referral_bps, budget);
        config.referral_bps = referral_bps;
        storage::save_funding(&env, &funding);
        storage::save_config(&env, &config);

        events::publish_setting_updated(&env, symbol_short!("REFERRAL"), u64::from(referral_bps));

        Ok(())
    }

    pub fn set_harvest_interval(env: Env, caller: Address, ticks: u64) -> Result<(), ContractError> {
        let mut config = Self::owner_config(&env, &caller)?;
        config.harvest_interval_ticks = ticks;
        storage::save_config(&env, &config);
        events::publish_setting_updated(&env, symbol_short!("HARV_INT"), ticks);
        Ok(())
    }

    pub fn set_ticks_per_day(env: Env, caller: Address, ticks: u64) -> Result<(), ContractError> {
        let mut config = Self::owner_config(&env, &caller)?;
        if ticks == 0 {
            return Err(ContractError::InvalidInput);
        }
        config.ticks_per_day = ticks;
        storage::save_config(&env, &config);
        events::publish_setting_updated(&env, symbol_short!("TICKS_DAY"), ticks);
        Ok(())
    }

    pub fn set_estimation_period_days(env: Env, caller: Address, days: u64) -> Result<(), ContractError> {
        let mut config = Self::owner_config(&env, &caller)?;
        if days == 0 {
            return Err(ContractError::InvalidInput);
        }
        config.estimation_period_days = days;
        storage::save_config(&env, &config);
        events::publish_setting_updated(&env, symbol_short!("EST_DAYS"), days);
        Ok(())
    }

    /// Designate (or clear) the address allowed to change the rate.
    pub fn set_rate_updater(
        env: Env,
        caller: Address,
        rate_updater: Option<Address>,
    ) -> Result<(), ContractError> {
        let mut config = Self::owner_config(&env, &caller)?;
        config.rate_updater = rate_updater.clone();
        storage::save_config(&env, &config);
        events::publish_rate_updater_set(&env, rate_updater);
        Ok(())
    }

    pub fn set_fee_treasury(env: Env, caller: Address, fee_treasury: Address) -> Result<(), ContractError> {
        let mut config = Self::owner_config(&env, &caller)?;
        if fee_treasury == env.current_contract_address() {
            return Err(ContractError::InvalidAddress);
        }
        config.fee_treasury = fee_treasury.clone();
        storage::save_config(&env, &config);
        events::publish_treasury_updated(&env, fee_treasury);
        Ok(())
    }

    // ── Pause and emergency ─────────────────────────────────────────────────

    pub fn pause(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;
        access::set_paused(&env, true);
        events::publish_pause_changed(&env, true);
        Ok(())
    }

    pub fn unpause(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;
        access::set_paused(&env, false);
        events::publish_pause_changed(&env, false);
        Ok(())
    }

    /// Move the emergency state out of `Normal`. Both targets are final.
    pub fn set_emergency_state(
        env: Env,
        caller: Address,
        state: EmergencyState,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let current = storage::emergency_state(&env);
        let next = emergency::transition(current, state)?;
        storage::set_emergency_state(&env, next);

        log!(&env, "emergency state changed", current as u32, next as u32);
        events::publish_emergency_state_changed(&env, current, next);

        Ok(())
    }

    /// Send a token that is not the reward token out of the contract.
    ///
    /// Stake assets are eligible too, which is how mis-sent tokens are
    /// returned; callers must not exceed what was sent in by mistake.
    pub fn recover_foreign_asset(
        env: Env,
        caller: Address,
        asset: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        let config = storage::load_config(&env)?;
        if asset == config.reward_token {
            return Err(ContractError::ForbiddenAsset);
        }
        Self::require_owner(&env, &caller)?;
        Self::require_recipient(&env, &to)?;
        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        custody::transfer_out(&env, &asset, &to, amount)?;

        events::publish_asset_recovered(&env, asset, to, amount);

        Ok(())
    }

    /// Last-resort transfer of reward tokens, only in `EmergencyForever`.
    ///
    /// Bypasses the schedule; the observed balance is lowered so later
    /// funding checks do not see a deficit.
    pub fn emergency_recover(
        env: Env,
        caller: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        if storage::emergency_state(&env) != EmergencyState::EmergencyForever {
            return Err(ContractError::InvalidState);
        }
        Self::require_recipient(&env, &to)?;
        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        let config = storage::load_config(&env)?;
        let mut funding = storage::load_funding(&env)?;
        funding.last_observed_balance = (funding.last_observed_balance - amount).max(0);
        storage::save_funding(&env, &funding);

        custody::transfer_out(&env, &config.reward_token, &to, amount)?;

        log!(&env, "emergency recovery", amount);
        events::publish_emergency_recovered(&env, config.reward_token, to, amount);

        Ok(())
    }

    // ── Ownership (two-step) ────────────────────────────────────────────────

    pub fn propose_owner(env: Env, caller: Address, new_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !access::propose_owner(&env, &caller, &new_owner) {
            return Err(ContractError::Unauthorized);
        }
        events::publish_owner_transfer_proposed(&env, caller, new_owner);
        Ok(())
    }

    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_owner.require_auth();
        let previous = access::accept_owner(&env, &new_owner).ok_or(ContractError::Unauthorized)?;
        events::publish_owner_transfer_accepted(&env, previous, new_owner);
        Ok(())
    }

    pub fn cancel_owner_transfer(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !access::is_owner(&env, &caller) {
            return Err(ContractError::Unauthorized);
        }
        let cancelled =
            access::cancel_owner_transfer(&env, &caller).ok_or(ContractError::InvalidInput)?;
        events::publish_owner_transfer_cancelled(&env, caller, cancelled);
        Ok(())
    }

    // ── View functions ──────────────────────────────────────────────────────

    /// Reward `user` would collect from `stake_asset`'s pool right now,
    /// ignoring the harvest gate.
    pub fn pending_reward(env: Env, stake_asset: Address, user: Address) -> Result<i128, ContractError> {
        let pool = Self::synced_pool(&env, &stake_asset)?;
        Ok(storage::load_position(&env, &stake_asset, &user)
            .map_or(0, |p| Self::pending_of(&pool, &p)))
    }

    pub fn get_staked(env: Env, stake_asset: Address, user: Address) -> i128 {
        storage::load_position(&env, &stake_asset, &user).map_or(0, |p| p.staked)
    }

    pub fn get_position(
        env: Env,
        stake_asset: Address,
        user: Address,
    ) -> Result<PositionInfo, ContractError> {
        let pool = Self::synced_pool(&env, &stake_asset)?;
        let position = storage::load_position(&env, &stake_asset, &user)
            .unwrap_or_else(|| Position::opened_at(0));
        Ok(PositionInfo {
            staked: position.staked,
            pending_reward: Self::pending_of(&pool, &position),
            stored_reward: position.stored_reward,
            pending_referral: Self::referral_of(&pool, &position),
            referrer: position.referrer,
            last_harvest_tick: position.last_harvest_tick,
            deposit_tick: position.deposit_tick,
        })
    }

    pub fn pool_count(env: Env) -> u32 {
        storage::pool_list(&env).len()
    }

    pub fn pool_exists(env: Env, stake_asset: Address) -> bool {
        storage::has_pool(&env, &stake_asset)
    }

    pub fn pool_id_of(env: Env, stake_asset: Address) -> Result<u32, ContractError> {
        storage::pool_list(&env)
            .first_index_of(&stake_asset)
            .ok_or(ContractError::NotFound)
    }

    pub fn get_pool(env: Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
        let stake_asset = storage::pool_asset_by_id(&env, pool_id)?;
        let pool = storage::load_pool(&env, &stake_asset)?;
        Ok(Self::pool_info(pool_id, pool, storage::total_weight(&env)))
    }

    pub fn get_pools(env: Env) -> Result<Vec<PoolInfo>, ContractError> {
        let total_weight = storage::total_weight(&env);
        let mut out = Vec::new(&env);
        for (pool_id, stake_asset) in storage::pool_list(&env).iter().enumerate() {
            let pool = storage::load_pool(&env, &stake_asset)?;
            out.push_back(Self::pool_info(pool_id as u32, pool, total_weight));
        }
        Ok(out)
    }

    pub fn get_settings(env: Env) -> Result<Settings, ContractError> {
        let config = storage::load_config(&env)?;
        let funding = storage::load_funding(&env)?;
        Ok(Settings {
            effective_rate: funding::effective_rate(funding.reward_per_tick, config.referral_bps),
            reward_token: config.reward_token,
            fee_treasury: config.fee_treasury,
            rate_updater: config.rate_updater,
            reward_per_tick: funding.reward_per_tick,
            referral_bps: config.referral_bps,
            harvest_interval_ticks: config.harvest_interval_ticks,
            ticks_per_day: config.ticks_per_day,
            estimation_period_days: config.estimation_period_days,
            start_tick: funding.start_tick,
            end_tick: funding.end_tick,
            total_weight: storage::total_weight(&env),
            pool_count: storage::pool_list(&env).len(),
            emergency_state: storage::emergency_state(&env),
            paused: access::is_paused(&env),
        })
    }

    pub fn get_funding(env: Env) -> Result<FundingState, ContractError> {
        storage::load_funding(&env)
    }

    /// Budget held but not yet emitted.
    pub fn future_unallocated_rewards(env: Env) -> Result<i128, ContractError> {
        let config = storage::load_config(&env)?;
        let funding = storage::load_funding(&env)?;
        let eff = funding::effective_rate(funding.reward_per_tick, config.referral_bps);
        Ok(funding::future_unallocated(&funding, eff, current_tick(&env)))
    }

    /// Reward tokens currently held by the contract.
    pub fn reward_balance(env: Env) -> Result<i128, ContractError> {
        let config = storage::load_config(&env)?;
        Ok(custody::balance(&env, &config.reward_token))
    }

    pub fn emergency_state(env: Env) -> EmergencyState {
        storage::emergency_state(&env)
    }

    pub fn is_paused(env: Env) -> bool {
        access::is_paused(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        access::get_owner(&env).ok_or(ContractError::NotInitialized)
    }

    pub fn get_pending_owner(env: Env) -> Option<Address> {
        access::get_pending_owner(&env)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !storage::is_initialized(env) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
        if !access::is_owner(env, caller) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Guard: owner or the designated rate updater.
    fn require_rate_updater(env: &Env, config: &Config, caller: &Address) -> Result<(), ContractError> {
        if config.rate_updater.as_ref() == Some(caller) {
            return Ok(());
        }
        Self::require_owner(env, caller)
    }

    fn require_not_paused(env: &Env) -> Result<(), ContractError> {
        if access::is_paused(env) {
            return Err(ContractError::Paused);
        }
        Ok(())
    }

    fn require_recipient(env: &Env, to: &Address) -> Result<(), ContractError> {
        if *to == env.current_contract_address() {
            return Err(ContractError::InvalidAddress);
        }
        Ok(())
    }

    /// Shared prologue of the plain owner-only setters.
    fn owner_config(env: &Env, caller: &Address) -> Result<Config, ContractError> {
        Self::require_initialized(env)?;
        caller.require_auth();
        Self::require_owner(env, caller)?;
        storage::load_config(env)
    }

    /// Load a pool and advance it to `min(now, end_tick)` without saving.
    fn synced_pool(env: &Env, stake_asset: &Address) -> Result<Pool, ContractError> {
        let config = storage::load_config(env)?;
        let funding = storage::load_funding(env)?;
        let pool = storage::load_pool(env, stake_asset)?;
        let up_to = current_tick(env).min(funding.end_tick);
        Ok(rewards::synced(
            &pool,
            funding.reward_per_tick,
            config.referral_bps,
            storage::total_weight(env),
            up_to,
        ))
    }

    /// Sync every pool against `funding` and the stored referral share.
    ///
    /// With `fast_forward` each pool's clock is then moved to the current
    /// tick, so a horizon re-anchored at `now` cannot pay for ticks that
    /// passed while it was lapsed.
    fn sync_all(env: &Env, funding: &FundingState, fast_forward: bool) -> Result<(), ContractError> {
        let referral_bps = storage::load_config(env)?.referral_bps;
        let now = current_tick(env);
        let up_to = now.min(funding.end_tick);
        let total_weight = storage::total_weight(env);
        for stake_asset in storage::pool_list(env).iter() {
            let pool = storage::load_pool(env, &stake_asset)?;
            let mut next =
                rewards::synced(&pool, funding.reward_per_tick, referral_bps, total_weight, up_to);
            if fast_forward && next.last_synced_tick < now {
                next.last_synced_tick = now;
            }
            storage::save_pool(env, &next);
        }
        Ok(())
    }

    /// Spread `budget` from the current tick at `rate`.
    fn reschedule(env: &Env, funding: &mut FundingState, rate: i128, referral_bps: u32, budget: i128) {
        let eff = funding::effective_rate(rate, referral_bps);
        let next = funding::schedule(current_tick(env), budget, eff);
        funding.reward_per_tick = rate;
        funding.end_tick = next.end_tick;
        funding.unallocated_remainder = next.remainder;
        log!(env, "rescheduled", rate, next.end_tick, next.remainder);
    }

    fn pending_of(pool: &Pool, position: &Position) -> i128 {
        position.stored_reward
            + rewards::earned(position.staked, pool.acc_reward_per_share, position.reward_debt)
    }

    /// Referral owed for `position`; nothing accrues while no referrer is bound.
    fn referral_of(pool: &Pool, position: &Position) -> i128 {
        if position.referrer.is_none() {
            return 0;
        }
        position.stored_referral
            + rewards::earned(position.staked, pool.acc_referral_per_share, position.referral_debt)
    }

    /// Move everything earned against `pool` into the stored fields and
    /// reset both debts. Must run before the stake or the referrer changes.
    fn checkpoint(pool: &Pool, position: &mut Position) {
        position.stored_referral = Self::referral_of(pool, position);
        position.stored_reward = Self::pending_of(pool, position);
        position.reward_debt = pool.acc_reward_per_share;
        position.referral_debt = pool.acc_referral_per_share;
    }

    fn pool_info(pool_id: u32, pool: Pool, total_weight: u64) -> PoolInfo {
        PoolInfo {
            pool_id,
            share_bps: bps::share_bps(pool.weight, total_weight),
            stake_asset: pool.stake_asset,
            weight: pool.weight,
            acc_reward_per_share: pool.acc_reward_per_share,
            acc_referral_per_share: pool.acc_referral_per_share,
            last_synced_tick: pool.last_synced_tick,
            total_staked: pool.total_staked,
            early_exit_commission_bps: pool.early_exit_commission_bps,
            early_exit_window_ticks: pool.early_exit_window_ticks,
        }
    }

    /// Pay out or defer a position's pending reward.
    ///
    /// `pool` must already be synced. Inside the harvest interval the reward
    /// and the referral owed stay parked in the position. Otherwise
    /// commission applies inside the early-exit window, the referrer gets
    /// what accrued for them, and the observed balance drops by everything
    /// sent.
    fn settle(
        env: &Env,
        config: &Config,
        funding: &mut FundingState,
        pool: &Pool,
        position: &mut Position,
        user: &Address,
    ) -> Result<HarvestReceipt, ContractError> {
        let now = current_tick(env);
        Self::checkpoint(pool, position);
        let total = position.stored_reward;

        if harvest::is_gated(now, position.last_harvest_tick, config.harvest_interval_ticks) {
            if total > 0 {
                events::publish_harvest_deferred(env, user.clone(), pool.stake_asset.clone(), total);
            }
            return Ok(HarvestReceipt {
                deferred: total,
                ..HarvestReceipt::default()
            });
        }

        let commission_bps = harvest::in_early_exit_window(
            now,
            position.deposit_tick,
            pool.early_exit_window_ticks,
        )
        .then_some(pool.early_exit_commission_bps);
        let split = harvest::split(total, commission_bps);
        let referral = position.stored_referral;

        custody::transfer_out(env, &config.reward_token, user, split.to_user)?;
        custody::transfer_out(env, &config.reward_token, &config.fee_treasury, split.commission)?;
        if let Some(referrer) = &position.referrer {
            custody::transfer_out(env, &config.reward_token, referrer, referral)?;
        }
        funding.last_observed_balance -= split.to_user + split.commission + referral;

        position.stored_reward = 0;
        position.stored_referral = 0;
        position.last_harvest_tick = now;

        let receipt = HarvestReceipt {
            paid: split.to_user,
            commission: split.commission,
            referral,
            deferred: 0,
        };
        if total > 0 {
            events::publish_harvested(
                env,
                user.clone(),
                pool.stake_asset.clone(),
                &receipt,
                position.referrer.clone(),
            );
        }
        Ok(receipt)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_funding;
