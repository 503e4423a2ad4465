use soroban_sdk::{contracttype, Address};

// ── Global state ─────────────────────────────────────────────────────────────

/// Owner-tunable parameters. Stored once in instance storage.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub reward_token: Address,
    pub fee_treasury: Address,
    /// Optional second address allowed to call `set_rate` / `recalculate_rate`.
    pub rate_updater: Option<Address>,
    pub referral_bps: u32,
    pub harvest_interval_ticks: u64,
    pub ticks_per_day: u64,
    pub estimation_period_days: u64,
}

/// The funding ledger: emission rate and the horizon the held budget covers.
///
/// Invariants: `end_tick >= start_tick`, and
/// `unallocated_remainder < effective_rate` whenever the effective rate is
/// non-zero. With a referral share the remainder may reach
/// `reward_per_tick`, since whole ticks are carved at the effective rate.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundingState {
    pub reward_per_tick: i128,
    pub start_tick: u64,
    pub end_tick: u64,
    pub unallocated_remainder: i128,
    pub last_observed_balance: i128,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum EmergencyState {
    Normal = 0,
    NormalForever = 1,
    EmergencyForever = 2,
}

// ── Pools and positions ──────────────────────────────────────────────────────

/// One staking pool, keyed by its stake asset.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub stake_asset: Address,
    pub weight: u64,
    /// Reward per staked unit since inception, scaled by `rewards::SCALE`.
    pub acc_reward_per_share: i128,
    /// Referral reserve per staked unit, accrued at the share in force
    /// during each sync window. Same scale as `acc_reward_per_share`.
    pub acc_referral_per_share: i128,
    pub last_synced_tick: u64,
    pub total_staked: i128,
    pub early_exit_commission_bps: u32,
    pub early_exit_window_ticks: u64,
}

/// A user's stake in one pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    pub staked: i128,
    /// Pool accumulator value at the position's last sync.
    pub reward_debt: i128,
    /// Reward already earned but held back by the harvest interval.
    pub stored_reward: i128,
    /// Referral accumulator value at the position's last sync.
    pub referral_debt: i128,
    /// Referral owed to the bound referrer but not yet paid.
    pub stored_referral: i128,
    pub referrer: Option<Address>,
    pub last_harvest_tick: u64,
    /// Tick of the most recent deposit with a positive amount.
    pub deposit_tick: u64,
}

impl Position {
    pub fn opened_at(tick: u64) -> Self {
        Position {
            staked: 0,
            reward_debt: 0,
            stored_reward: 0,
            referral_debt: 0,
            stored_referral: 0,
            referrer: None,
            last_harvest_tick: tick,
            deposit_tick: tick,
        }
    }
}

// ── Operation results ────────────────────────────────────────────────────────

/// Result of an `account_new_funding` call that found new reward tokens.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundingAccounted {
    pub amount: i128,
    pub new_end_tick: u64,
    pub new_remainder: i128,
    pub new_observed_balance: i128,
    /// `true` when the horizon had lapsed and was re-anchored at the current tick.
    pub gap_anchored: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FundingOutcome {
    NothingToAccount,
    Accounted(FundingAccounted),
}

/// What a harvest (or a withdraw's settlement) did with the pending reward.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HarvestReceipt {
    /// Reward sent to the staker after commission.
    pub paid: i128,
    pub commission: i128,
    pub referral: i128,
    /// Reward left in `stored_reward` because the interval had not elapsed.
    pub deferred: i128,
}

// ── Read views ───────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolInfo {
    pub pool_id: u32,
    pub stake_asset: Address,
    pub weight: u64,
    /// Share of total weight in basis points.
    pub share_bps: u32,
    pub acc_reward_per_share: i128,
    pub acc_referral_per_share: i128,
    pub last_synced_tick: u64,
    pub total_staked: i128,
    pub early_exit_commission_bps: u32,
    pub early_exit_window_ticks: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionInfo {
    pub staked: i128,
    pub pending_reward: i128,
    pub stored_reward: i128,
    /// Referral the bound referrer would receive on the next payout.
    pub pending_referral: i128,
    pub referrer: Option<Address>,
    pub last_harvest_tick: u64,
    pub deposit_tick: u64,
}

/// Snapshot of every global knob, returned by `get_settings`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    pub reward_token: Address,
    pub fee_treasury: Address,
    pub rate_updater: Option<Address>,
    pub reward_per_tick: i128,
    pub effective_rate: i128,
    pub referral_bps: u32,
    pub harvest_interval_ticks: u64,
    pub ticks_per_day: u64,
    pub estimation_period_days: u64,
    pub start_tick: u64,
    pub end_tick: u64,
    pub total_weight: u64,
    pub pool_count: u32,
    pub emergency_state: EmergencyState,
    pub paused: bool,
}
