//! Pool accumulator math.
//!
//! Each pool keeps a running "reward per staked unit" index. A position's
//! reward is its stake times the index growth since its last sync.

use common::bps::bps_of;

use crate::types::Pool;

/// Fixed-point scale of `acc_reward_per_share`.
pub const SCALE: i128 = 1_000_000_000_000;

/// Reward a pool earns over `elapsed` ticks given its weight.
pub fn pool_emission(elapsed: u64, reward_per_tick: i128, weight: u64, total_weight: u64) -> i128 {
    if total_weight == 0 || elapsed == 0 {
        return 0;
    }
    i128::from(elapsed) * reward_per_tick * i128::from(weight) / i128::from(total_weight)
}

/// Pool state advanced to `up_to`.
///
/// Ticks spent with no stake are skipped, not banked. `up_to` behind the
/// pool's last sync is a no-op. The referral index grows by `referral_bps`
/// of the window's emission, so a later share change never reaches back.
pub fn synced(
    pool: &Pool,
    reward_per_tick: i128,
    referral_bps: u32,
    total_weight: u64,
    up_to: u64,
) -> Pool {
    let mut next = pool.clone();
    if up_to <= pool.last_synced_tick {
        return next;
    }
    if pool.total_staked > 0 {
        let elapsed = up_to - pool.last_synced_tick;
        let emission = pool_emission(elapsed, reward_per_tick, pool.weight, total_weight);
        next.acc_reward_per_share += emission * SCALE / pool.total_staked;
        next.acc_referral_per_share +=
            bps_of(emission, referral_bps) * SCALE / pool.total_staked;
    }
    next.last_synced_tick = up_to;
    next
}

/// Amount earned by `staked` units since the index read `debt`.
///
/// Used for both the reward and the referral index.
pub fn earned(staked: i128, acc_per_share: i128, debt: i128) -> i128 {
    staked * (acc_per_share - debt) / SCALE
}
