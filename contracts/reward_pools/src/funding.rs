//! Funding-ledger arithmetic.
//!
//! The ledger turns a finite reward budget into an emission schedule: a rate
//! per tick and a horizon (`end_tick`) past which nothing accrues. Every tick
//! of emission must reserve the staker share plus the referral share, so all
//! schedule math runs on [`effective_rate`], never on the nominal rate.

use common::bps::{bps_of_ceil, HUNDRED_PERCENT};

use crate::types::{FundingAccounted, FundingState};

/// Nominal rate inflated by the referral share, rounded up so the reserve
/// covers every floor-rounded referral payment.
pub fn effective_rate(reward_per_tick: i128, referral_bps: u32) -> i128 {
    reward_per_tick + bps_of_ceil(reward_per_tick, referral_bps)
}

/// Horizon and residual for a budget scheduled from some anchor tick.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Schedule {
    pub end_tick: u64,
    pub remainder: i128,
}

/// Spreads `budget` over whole ticks of `effective_rate` starting at `anchor`.
///
/// A zero rate cannot consume anything: the whole budget stays as remainder
/// and the horizon sits at the anchor.
pub fn schedule(anchor: u64, budget: i128, effective_rate: i128) -> Schedule {
    if effective_rate <= 0 {
        return Schedule {
            end_tick: anchor,
            remainder: budget,
        };
    }
    Schedule {
        end_tick: anchor.saturating_add(to_ticks(budget / effective_rate)),
        remainder: budget % effective_rate,
    }
}

/// Folds `delta` newly observed reward tokens into the schedule.
///
/// While the horizon is still ahead it is extended; once it has lapsed the
/// new horizon is anchored at `now`, so the dry gap is never paid for.
pub fn account(
    state: &FundingState,
    effective_rate: i128,
    now: u64,
    delta: i128,
) -> FundingAccounted {
    let available = state.unallocated_remainder + delta;
    let gap_anchored = now >= state.end_tick;
    let anchor = if gap_anchored { now } else { state.end_tick };
    let next = schedule(anchor, available, effective_rate);

    FundingAccounted {
        amount: delta,
        new_end_tick: next.end_tick,
        new_remainder: next.remainder,
        new_observed_balance: state.last_observed_balance + delta,
        gap_anchored,
    }
}

/// Budget already held but not yet emitted as of `now`.
pub fn future_unallocated(state: &FundingState, effective_rate: i128, now: u64) -> i128 {
    if now >= state.end_tick {
        return state.unallocated_remainder;
    }
    i128::from(state.end_tick - now) * effective_rate + state.unallocated_remainder
}

/// Rate that spreads `budget` over `window_ticks` once the referral share is
/// reserved. `None` when the window is empty.
pub fn recalculated_rate(budget: i128, window_ticks: u64, referral_bps: u32) -> Option<i128> {
    if window_ticks == 0 {
        return None;
    }
    let denom = i128::from(window_ticks) * i128::from(HUNDRED_PERCENT + referral_bps);
    Some(budget * i128::from(HUNDRED_PERCENT) / denom)
}

fn to_ticks(n: i128) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}
