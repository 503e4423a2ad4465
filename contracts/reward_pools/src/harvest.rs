//! Harvest gating and the commission split.

use common::bps::bps_of;

/// `true` while the harvest interval since `last_harvest_tick` is still running.
pub fn is_gated(now: u64, last_harvest_tick: u64, interval_ticks: u64) -> bool {
    now.saturating_sub(last_harvest_tick) < interval_ticks
}

/// `true` while the position is inside its early-exit window.
pub fn in_early_exit_window(now: u64, deposit_tick: u64, window_ticks: u64) -> bool {
    now.saturating_sub(deposit_tick) < window_ticks
}

/// How a payable reward is divided.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Split {
    pub to_user: i128,
    pub commission: i128,
}

/// Divides `total` between the staker and the fee treasury.
///
/// The referral payment is not part of the split: it accrues in its own
/// index and is drawn from the reserved referral share.
pub fn split(total: i128, commission_bps: Option<u32>) -> Split {
    let commission = commission_bps.map_or(0, |bps| bps_of(total, bps));
    Split {
        to_user: total - commission,
        commission,
    }
}
