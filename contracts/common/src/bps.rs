//! Basis-point arithmetic.
//!
//! All percentages in the suite are expressed in basis points of
//! [`HUNDRED_PERCENT`]; callers validate that inputs do not exceed it.

/// Denominator for every basis-point value (100 % = 10 000 bps).
pub const HUNDRED_PERCENT: u32 = 10_000;

/// `amount · bps / HUNDRED_PERCENT`, rounded toward zero.
pub fn bps_of(amount: i128, bps: u32) -> i128 {
    amount * i128::from(bps) / i128::from(HUNDRED_PERCENT)
}

/// `amount · bps / HUNDRED_PERCENT`, rounded up for non-negative `amount`.
pub fn bps_of_ceil(amount: i128, bps: u32) -> i128 {
    let denom = i128::from(HUNDRED_PERCENT);
    (amount * i128::from(bps) + denom - 1) / denom
}

/// Share of `part` in `whole`, in basis points. Zero when `whole` is zero.
pub fn share_bps(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    let share = u128::from(part) * u128::from(HUNDRED_PERCENT) / u128::from(whole);
    share.min(u128::from(HUNDRED_PERCENT)) as u32
}

/// `true` when `bps` is a valid fraction of [`HUNDRED_PERCENT`].
pub fn is_valid_bps(bps: u32) -> bool {
    bps <= HUNDRED_PERCENT
}
