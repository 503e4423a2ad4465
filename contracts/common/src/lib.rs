//! Shared capability primitives for the reward-pool contract suite.
//!
//! This crate provides:
//! - [`access`]: the owner record (with two-step transfer) and the pause flag.
//! - [`bps`]: basis-point arithmetic over [`bps::HUNDRED_PERCENT`].
//!
//! The helpers only touch storage of the calling contract; authentication
//! (`require_auth`) stays with the caller, and every guard reports a plain
//! `bool`/`Option` so each contract can map it onto its own error enum.

#![cfg_attr(not(feature = "std"), no_std)]

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod access;
pub mod bps;

pub use access::*;
pub use bps::*;
