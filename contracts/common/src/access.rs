use soroban_sdk::{symbol_short, Address, Env, Symbol};

// ── Storage Keys ─────────────────────────────────────────────────────────────

const OWNER: Symbol = symbol_short!("OWNER");
const PENDING_OWNER: Symbol = symbol_short!("PEND_OWN");
const PAUSED: Symbol = symbol_short!("PAUSED");

// ── Owner Record ─────────────────────────────────────────────────────────────

/// Stores `owner` as the sole holder of owner-gated capabilities.
/// Callers must verify authorization beforehand.
pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&OWNER, owner);
}

/// Returns the current owner, if one has been recorded.
pub fn get_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&OWNER)
}

/// Guard: `true` only when `caller` is the recorded owner.
pub fn is_owner(env: &Env, caller: &Address) -> bool {
    match get_owner(env) {
        Some(owner) => owner == *caller,
        None => false,
    }
}

// ── Two-step Transfer ────────────────────────────────────────────────────────

/// Records `new_owner` as the pending owner.
///
/// Returns `false` if `caller` is not the current owner. The caller must
/// have already been authenticated via `require_auth()`.
pub fn propose_owner(env: &Env, caller: &Address, new_owner: &Address) -> bool {
    if !is_owner(env, caller) {
        return false;
    }
    env.storage().instance().set(&PENDING_OWNER, new_owner);
    true
}

/// Returns the pending owner, if a transfer is in flight.
pub fn get_pending_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_OWNER)
}

/// Completes a pending transfer.
///
/// Returns the previous owner on success, or `None` when no transfer is
/// pending or `caller` is not the proposed owner.
pub fn accept_owner(env: &Env, caller: &Address) -> Option<Address> {
    let pending = get_pending_owner(env)?;
    if pending != *caller {
        return None;
    }
    let previous = get_owner(env)?;
    set_owner(env, caller);
    env.storage().instance().remove(&PENDING_OWNER);
    Some(previous)
}

/// Drops a pending transfer.
///
/// Returns the address that had been proposed, or `None` when `caller` is
/// not the owner or nothing was pending.
pub fn cancel_owner_transfer(env: &Env, caller: &Address) -> Option<Address> {
    if !is_owner(env, caller) {
        return None;
    }
    let pending = get_pending_owner(env)?;
    env.storage().instance().remove(&PENDING_OWNER);
    Some(pending)
}

// ── Pause Flag ───────────────────────────────────────────────────────────────

pub fn is_paused(env: &Env) -> bool {
    env.storage().instance().get(&PAUSED).unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&PAUSED, &paused);
}
