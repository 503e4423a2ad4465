//! Emergency-state machine.
//!
//! `Normal` may move once to either terminal state. Nothing leaves a
//! terminal state, and `Normal` is never a valid target.

use crate::{types::EmergencyState, ContractError};

pub fn is_terminal(state: EmergencyState) -> bool {
    !matches!(state, EmergencyState::Normal)
}

/// Validates `current -> target`, returning the new state.
pub fn transition(
    current: EmergencyState,
    target: EmergencyState,
) -> Result<EmergencyState, ContractError> {
    if is_terminal(current) {
        return Err(ContractError::ForeverStateLocked);
    }
    if target == EmergencyState::Normal {
        return Err(ContractError::InvalidState);
    }
    Ok(target)
}
