//! Token custody through the Stellar token interface.
//!
//! Failures come back as `ExternalTransferFailed`; the caller returns the
//! error and the host rolls back every write made by the invocation.

use soroban_sdk::{token, Address, Env};

use crate::ContractError;

/// Pulls `amount` of `asset` from `from` into the contract.
pub fn transfer_in(env: &Env, asset: &Address, from: &Address, amount: i128) -> Result<(), ContractError> {
    move_tokens(env, asset, from, &env.current_contract_address(), amount)
}

/// Sends `amount` of `asset` from the contract to `to`.
pub fn transfer_out(env: &Env, asset: &Address, to: &Address, amount: i128) -> Result<(), ContractError> {
    move_tokens(env, asset, &env.current_contract_address(), to, amount)
}

/// Contract's own balance of `asset`.
pub fn balance(env: &Env, asset: &Address) -> i128 {
    token::Client::new(env, asset).balance(&env.current_contract_address())
}

fn move_tokens(
    env: &Env,
    asset: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    if amount == 0 {
        return Ok(());
    }
    match token::Client::new(env, asset).try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(ContractError::ExternalTransferFailed),
    }
}
