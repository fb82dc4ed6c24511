use soroban_sdk::{token, Address, Env};

use crate::errors::Error;
use crate::storage::read_admin;

pub fn to_i128(amount: u128) -> Result<i128, Error> {
    i128::try_from(amount).map_err(|_| Error::ArithmeticFault)
}

/// Pulls `amount` of `token` from `holder` into pool custody. The holder must
/// have approved the pool as spender beforehand.
pub fn pull_from(env: &Env, token: &Address, holder: &Address, amount: u128) -> Result<(), Error> {
    let pool = env.current_contract_address();
    let amount_i128 = to_i128(amount)?;
    match token::Client::new(env, token).try_transfer_from(&pool, holder, &pool, &amount_i128) {
        Ok(Ok(_)) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}

/// Pays `amount` of `token` out of pool custody to `to`.
pub fn push(env: &Env, token: &Address, to: &Address, amount: u128) -> Result<(), Error> {
    let pool = env.current_contract_address();
    let amount_i128 = to_i128(amount)?;
    match token::Client::new(env, token).try_transfer(&pool, to, &amount_i128) {
        Ok(Ok(_)) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}

/// A negative balance from a non-conforming token is an `ArithmeticFault`.
pub fn balance_of(env: &Env, token: &Address, holder: &Address) -> Result<u128, Error> {
    let bal = token::Client::new(env, token).balance(holder);
    u128::try_from(bal).map_err(|_| Error::ArithmeticFault)
}

pub fn pool_balance(env: &Env, token: &Address) -> Result<u128, Error> {
    balance_of(env, token, &env.current_contract_address())
}

pub fn require_admin(env: &Env, admin: &Address) -> Result<(), Error> {
    let stored = read_admin(env)?;
    if stored != *admin {
        return Err(Error::Unauthorized);
    }
    admin.require_auth();
    Ok(())
}
