use soroban_sdk::{contracttype, Address, Env};

use crate::errors::Error;

// Storage key types for the contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,             // Address
    CollateralToken,   // Address, supplied by depositors, paid out on liquidation
    LoanToken,         // Address, lent to borrowers
    Initialized,       // bool flag to prevent re-initialization
    Account(Address),  // Account per participant
    TotalSupply,       // u128, sum of all supply principals
    TotalBorrows,      // u128, sum of all borrow principals (until a liquidation)
    TotalReserves,     // u128, never mutated after initialize
}

const TTL_THRESHOLD: u32 = 100_000;
const TTL_EXTEND_TO: u32 = 200_000;

/// Per-participant ledger record. Absent keys read back as all zeros.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Account {
    pub supply_principal: u128,
    pub borrow_principal: u128,
    pub supply_index: u128, // scaled 1e18
    pub borrow_index: u128, // scaled 1e18
    /// Ledger timestamp captured when the loan was opened.
    pub borrow_interest_index: u64,
}

/// Pool-wide aggregates, loaded and stored as three scalar keys.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PoolTotals {
    pub total_supply: u128,
    pub total_borrows: u128,
    pub total_reserves: u128,
}

pub fn ensure_initialized(env: &Env) -> Result<(), Error> {
    if !env
        .storage()
        .persistent()
        .get::<_, bool>(&DataKey::Initialized)
        .unwrap_or(false)
    {
        return Err(Error::NotInitialized);
    }
    bump_core_ttl(env);
    Ok(())
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage()
        .persistent()
        .get::<_, bool>(&DataKey::Initialized)
        .unwrap_or(false)
}

pub fn bump_core_ttl(env: &Env) {
    let persistent = env.storage().persistent();
    for key in [
        DataKey::Admin,
        DataKey::CollateralToken,
        DataKey::LoanToken,
        DataKey::Initialized,
        DataKey::TotalSupply,
        DataKey::TotalBorrows,
        DataKey::TotalReserves,
    ] {
        if persistent.has(&key) {
            persistent.extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
        }
    }
}

pub fn bump_account_ttl(env: &Env, user: &Address) {
    let persistent = env.storage().persistent();
    let key = DataKey::Account(user.clone());
    if persistent.has(&key) {
        persistent.extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

fn read_address(env: &Env, key: &DataKey) -> Result<Address, Error> {
    env.storage()
        .persistent()
        .get(key)
        .ok_or(Error::NotInitialized)
}

pub fn read_admin(env: &Env) -> Result<Address, Error> {
    read_address(env, &DataKey::Admin)
}

pub fn read_collateral_token(env: &Env) -> Result<Address, Error> {
    read_address(env, &DataKey::CollateralToken)
}

pub fn read_loan_token(env: &Env) -> Result<Address, Error> {
    read_address(env, &DataKey::LoanToken)
}

pub fn write_config(env: &Env, admin: &Address, collateral_token: &Address, loan_token: &Address) {
    let persistent = env.storage().persistent();
    persistent.set(&DataKey::Admin, admin);
    persistent.set(&DataKey::CollateralToken, collateral_token);
    persistent.set(&DataKey::LoanToken, loan_token);
    persistent.set(&DataKey::Initialized, &true);
}

/// Get-or-insert-default: an untouched participant reads as a zeroed record.
/// Nothing is written until the caller stores the record back.
pub fn read_account(env: &Env, user: &Address) -> Account {
    bump_account_ttl(env, user);
    env.storage()
        .persistent()
        .get(&DataKey::Account(user.clone()))
        .unwrap_or_default()
}

pub fn write_account(env: &Env, user: &Address, account: &Account) {
    env.storage()
        .persistent()
        .set(&DataKey::Account(user.clone()), account);
    bump_account_ttl(env, user);
}

pub fn read_totals(env: &Env) -> PoolTotals {
    let persistent = env.storage().persistent();
    PoolTotals {
        total_supply: persistent.get(&DataKey::TotalSupply).unwrap_or(0u128),
        total_borrows: persistent.get(&DataKey::TotalBorrows).unwrap_or(0u128),
        total_reserves: persistent.get(&DataKey::TotalReserves).unwrap_or(0u128),
    }
}

pub fn write_totals(env: &Env, totals: &PoolTotals) {
    let persistent = env.storage().persistent();
    persistent.set(&DataKey::TotalSupply, &totals.total_supply);
    persistent.set(&DataKey::TotalBorrows, &totals.total_borrows);
    persistent.set(&DataKey::TotalReserves, &totals.total_reserves);
}
