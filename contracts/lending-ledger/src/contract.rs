use soroban_sdk::{contract, contractimpl, Address, Env};

use crate::errors::Error;
use crate::events::*;
use crate::helpers::*;
use crate::ledger;
use crate::storage::*;

#[contract]
pub struct LendingLedger;

#[contractimpl]
impl LendingLedger {
    /// Configure the pool: admin for sweeps, the collateral token accepted by
    /// `deposit`, and the loan token handed out by `borrow`.
    pub fn initialize(
        env: Env,
        admin: Address,
        collateral_token: Address,
        loan_token: Address,
    ) -> Result<(), Error> {
        if is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        if collateral_token == loan_token {
            return Err(Error::InvalidConfig);
        }
        admin.require_auth();
        write_config(&env, &admin, &collateral_token, &loan_token);
        write_totals(&env, &PoolTotals::default());
        bump_core_ttl(&env);

        LedgerInitialized {
            admin,
            collateral_token,
            loan_token,
        }
        .publish(&env);
        Ok(())
    }

    /// Supply collateral. The pool must already be approved as spender.
    pub fn deposit(env: Env, user: Address, amount: u128) -> Result<(), Error> {
        ensure_initialized(&env)?;
        user.require_auth();
        let collateral_token = read_collateral_token(&env)?;

        let mut totals = read_totals(&env);
        let mut account = read_account(&env, &user);
        ledger::deposit(&mut totals, &mut account, amount)?;

        pull_from(&env, &collateral_token, &user, amount)?;
        write_account(&env, &user, &account);
        write_totals(&env, &totals);

        Deposited {
            account: user,
            amount,
            supply_principal: account.supply_principal,
            supply_index: account.supply_index,
            total_supply: totals.total_supply,
        }
        .publish(&env);
        Ok(())
    }

    /// Withdraw supplied collateral
    pub fn withdraw(env: Env, user: Address, amount: u128) -> Result<(), Error> {
        ensure_initialized(&env)?;
        user.require_auth();
        let collateral_token = read_collateral_token(&env)?;

        let mut totals = read_totals(&env);
        let mut account = read_account(&env, &user);
        ledger::withdraw(&mut totals, &mut account, amount)?;

        push(&env, &collateral_token, &user, amount)?;
        write_account(&env, &user, &account);
        write_totals(&env, &totals);

        Withdrawn {
            account: user,
            amount,
            supply_principal: account.supply_principal,
            supply_index: account.supply_index,
            total_supply: totals.total_supply,
        }
        .publish(&env);
        Ok(())
    }

    /// Open the caller's single loan. Pool loan-token cash must cover the
    /// amount plus a 5% buffer; only `amount` is transferred and recorded.
    pub fn borrow(env: Env, user: Address, amount: u128) -> Result<(), Error> {
        ensure_initialized(&env)?;
        user.require_auth();
        let loan_token = read_loan_token(&env)?;

        let mut totals = read_totals(&env);
        let mut account = read_account(&env, &user);
        let pool_cash = pool_balance(&env, &loan_token)?;
        let now = Self::observation_instant(env.clone());
        ledger::borrow(&mut totals, &mut account, amount, pool_cash, now)?;

        push(&env, &loan_token, &user, amount)?;
        write_account(&env, &user, &account);
        write_totals(&env, &totals);

        Borrowed {
            borrower: user,
            amount,
            borrow_index: account.borrow_index,
            opened_at: now,
            total_borrows: totals.total_borrows,
        }
        .publish(&env);
        Ok(())
    }

    /// Repay part or all of the caller's loan. Repaying more than the
    /// outstanding principal is an `ArithmeticFault`.
    pub fn repay(env: Env, user: Address, amount: u128) -> Result<(), Error> {
        ensure_initialized(&env)?;
        user.require_auth();
        let loan_token = read_loan_token(&env)?;

        let mut totals = read_totals(&env);
        let mut account = read_account(&env, &user);
        ledger::repay(&mut totals, &mut account, amount)?;

        pull_from(&env, &loan_token, &user, amount)?;
        write_account(&env, &user, &account);
        write_totals(&env, &totals);

        Repaid {
            borrower: user,
            amount,
            borrow_principal: account.borrow_principal,
            total_borrows: totals.total_borrows,
        }
        .publish(&env);
        Ok(())
    }

    /// Pay the liquidator `amount * pool loan cash / total_borrows` of
    /// collateral and wipe the borrower's loan. Returns the collateral paid.
    /// `total_borrows` is left unchanged (see `ledger::liquidate`).
    pub fn liquidate(
        env: Env,
        borrower: Address,
        amount: u128,
        liquidator: Address,
    ) -> Result<u128, Error> {
        ensure_initialized(&env)?;
        liquidator.require_auth();
        let collateral_token = read_collateral_token(&env)?;
        let loan_token = read_loan_token(&env)?;

        let mut totals = read_totals(&env);
        let mut account = read_account(&env, &borrower);
        let pool_collateral = pool_balance(&env, &collateral_token)?;
        let pool_loan_cash = pool_balance(&env, &loan_token)?;
        let payout = ledger::liquidate(
            &mut totals,
            &mut account,
            amount,
            pool_collateral,
            pool_loan_cash,
        )?;

        push(&env, &collateral_token, &liquidator, payout)?;
        write_account(&env, &borrower, &account);
        write_totals(&env, &totals);

        Liquidated {
            borrower,
            liquidator,
            amount,
            collateral_paid: payout,
            total_borrows: totals.total_borrows,
        }
        .publish(&env);
        Ok(payout)
    }

    /// Admin: move any token held by the pool out to `to`. Ledger records are
    /// not touched.
    pub fn sweep(
        env: Env,
        admin: Address,
        token: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        require_admin(&env, &admin)?;
        if amount == 0 {
            return Err(Error::InvalidAmount);
        }
        push(&env, &token, &to, amount)?;
        Swept { token, to, amount }.publish(&env);
        Ok(())
    }

    /// Account record, verbatim. Untouched addresses read as all zeros.
    pub fn get_account(env: Env, user: Address) -> Account {
        read_account(&env, &user)
    }

    pub fn get_total_supply(env: Env) -> u128 {
        read_totals(&env).total_supply
    }

    pub fn get_total_borrows(env: Env) -> u128 {
        read_totals(&env).total_borrows
    }

    pub fn get_total_reserves(env: Env) -> u128 {
        read_totals(&env).total_reserves
    }

    /// Supply index a position of `principal` would get against current totals.
    pub fn supply_index_of(env: Env, principal: u128, current_index: u128) -> Result<u128, Error> {
        ledger::supply_index_of(&read_totals(&env), principal, current_index)
    }

    /// Borrow index a position of `principal` would get against current totals.
    pub fn borrow_index_of(env: Env, principal: u128, current_index: u128) -> Result<u128, Error> {
        ledger::borrow_index_of(&read_totals(&env), principal, current_index)
    }

    /// Current ledger timestamp, in seconds.
    pub fn observation_instant(env: Env) -> u64 {
        env.ledger().timestamp()
    }

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        ensure_initialized(&env)?;
        read_admin(&env)
    }

    pub fn get_collateral_token(env: Env) -> Result<Address, Error> {
        ensure_initialized(&env)?;
        read_collateral_token(&env)
    }

    pub fn get_loan_token(env: Env) -> Result<Address, Error> {
        ensure_initialized(&env)?;
        read_loan_token(&env)
    }
}
