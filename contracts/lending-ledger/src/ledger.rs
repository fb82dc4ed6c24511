//! Index accounting and the five ledger transitions.
//!
//! Everything here is pure: callers load `PoolTotals` and one `Account`,
//! apply a transition, move tokens, then store both back. A transition
//! computes every new value before assigning any of them, so an `Err`
//! leaves both records exactly as they were.

use crate::constants::{INDEX_SCALE_1E18, ORIGINATION_FEE_DENOMINATOR, ORIGINATION_FEE_NUMERATOR};
use crate::errors::Error;
use crate::storage::{Account, PoolTotals};

/// `(current_index * total + principal * 1e18) / (total + principal)`, or
/// exactly `1e18` while the pool side is empty.
fn weighted_index(total: u128, principal: u128, current_index: u128) -> Result<u128, Error> {
    if total == 0 {
        return Ok(INDEX_SCALE_1E18);
    }
    let weighted_existing = current_index
        .checked_mul(total)
        .ok_or(Error::ArithmeticFault)?;
    let weighted_new = principal
        .checked_mul(INDEX_SCALE_1E18)
        .ok_or(Error::ArithmeticFault)?;
    let numerator = weighted_existing
        .checked_add(weighted_new)
        .ok_or(Error::ArithmeticFault)?;
    let denominator = total.checked_add(principal).ok_or(Error::ArithmeticFault)?;
    Ok(numerator / denominator)
}

/// Supply index keyed on the pre-transition `total_supply`.
pub fn supply_index_of(
    totals: &PoolTotals,
    principal: u128,
    current_index: u128,
) -> Result<u128, Error> {
    weighted_index(totals.total_supply, principal, current_index)
}

/// Borrow index keyed on the pre-transition `total_borrows`.
pub fn borrow_index_of(
    totals: &PoolTotals,
    principal: u128,
    current_index: u128,
) -> Result<u128, Error> {
    weighted_index(totals.total_borrows, principal, current_index)
}

/// Loan-token cash the pool must hold before lending `amount`.
pub fn required_liquidity(amount: u128) -> Result<u128, Error> {
    Ok(amount
        .checked_mul(ORIGINATION_FEE_NUMERATOR)
        .ok_or(Error::ArithmeticFault)?
        / ORIGINATION_FEE_DENOMINATOR)
}

pub fn deposit(totals: &mut PoolTotals, account: &mut Account, amount: u128) -> Result<(), Error> {
    if amount == 0 {
        return Err(Error::InvalidAmount);
    }
    let principal = account
        .supply_principal
        .checked_add(amount)
        .ok_or(Error::ArithmeticFault)?;
    let index = supply_index_of(totals, principal, account.supply_index)?;
    let total_supply = totals
        .total_supply
        .checked_add(amount)
        .ok_or(Error::ArithmeticFault)?;

    account.supply_principal = principal;
    account.supply_index = index;
    totals.total_supply = total_supply;
    Ok(())
}

pub fn withdraw(totals: &mut PoolTotals, account: &mut Account, amount: u128) -> Result<(), Error> {
    if amount == 0 {
        return Err(Error::InvalidAmount);
    }
    if account.supply_principal < amount {
        return Err(Error::InsufficientSupplyBalance);
    }
    let principal = account.supply_principal - amount;
    let index = supply_index_of(totals, principal, account.supply_index)?;
    let total_supply = totals
        .total_supply
        .checked_sub(amount)
        .ok_or(Error::ArithmeticFault)?;

    account.supply_principal = principal;
    account.supply_index = index;
    totals.total_supply = total_supply;
    Ok(())
}

/// Opens the account's single loan. `pool_cash` is the pool's loan-token
/// balance; it is only compared against the 5% headroom, never charged.
pub fn borrow(
    totals: &mut PoolTotals,
    account: &mut Account,
    amount: u128,
    pool_cash: u128,
    now: u64,
) -> Result<(), Error> {
    if amount == 0 {
        return Err(Error::InvalidAmount);
    }
    if account.borrow_principal != 0 {
        return Err(Error::AlreadyBorrowed);
    }
    if pool_cash < required_liquidity(amount)? {
        return Err(Error::InsufficientLiquidity);
    }
    let index = borrow_index_of(totals, amount, account.borrow_index)?;
    let total_borrows = totals
        .total_borrows
        .checked_add(amount)
        .ok_or(Error::ArithmeticFault)?;

    account.borrow_principal = amount;
    account.borrow_index = index;
    account.borrow_interest_index = now;
    totals.total_borrows = total_borrows;
    Ok(())
}

pub fn repay(totals: &mut PoolTotals, account: &mut Account, amount: u128) -> Result<(), Error> {
    if amount == 0 {
        return Err(Error::InvalidAmount);
    }
    if account.borrow_principal == 0 {
        return Err(Error::NoActiveBorrow);
    }
    let principal = account
        .borrow_principal
        .checked_sub(amount)
        .ok_or(Error::ArithmeticFault)?;
    let index = borrow_index_of(totals, principal, account.borrow_index)?;
    let total_borrows = totals
        .total_borrows
        .checked_sub(amount)
        .ok_or(Error::ArithmeticFault)?;

    account.borrow_principal = principal;
    account.borrow_index = index;
    totals.total_borrows = total_borrows;
    Ok(())
}

/// Wipes the borrower's loan and returns the collateral payout owed to the
/// liquidator: `amount * pool_loan_cash / total_borrows`.
///
/// Known defect: `total_borrows` is decremented by the borrower's principal
/// only after that principal has been zeroed, so the aggregate never shrinks
/// and stops matching the sum of open loans.
pub fn liquidate(
    totals: &mut PoolTotals,
    borrower: &mut Account,
    amount: u128,
    pool_collateral: u128,
    pool_loan_cash: u128,
) -> Result<u128, Error> {
    if borrower.borrow_principal == 0 {
        return Err(Error::NoActiveBorrow);
    }
    if pool_collateral < amount {
        return Err(Error::InsufficientCollateral);
    }
    let payout = amount
        .checked_mul(pool_loan_cash)
        .and_then(|v| v.checked_div(totals.total_borrows))
        .ok_or(Error::ArithmeticFault)?;

    borrower.borrow_principal = 0;
    borrower.borrow_index = 0;
    totals.total_borrows = totals
        .total_borrows
        .checked_sub(borrower.borrow_principal)
        .ok_or(Error::ArithmeticFault)?;
    Ok(payout)
}

#[cfg(test)]
mod test {
    use super::*;

    fn totals(total_supply: u128, total_borrows: u128) -> PoolTotals {
        PoolTotals {
            total_supply,
            total_borrows,
            total_reserves: 0,
        }
    }

    #[test]
    fn test_empty_pool_index_is_one() {
        let t = totals(0, 0);
        assert_eq!(
            supply_index_of(&t, 0, 0).unwrap(),
            1_000_000_000_000_000_000u128
        );
        assert_eq!(
            supply_index_of(&t, 12_345, 777).unwrap(),
            1_000_000_000_000_000_000u128
        );
        assert_eq!(borrow_index_of(&t, 500, 3).unwrap(), INDEX_SCALE_1E18);
    }

    #[test]
    fn test_weighted_index_truncates() {
        // (1e18 * 100 + 50 * 1e18) / 150 = 1e18
        let t = totals(100, 0);
        assert_eq!(supply_index_of(&t, 50, INDEX_SCALE_1E18).unwrap(), INDEX_SCALE_1E18);
        // (0 * 3 + 1 * 1e18) / 4 = 2.5e17
        let t = totals(3, 0);
        assert_eq!(supply_index_of(&t, 1, 0).unwrap(), 250_000_000_000_000_000u128);
        // (0 * 2 + 1 * 1e18) / 3 truncates
        let t = totals(0, 2);
        assert_eq!(borrow_index_of(&t, 1, 0).unwrap(), 333_333_333_333_333_333u128);
    }

    #[test]
    fn test_index_overflow_is_fault() {
        let t = totals(u128::MAX, 0);
        assert_eq!(
            supply_index_of(&t, 1, INDEX_SCALE_1E18),
            Err(Error::ArithmeticFault)
        );
    }

    #[test]
    fn test_deposit_uses_pre_transition_totals() {
        let mut t = totals(0, 0);
        let mut a = Account::default();
        deposit(&mut t, &mut a, 100).unwrap();
        assert_eq!(a.supply_principal, 100);
        assert_eq!(a.supply_index, INDEX_SCALE_1E18);
        assert_eq!(t.total_supply, 100);

        let mut b = Account::default();
        deposit(&mut t, &mut b, 300).unwrap();
        // (0 * 100 + 300 * 1e18) / 400
        assert_eq!(b.supply_index, 750_000_000_000_000_000u128);
        assert_eq!(t.total_supply, 400);
    }

    #[test]
    fn test_zero_amounts_rejected_without_mutation() {
        let mut t = totals(10, 10);
        let mut a = Account {
            supply_principal: 10,
            borrow_principal: 10,
            ..Account::default()
        };
        let before = (t, a.clone());
        assert_eq!(deposit(&mut t, &mut a, 0), Err(Error::InvalidAmount));
        assert_eq!(withdraw(&mut t, &mut a, 0), Err(Error::InvalidAmount));
        assert_eq!(borrow(&mut t, &mut a, 0, 1_000, 1), Err(Error::InvalidAmount));
        assert_eq!(repay(&mut t, &mut a, 0), Err(Error::InvalidAmount));
        assert_eq!((t, a), before);
    }

    #[test]
    fn test_withdraw_more_than_principal() {
        let mut t = totals(50, 0);
        let mut a = Account {
            supply_principal: 50,
            supply_index: INDEX_SCALE_1E18,
            ..Account::default()
        };
        assert_eq!(
            withdraw(&mut t, &mut a, 51),
            Err(Error::InsufficientSupplyBalance)
        );
        withdraw(&mut t, &mut a, 50).unwrap();
        assert_eq!(a.supply_principal, 0);
        // (1e18 * 50 + 0) / 50
        assert_eq!(a.supply_index, INDEX_SCALE_1E18);
        assert_eq!(t.total_supply, 0);
    }

    #[test]
    fn test_borrow_liquidity_buffer_boundary() {
        let mut t = totals(0, 0);
        let mut a = Account::default();
        assert_eq!(
            borrow(&mut t, &mut a, 1_000, 1_049, 7),
            Err(Error::InsufficientLiquidity)
        );
        assert_eq!(a, Account::default());
        borrow(&mut t, &mut a, 1_000, 1_050, 7).unwrap();
        assert_eq!(a.borrow_principal, 1_000);
        assert_eq!(a.borrow_index, INDEX_SCALE_1E18);
        assert_eq!(a.borrow_interest_index, 7);
        assert_eq!(t.total_borrows, 1_000);
    }

    #[test]
    fn test_required_liquidity_truncates() {
        assert_eq!(required_liquidity(1_000).unwrap(), 1_050);
        assert_eq!(required_liquidity(19).unwrap(), 19);
        assert_eq!(required_liquidity(20).unwrap(), 21);
        assert_eq!(required_liquidity(u128::MAX), Err(Error::ArithmeticFault));
    }

    #[test]
    fn test_second_borrow_rejected() {
        let mut t = totals(0, 0);
        let mut a = Account::default();
        borrow(&mut t, &mut a, 10, 1_000, 0).unwrap();
        assert_eq!(
            borrow(&mut t, &mut a, 1, 1_000, 0),
            Err(Error::AlreadyBorrowed)
        );
        assert_eq!(t.total_borrows, 10);
    }

    #[test]
    fn test_repay_full_and_over() {
        let mut t = totals(0, 0);
        let mut a = Account::default();
        assert_eq!(repay(&mut t, &mut a, 1), Err(Error::NoActiveBorrow));

        borrow(&mut t, &mut a, 400, 1_000, 0).unwrap();
        assert_eq!(repay(&mut t, &mut a, 401), Err(Error::ArithmeticFault));
        assert_eq!(a.borrow_principal, 400);

        repay(&mut t, &mut a, 150).unwrap();
        assert_eq!(a.borrow_principal, 250);
        assert_eq!(t.total_borrows, 250);
        repay(&mut t, &mut a, 250).unwrap();
        assert_eq!(a.borrow_principal, 0);
        assert_eq!(t.total_borrows, 0);
    }

    #[test]
    fn test_liquidate_leaves_total_borrows() {
        let mut t = totals(0, 0);
        let mut a = Account::default();
        borrow(&mut t, &mut a, 1_000, 1_050, 0).unwrap();

        let payout = liquidate(&mut t, &mut a, 1_000, 5_000, 50).unwrap();
        assert_eq!(payout, 50);
        assert_eq!(a.borrow_principal, 0);
        assert_eq!(a.borrow_index, 0);
        assert_eq!(t.total_borrows, 1_000);
    }

    #[test]
    fn test_liquidate_guards() {
        let mut t = totals(0, 100);
        let mut idle = Account::default();
        assert_eq!(
            liquidate(&mut t, &mut idle, 10, 100, 100),
            Err(Error::NoActiveBorrow)
        );

        let mut a = Account {
            borrow_principal: 100,
            borrow_index: INDEX_SCALE_1E18,
            ..Account::default()
        };
        assert_eq!(
            liquidate(&mut t, &mut a, 101, 100, 100),
            Err(Error::InsufficientCollateral)
        );

        let mut empty = totals(0, 0);
        assert_eq!(
            liquidate(&mut empty, &mut a, 10, 100, 100),
            Err(Error::ArithmeticFault)
        );
        assert_eq!(a.borrow_principal, 100);
    }
}
