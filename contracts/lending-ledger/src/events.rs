use soroban_sdk::{contractevent, Address};

/// Emitted once when the pool is configured.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerInitialized {
    #[topic]
    pub admin: Address,
    pub collateral_token: Address,
    pub loan_token: Address,
}

/// Emitted on deposit after collateral reaches pool custody.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deposited {
    #[topic]
    pub account: Address,
    pub amount: u128,
    pub supply_principal: u128,
    pub supply_index: u128,
    pub total_supply: u128,
}

/// Emitted on withdraw after collateral leaves pool custody.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawn {
    #[topic]
    pub account: Address,
    pub amount: u128,
    pub supply_principal: u128,
    pub supply_index: u128,
    pub total_supply: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Borrowed {
    #[topic]
    pub borrower: Address,
    pub amount: u128,
    pub borrow_index: u128,
    pub opened_at: u64,
    pub total_borrows: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Repaid {
    #[topic]
    pub borrower: Address,
    pub amount: u128,
    pub borrow_principal: u128,
    pub total_borrows: u128,
}

/// `total_borrows` is reported as stored after the liquidation.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Liquidated {
    #[topic]
    pub borrower: Address,
    #[topic]
    pub liquidator: Address,
    pub amount: u128,
    pub collateral_paid: u128,
    pub total_borrows: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Swept {
    #[topic]
    pub token: Address,
    pub to: Address,
    pub amount: u128,
}
