use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    InvalidAmount = 1,
    InsufficientSupplyBalance = 2,
    InsufficientLiquidity = 3,
    AlreadyBorrowed = 4,
    NoActiveBorrow = 5,
    InsufficientCollateral = 6,
    TransferFailed = 7,
    /// Underflow or overflow on a quantity that valid operation never produces.
    ArithmeticFault = 8,
    NotInitialized = 9,
    AlreadyInitialized = 10,
    Unauthorized = 11,
    /// Collateral and loan token must be distinct contracts.
    InvalidConfig = 12,
}
