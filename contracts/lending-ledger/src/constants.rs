pub const INDEX_SCALE_1E18: u128 = 1_000_000_000_000_000_000u128; // 1e18
// Borrow liquidity headroom: pool cash must cover amount * 105 / 100
pub const ORIGINATION_FEE_NUMERATOR: u128 = 105u128;
pub const ORIGINATION_FEE_DENOMINATOR: u128 = 100u128;
