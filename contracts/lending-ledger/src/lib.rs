#![no_std]

mod constants;
mod contract;
mod errors;
mod events;
mod helpers;
mod ledger;
mod storage;

pub use crate::contract::{LendingLedger, LendingLedgerClient};
pub use crate::errors::Error;
pub use crate::storage::Account;
