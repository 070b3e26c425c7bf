//! Ledger domain: accounts, transactions and their derived balance.
//!
//! Pure domain logic plus the ports it needs (storage, IBAN generation).
//! No HTTP, no concrete persistence.

pub mod account;
pub mod balance;
pub mod iban;
pub mod ledger;
pub mod query;
pub mod store;
pub mod time_window;

pub use account::{Account, AccountStatus, Currency, NewTransaction, Transaction, TransactionType};
pub use balance::BalanceCalculator;
pub use iban::{Iban, IbanGenerator, IbanPrefix, RandomIbanGenerator, SequentialIbanGenerator};
pub use ledger::{AccountLedger, LedgerConfig, LedgerError, OpenAccount, account_not_found};
pub use query::TransactionQuery;
pub use store::{AccountStore, StoreError};
pub use time_window::{TimeFrame, TimeWindowResolver};
