//! Persistence port.
//!
//! The ledger only talks to storage through this trait. Adapters own
//! identity assignment, audit timestamps, IBAN uniqueness and their own
//! consistency; the core never retries.

use chrono::{DateTime, Utc};
use thiserror::Error;

use tally_core::{AccountId, TransactionId};

use crate::account::{Account, Transaction};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("iban already assigned to another account: {0}")]
    DuplicateIban(String),

    #[error("account {0} does not exist")]
    UnknownAccount(AccountId),
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for crate::account::Account {}
}

/// Persistence hooks reserved for [`AccountStore`] adapters.
///
/// Identity, audit timestamps and the create-only transaction history belong
/// to the store; these are the only way to set them. Sealed: implemented for
/// [`Account`] alone, and only callable where this trait is imported.
///
/// ```compile_fail
/// use chrono::Utc;
/// use tally_core::{AccountId, TransactionId};
/// use tally_ledger::{Account, Currency, Iban};
///
/// let mut account = Account::open("c".into(), Currency::Eur, "n".into(), Iban::new("RO00"), Vec::new());
/// account.mark_saved(AccountId::new(1), Utc::now(), || TransactionId::new(1));
/// ```
pub trait StoreHooks: sealed::Sealed {
    /// Replace persisted transactions with their `stored` copies before an
    /// update; unsaved ones are kept and appended.
    fn restore_transactions(&mut self, stored: &[Transaction]);

    /// Assign the id (first save only), created/modified timestamps and ids
    /// for unsaved transactions.
    fn mark_saved(&mut self, id: AccountId, now: DateTime<Utc>, next_transaction_id: impl FnMut() -> TransactionId);
}

impl StoreHooks for Account {
    fn restore_transactions(&mut self, stored: &[Transaction]) {
        self.reattach_stored(stored);
    }

    fn mark_saved(&mut self, id: AccountId, now: DateTime<Utc>, next_transaction_id: impl FnMut() -> TransactionId) {
        self.stamp_saved(id, now, next_transaction_id);
    }
}

pub trait AccountStore: Send + Sync {
    /// Insert (no id yet) or update (id set). One write per call.
    ///
    /// Returns the stored account with identity and audit timestamps filled in.
    fn save(&self, account: Account) -> Result<Account, StoreError>;

    fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Transactions of `account_id` created at or after `cutoff`, in store order.
    fn find_transactions(
        &self,
        account_id: AccountId,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, StoreError>;
}

impl<S> AccountStore for std::sync::Arc<S>
where
    S: AccountStore + ?Sized,
{
    fn save(&self, account: Account) -> Result<Account, StoreError> {
        (**self).save(account)
    }

    fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        (**self).find_by_id(id)
    }

    fn find_transactions(
        &self,
        account_id: AccountId,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, StoreError> {
        (**self).find_transactions(account_id, cutoff)
    }
}
