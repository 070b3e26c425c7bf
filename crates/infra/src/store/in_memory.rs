use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use tally_core::{AccountId, Clock, Entity, SystemClock, TransactionId};
use tally_ledger::store::StoreHooks;
use tally_ledger::{Account, AccountStore, StoreError, Transaction};

#[derive(Debug, Default)]
struct State {
    accounts: BTreeMap<AccountId, Account>,
    last_account_id: i64,
    last_transaction_id: i64,
}

/// In-memory account store for tests/dev.
///
/// Owns the audit fields: ids and created timestamps are assigned on first
/// insert, the modified timestamp on every save. Stored transactions are
/// create-only and IBANs are unique across accounts.
#[derive(Debug)]
pub struct InMemoryAccountStore<C = SystemClock> {
    inner: RwLock<State>,
    clock: C,
}

impl InMemoryAccountStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryAccountStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryAccountStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            inner: RwLock::new(State::default()),
            clock,
        }
    }

    /// Every stored account, ordered by id.
    pub fn snapshot(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.read()?.accounts.values().cloned().collect())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

impl<C: Clock> AccountStore for InMemoryAccountStore<C> {
    fn save(&self, mut account: Account) -> Result<Account, StoreError> {
        let mut state = self.write()?;
        let state = &mut *state;

        if let Some(id) = account.id() {
            let stored = state
                .accounts
                .get(&id)
                .ok_or(StoreError::UnknownAccount(id))?;
            account.restore_transactions(stored.transactions());
        }

        let iban_taken = state
            .accounts
            .values()
            .any(|other| other.id() != account.id() && other.iban() == account.iban());
        if iban_taken {
            return Err(StoreError::DuplicateIban(account.iban().to_string()));
        }

        let id = match account.id() {
            Some(id) => id,
            None => {
                state.last_account_id += 1;
                AccountId::new(state.last_account_id)
            }
        };

        let last_tx = &mut state.last_transaction_id;
        account.mark_saved(id, self.clock.now(), || {
            *last_tx += 1;
            TransactionId::new(*last_tx)
        });

        state.accounts.insert(id, account.clone());
        tracing::debug!(account_id = %id, "account stored");
        Ok(account)
    }

    fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.read()?.accounts.get(&id).cloned())
    }

    fn find_transactions(
        &self,
        account_id: AccountId,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, StoreError> {
        let state = self.read()?;
        let Some(account) = state.accounts.get(&account_id) else {
            return Ok(Vec::new());
        };

        Ok(account
            .transactions()
            .iter()
            .filter(|t| t.created_at().is_some_and(|at| at >= cutoff))
            .cloned()
            .collect())
    }
}
