use std::sync::Arc;

use tally_core::{AccountId, Clock, SystemClock};
use tally_infra::store::InMemoryAccountStore;
use tally_ledger::{
    Account, AccountLedger, AccountStore, IbanGenerator, LedgerError, OpenAccount, RandomIbanGenerator,
    TimeFrame, Transaction, TransactionQuery, account_not_found,
};

use crate::config::ApiConfig;

pub type SharedStore = Arc<dyn AccountStore>;

/// Domain services shared by all handlers.
pub struct AppServices {
    ledger: AccountLedger<SharedStore, Arc<dyn IbanGenerator>>,
    transactions: TransactionQuery<SharedStore, Arc<dyn Clock>>,
}

impl AppServices {
    pub fn new(store: SharedStore, ibans: Arc<dyn IbanGenerator>, clock: Arc<dyn Clock>, config: &ApiConfig) -> Self {
        Self {
            ledger: AccountLedger::new(
                store.clone(),
                ibans,
                config.ledger.clone(),
                tracing::info_span!("account_ledger"),
            ),
            transactions: TransactionQuery::new(store, clock, tracing::info_span!("transaction_query")),
        }
    }

    pub fn open_account(&self, cmd: OpenAccount) -> Result<Account, LedgerError> {
        self.ledger.open(cmd)
    }

    pub fn close_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.ledger.close(id)
    }

    pub fn get_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.ledger.find(id)?.ok_or_else(|| account_not_found(id).into())
    }

    pub fn list_transactions(
        &self,
        id: AccountId,
        frame: TimeFrame,
        interval: i64,
    ) -> Result<Vec<Transaction>, LedgerError> {
        self.transactions.transactions(id, frame, interval)
    }
}

/// Production wiring: in-memory store, random IBANs, wall clock.
pub fn build_services(config: &ApiConfig) -> AppServices {
    let store: SharedStore = Arc::new(InMemoryAccountStore::new());
    build_services_with_store(config, store)
}

pub fn build_services_with_store(config: &ApiConfig, store: SharedStore) -> AppServices {
    let ibans: Arc<dyn IbanGenerator> = Arc::new(RandomIbanGenerator::new(config.iban_prefix.clone()));
    AppServices::new(store, ibans, Arc::new(SystemClock), config)
}
