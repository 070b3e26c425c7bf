//! Account lifecycle: opening and closing.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::Span;

use tally_core::{AccountId, DomainError, DomainResult, Entity, Violations};

use crate::account::{Account, Currency, NewTransaction};
use crate::iban::IbanGenerator;
use crate::store::{AccountStore, StoreError};

const DEMO_COUNTERPARTY: &str = "Ionescu Marius";
const DEMO_DESCRIPTION: &str = "bank transfer";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Seed every new account with a CREDIT 10 / DEBIT 1 pair.
    ///
    /// Placeholder behaviour carried over for client compatibility; switch it
    /// off once callers stop relying on the seeded balance.
    pub seed_demo_transactions: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            seed_demo_transactions: true,
        }
    }
}

/// Command: open an account. Every field may be missing in the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenAccount {
    pub customer: Option<String>,
    pub currency: Option<Currency>,
    pub name: Option<String>,
}

impl OpenAccount {
    fn validate(self) -> DomainResult<(String, Currency, String)> {
        let mut v = Violations::new();
        v.require_text("customer", self.customer.as_deref(), "Customer name is mandatory");
        v.require("currency", self.currency.as_ref(), "Currency is mandatory");
        v.require_text("name", self.name.as_deref(), "Account name is mandatory");
        v.finish()?;

        match (self.customer, self.currency, self.name) {
            (Some(customer), Some(currency), Some(name)) => Ok((customer, currency, name)),
            _ => Err(DomainError::invalid_field("account", "Account is incomplete")),
        }
    }
}

/// Client-facing message for an unknown account id.
pub fn account_not_found(id: AccountId) -> DomainError {
    DomainError::not_found(format!("Account with id {id} not found"))
}

fn demo_transactions() -> Vec<NewTransaction> {
    vec![
        NewTransaction::credit(Decimal::TEN, DEMO_COUNTERPARTY).with_description(DEMO_DESCRIPTION),
        NewTransaction::debit(Decimal::ONE, DEMO_COUNTERPARTY).with_description(DEMO_DESCRIPTION),
    ]
}

/// Opens and closes accounts against an [`AccountStore`].
pub struct AccountLedger<S, G> {
    store: S,
    ibans: G,
    config: LedgerConfig,
    span: Span,
}

impl<S, G> AccountLedger<S, G>
where
    S: AccountStore,
    G: IbanGenerator,
{
    pub fn new(store: S, ibans: G, config: LedgerConfig, span: Span) -> Self {
        Self {
            store,
            ibans,
            config,
            span,
        }
    }

    /// Validate, seed, assign an IBAN and persist a new ACTIVE account.
    pub fn open(&self, cmd: OpenAccount) -> Result<Account, LedgerError> {
        tracing::info!(parent: &self.span, command = ?cmd, "request to create an account");

        let (customer, currency, name) = cmd.validate()?;

        let seed = if self.config.seed_demo_transactions {
            demo_transactions()
        } else {
            Vec::new()
        };
        let transactions = seed
            .into_iter()
            .map(NewTransaction::validate)
            .collect::<DomainResult<Vec<_>>>()?;

        let iban = self.ibans.generate();
        let account = Account::open(customer, currency, name, iban, transactions);

        let saved = self.store.save(account).inspect_err(|e| {
            tracing::warn!(parent: &self.span, error = %e, "saving new account failed");
        })?;

        tracing::info!(
            parent: &self.span,
            account_id = ?saved.id(),
            iban = %saved.iban(),
            balance = %saved.balance(),
            "account opened"
        );
        Ok(saved)
    }

    /// ACTIVE → CLOSED. Closing a closed account returns it unchanged
    /// without writing.
    pub fn close(&self, id: AccountId) -> Result<Account, LedgerError> {
        tracing::info!(parent: &self.span, account_id = %id, "request to close the account");

        let mut account = self.store.find_by_id(id)?.ok_or_else(|| account_not_found(id))?;

        if !account.close() {
            tracing::debug!(parent: &self.span, account_id = %id, "account already closed");
            return Ok(account);
        }

        Ok(self.store.save(account)?)
    }

    pub fn find(&self, id: AccountId) -> Result<Option<Account>, LedgerError> {
        Ok(self.store.find_by_id(id)?)
    }
}
