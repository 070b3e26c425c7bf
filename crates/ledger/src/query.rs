use tracing::Span;

use tally_core::{AccountId, Clock};

use crate::account::Transaction;
use crate::ledger::LedgerError;
use crate::store::AccountStore;
use crate::time_window::{TimeFrame, TimeWindowResolver};

/// Reads an account's transactions inside a trailing time window.
pub struct TransactionQuery<S, C> {
    store: S,
    resolver: TimeWindowResolver<C>,
    span: Span,
}

impl<S, C> TransactionQuery<S, C>
where
    S: AccountStore,
    C: Clock,
{
    pub fn new(store: S, clock: C, span: Span) -> Self {
        Self {
            store,
            resolver: TimeWindowResolver::new(clock),
            span,
        }
    }

    /// Transactions created at or after `now − interval × frame`, in the
    /// order the store returns them. An unknown account yields an empty list.
    pub fn transactions(
        &self,
        account_id: AccountId,
        frame: TimeFrame,
        interval: i64,
    ) -> Result<Vec<Transaction>, LedgerError> {
        tracing::info!(
            parent: &self.span,
            account_id = %account_id,
            time_frame = ?frame,
            interval,
            "request to retrieve the list of transactions"
        );

        let cutoff = self.resolver.cutoff(frame, interval)?;
        let transactions = self.store.find_transactions(account_id, cutoff)?;

        tracing::debug!(parent: &self.span, %cutoff, count = transactions.len(), "transactions resolved");
        Ok(transactions)
    }
}
