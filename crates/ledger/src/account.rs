use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tally_core::{AccountId, DomainError, DomainResult, Entity, TransactionId, Violations};

use crate::balance::BalanceCalculator;
use crate::iban::Iban;

/// Account currency code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Usd,
    Gbp,
    Ron,
    Chf,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Ron => "RON",
            Currency::Chf => "CHF",
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl core::str::FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            "GBP" => Ok(Currency::Gbp),
            "RON" => Ok(Currency::Ron),
            "CHF" => Ok(Currency::Chf),
            _ => Err(DomainError::invalid_field(
                "currency",
                "Currency must be one of EUR, USD, GBP, RON, CHF",
            )),
        }
    }
}

/// Lifecycle state. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Active,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Credit,
    Debit,
}

/// A single movement on an account.
///
/// Immutable once built; the store only fills in identity, the owning
/// account and the creation timestamp on first save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    id: Option<TransactionId>,
    amount: Decimal,
    transaction_type: TransactionType,
    counterparty: String,
    description: Option<String>,
    #[serde(rename = "createdDateTime")]
    created_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    account_id: Option<AccountId>,
}

impl Transaction {
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn counterparty(&self) -> &str {
        &self.counterparty
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Owning account (a back-reference, not ownership).
    pub fn account_id(&self) -> Option<AccountId> {
        self.account_id
    }

    fn mark_saved(&mut self, id: TransactionId, account_id: AccountId, now: DateTime<Utc>) {
        self.id = Some(id);
        self.account_id = Some(account_id);
        self.created_at = Some(now);
    }
}

impl Entity for Transaction {
    type Id = TransactionId;

    fn id(&self) -> Option<Self::Id> {
        self.id
    }
}

/// Unvalidated transaction input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTransaction {
    pub amount: Option<Decimal>,
    pub transaction_type: Option<TransactionType>,
    pub counterparty: Option<String>,
    pub description: Option<String>,
}

impl NewTransaction {
    pub fn credit(amount: Decimal, counterparty: impl Into<String>) -> Self {
        Self::of(TransactionType::Credit, amount, counterparty)
    }

    pub fn debit(amount: Decimal, counterparty: impl Into<String>) -> Self {
        Self::of(TransactionType::Debit, amount, counterparty)
    }

    fn of(kind: TransactionType, amount: Decimal, counterparty: impl Into<String>) -> Self {
        Self {
            amount: Some(amount),
            transaction_type: Some(kind),
            counterparty: Some(counterparty.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check every mandatory field and build the transaction.
    pub fn validate(self) -> DomainResult<Transaction> {
        let mut v = Violations::new();
        v.require("amount", self.amount.as_ref(), "Amount is mandatory");
        if self.amount.is_some_and(|a| a.is_sign_negative() && !a.is_zero()) {
            v.push("amount", "Amount must not be negative");
        }
        v.require("transactionType", self.transaction_type.as_ref(), "Transaction type is mandatory");
        v.require_text("counterparty", self.counterparty.as_deref(), "Counterparty is mandatory");

        match (v.finish(), self.amount, self.transaction_type, self.counterparty) {
            (Ok(()), Some(amount), Some(transaction_type), Some(counterparty)) => Ok(Transaction {
                id: None,
                amount,
                transaction_type,
                counterparty,
                description: self.description,
                created_at: None,
                account_id: None,
            }),
            (Err(e), ..) => Err(e),
            _ => Err(DomainError::invalid_field("transaction", "Transaction is incomplete")),
        }
    }
}

/// Account aggregate: owns its transactions; balance is derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    id: Option<AccountId>,
    customer: String,
    currency: Currency,
    #[serde(rename = "accountStatus")]
    status: AccountStatus,
    balance: Decimal,
    iban: Iban,
    name: String,
    #[serde(rename = "createdDateTime")]
    created_at: Option<DateTime<Utc>>,
    #[serde(rename = "lastModifiedDateTime")]
    last_modified_at: Option<DateTime<Utc>>,
    transactions: Vec<Transaction>,
}

impl Account {
    /// A freshly opened, not yet persisted account.
    ///
    /// Status is `Active` and the balance is computed from `transactions`.
    pub fn open(
        customer: String,
        currency: Currency,
        name: String,
        iban: Iban,
        transactions: Vec<Transaction>,
    ) -> Self {
        let balance = BalanceCalculator::balance(&transactions);
        Self {
            id: None,
            customer,
            currency,
            status: AccountStatus::Active,
            balance,
            iban,
            name,
            created_at: None,
            last_modified_at: None,
            transactions,
        }
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn is_closed(&self) -> bool {
        self.status == AccountStatus::Closed
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn iban(&self) -> &Iban {
        &self.iban
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        self.last_modified_at
    }

    /// Transactions in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// ACTIVE → CLOSED. Returns `false` if the account was already closed.
    ///
    /// Nothing but the status changes.
    pub fn close(&mut self) -> bool {
        if self.is_closed() {
            return false;
        }
        self.status = AccountStatus::Closed;
        true
    }

    /// Put back the stored copy of every persisted transaction.
    ///
    /// Persisted transactions are create-only, so whatever the caller holds
    /// for them is replaced by `stored`; unsaved transactions are appended
    /// after them. The balance is recomputed over the resulting set.
    pub(crate) fn reattach_stored(&mut self, stored: &[Transaction]) {
        let fresh = self
            .transactions
            .drain(..)
            .filter(|t| !t.is_persisted())
            .collect::<Vec<_>>();

        self.transactions = stored.to_vec();
        self.transactions.extend(fresh);
        self.balance = BalanceCalculator::balance(&self.transactions);
    }

    /// Assign identity and audit timestamps for a save at `now`.
    ///
    /// The id and created timestamp are set once; the modified timestamp on
    /// every call. Unsaved transactions get an id from `next_transaction_id`.
    pub(crate) fn stamp_saved(
        &mut self,
        id: AccountId,
        now: DateTime<Utc>,
        mut next_transaction_id: impl FnMut() -> TransactionId,
    ) {
        let id = *self.id.get_or_insert(id);
        self.created_at.get_or_insert(now);
        self.last_modified_at = Some(now);

        for tx in self.transactions.iter_mut().filter(|t| !t.is_persisted()) {
            tx.mark_saved(next_transaction_id(), id, now);
        }
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> Option<Self::Id> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn account() -> Account {
        let txs = vec![
            NewTransaction::credit(dec!(10), "Ionescu Marius").validate().unwrap(),
            NewTransaction::debit(dec!(1), "Ionescu Marius").validate().unwrap(),
        ];
        Account::open(
            "Cosmin".into(),
            Currency::Eur,
            "account name test".into(),
            Iban::new("RO49TALY0000000000000001"),
            txs,
        )
    }

    #[test]
    fn open_account_is_active_with_derived_balance() {
        let a = account();
        assert_eq!(a.status(), AccountStatus::Active);
        assert_eq!(a.balance(), dec!(9));
        assert_eq!(a.transactions().len(), 2);
        assert!(!a.is_persisted());
    }

    #[test]
    fn close_is_one_way() {
        let mut a = account();
        let balance = a.balance();
        assert!(a.close());
        assert!(!a.close());
        assert_eq!(a.status(), AccountStatus::Closed);
        assert_eq!(a.balance(), balance);
    }

    #[test]
    fn mark_saved_sets_created_once_and_modified_every_time() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let mut next = 0;
        let mut a = account();

        a.stamp_saved(AccountId::new(1), t0, || {
            next += 1;
            TransactionId::new(next)
        });
        a.stamp_saved(AccountId::new(99), t0 + Duration::hours(1), || unreachable!());

        assert_eq!(a.id(), Some(AccountId::new(1)));
        assert_eq!(a.created_at(), Some(t0));
        assert_eq!(a.last_modified_at(), Some(t0 + Duration::hours(1)));
        assert!(a.transactions().iter().all(|t| t.created_at() == Some(t0)));
        assert!(a.transactions().iter().all(|t| t.account_id() == Some(AccountId::new(1))));
    }

    #[test]
    fn new_transaction_reports_every_missing_field() {
        let err = NewTransaction::default().validate().unwrap_err();
        assert_eq!(
            err.messages(),
            vec![
                "Amount is mandatory",
                "Transaction type is mandatory",
                "Counterparty is mandatory"
            ]
        );
    }

    #[test]
    fn negative_amount_is_rejected() {
        let err = NewTransaction::credit(dec!(-5), "x").validate().unwrap_err();
        assert_eq!(err.messages(), vec!["Amount must not be negative"]);
    }

    #[test]
    fn unknown_currency_code_is_a_validation_error() {
        assert_eq!("EUR".parse::<Currency>().unwrap(), Currency::Eur);
        let err = "XYZ".parse::<Currency>().unwrap_err();
        assert_eq!(err.messages(), vec!["Currency must be one of EUR, USD, GBP, RON, CHF"]);
    }

    #[test]
    fn serializes_with_wire_names() {
        let json = serde_json::to_value(account()).unwrap();
        assert_eq!(json["accountStatus"], "ACTIVE");
        assert_eq!(json["currency"], "EUR");
        assert_eq!(json["balance"], "9");
        assert_eq!(json["transactions"][0]["transactionType"], "CREDIT");
        assert!(json["transactions"][0].get("accountId").is_none());
    }
}
