use rust_decimal::Decimal;

use crate::account::{Transaction, TransactionType};

/// Folds transactions into a signed total.
///
/// Exact decimal arithmetic: credits add, debits subtract, starting from zero.
pub struct BalanceCalculator;

impl BalanceCalculator {
    pub fn balance<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
        transactions
            .into_iter()
            .map(Self::signed_amount)
            .fold(Decimal::ZERO, |acc, amount| acc + amount)
    }

    pub fn signed_amount(transaction: &Transaction) -> Decimal {
        match transaction.transaction_type() {
            TransactionType::Credit => transaction.amount(),
            TransactionType::Debit => -transaction.amount(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::NewTransaction;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn tx(kind: TransactionType, amount: Decimal) -> Transaction {
        NewTransaction {
            amount: Some(amount),
            transaction_type: Some(kind),
            counterparty: Some("counterparty".into()),
            description: None,
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn empty_list_is_zero() {
        assert_eq!(BalanceCalculator::balance(&Vec::<Transaction>::new()), Decimal::ZERO);
    }

    #[test]
    fn credits_add_and_debits_subtract() {
        let txs = vec![
            tx(TransactionType::Credit, dec!(10)),
            tx(TransactionType::Debit, dec!(1)),
        ];
        assert_eq!(BalanceCalculator::balance(&txs), dec!(9));
    }

    #[test]
    fn no_binary_rounding_drift() {
        let txs = std::iter::repeat_with(|| tx(TransactionType::Credit, dec!(0.1)))
            .take(1_000)
            .collect::<Vec<_>>();
        assert_eq!(BalanceCalculator::balance(&txs), dec!(100.0));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the balance equals credits minus debits, computed in
        /// integer minor units, for any mix of transactions.
        #[test]
        fn balance_is_signed_sum(
            entries in prop::collection::vec((any::<bool>(), 0i64..1_000_000_000i64), 0..50)
        ) {
            let mut expected_cents: i128 = 0;
            let txs = entries
                .iter()
                .map(|&(credit, cents)| {
                    let amount = Decimal::new(cents, 2);
                    if credit {
                        expected_cents += cents as i128;
                        tx(TransactionType::Credit, amount)
                    } else {
                        expected_cents -= cents as i128;
                        tx(TransactionType::Debit, amount)
                    }
                })
                .collect::<Vec<_>>();

            let expected = Decimal::from_i128_with_scale(expected_cents, 2);
            prop_assert_eq!(BalanceCalculator::balance(&txs), expected);
        }
    }
}
