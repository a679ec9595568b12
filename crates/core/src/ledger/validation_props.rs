//! Property-based tests for journal line validation.

use budgetline_shared::types::AccountId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::entry::JournalLineInput;
use super::error::LedgerError;
use super::validation::validate_lines;

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Splitting one debit across any number of credits of the same total balances.
    #[test]
    fn prop_split_credits_balance(
        parts in prop::collection::vec(positive_amount(), 1..8),
    ) {
        let total: Decimal = parts.iter().copied().sum();
        let mut lines = vec![JournalLineInput::debit(AccountId::new(), total)];
        lines.extend(parts.iter().map(|amount| JournalLineInput::credit(AccountId::new(), *amount)));

        let totals = validate_lines(&lines).unwrap();
        prop_assert_eq!(totals.debit, total);
        prop_assert_eq!(totals.credit, total);
    }

    /// Any mismatch between the two sides is reported with both totals.
    #[test]
    fn prop_mismatch_reported(
        debit in positive_amount(),
        credit in positive_amount(),
    ) {
        prop_assume!(debit != credit);
        let lines = vec![
            JournalLineInput::debit(AccountId::new(), debit),
            JournalLineInput::credit(AccountId::new(), credit),
        ];

        match validate_lines(&lines) {
            Err(LedgerError::Unbalanced { debit: d, credit: c }) => {
                prop_assert_eq!(d, debit);
                prop_assert_eq!(c, credit);
            }
            other => prop_assert!(false, "expected Unbalanced, got {:?}", other),
        }
    }
}
