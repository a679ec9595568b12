//! Debit/credit aggregation and normal-balance netting.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The side on which an account naturally increases.
///
/// - Asset/Expense: balance += debit - credit (debit-normal)
/// - Liability/Equity/Revenue: balance += credit - debit (credit-normal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Increases with debits.
    Debit,
    /// Increases with credits.
    Credit,
}

impl NormalBalance {
    /// Nets a debit and credit total against this side.
    #[must_use]
    pub fn net(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Debit and credit totals for one account over some range of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTotals {
    /// Sum of debits.
    pub debit: Decimal,
    /// Sum of credits.
    pub credit: Decimal,
}

impl AccountTotals {
    /// Empty totals.
    pub const ZERO: Self = Self {
        debit: Decimal::ZERO,
        credit: Decimal::ZERO,
    };

    /// Creates totals from explicit sums.
    #[must_use]
    pub const fn new(debit: Decimal, credit: Decimal) -> Self {
        Self { debit, credit }
    }

    /// Signed balance on the given side (may be negative).
    #[must_use]
    pub fn balance(&self, side: NormalBalance) -> Decimal {
        side.net(self.debit, self.credit)
    }

    /// Returns true if debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }
}

impl Add for AccountTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            debit: self.debit + rhs.debit,
            credit: self.credit + rhs.credit,
        }
    }
}

impl AddAssign for AccountTotals {
    fn add_assign(&mut self, rhs: Self) {
        self.debit += rhs.debit;
        self.credit += rhs.credit;
    }
}

impl Sum for AccountTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
