//! Monetary precision shared by ledger lines and budget amounts.

use rust_decimal::Decimal;

/// Decimal places stored for every monetary amount.
pub const MONEY_SCALE: u32 = 4;

/// Whether `amount` needs more than [`MONEY_SCALE`] decimal places.
///
/// Trailing zeros do not count: `1.50000` fits, `1.00001` does not.
#[must_use]
pub fn exceeds_money_scale(amount: Decimal) -> bool {
    amount.normalize().scale() > MONEY_SCALE
}
