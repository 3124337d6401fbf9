//! Conversion between `Decimal` amounts and the integer cents stored in SQLite.
//!
//! Amounts are persisted as `decimal(12,2)` values scaled to cents so the
//! database can compare and subtract them exactly inside a single statement.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::{DbError, DbResult};

/// Largest magnitude representable as `decimal(12,2)`: 9 999 999 999.99
pub const MAX_CENTS: i64 = 999_999_999_999;

/// Convert an amount to cents.
///
/// Fails if the amount carries more than two fractional digits or does not
/// fit in `decimal(12,2)`. Negative amounts are converted as-is; callers
/// decide whether a sign is acceptable.
pub fn to_cents(amount: Decimal) -> DbResult<i64> {
    let normalized = amount.normalize();
    if normalized.scale() > 2 {
        return Err(DbError::InvalidInput(format!(
            "{} has more than two decimal places",
            amount
        )));
    }

    let cents = normalized
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|c| c.to_i64())
        .filter(|c| c.abs() <= MAX_CENTS)
        .ok_or_else(|| DbError::InvalidInput(format!("{} is out of range", amount)))?;

    Ok(cents)
}

/// Convert stored cents back to a two-decimal amount
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
