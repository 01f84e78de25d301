//! Commission arithmetic for sale records.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::RepositoryError;

/// Fixed commission rate applied to every sale (25%).
pub const COMMISSION_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Largest amount a `NUMERIC(14, 2)` column holds.
const MAX_STORED_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Round to cents, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Commission owed on a sale.
pub fn commission_for(sale_amount: Decimal) -> Decimal {
    round_money(sale_amount * COMMISSION_RATE)
}

/// Round a sale amount to the cents it is stored with, rejecting amounts that
/// are not strictly positive after rounding or would overflow the column.
pub fn validate_sale_amount(sale_amount: Decimal) -> Result<Decimal, RepositoryError> {
    let stored = round_money(sale_amount);
    if stored <= Decimal::ZERO {
        return Err(RepositoryError::validation_error(
            "saleAmount must be at least 0.01",
        ));
    }
    if stored > MAX_STORED_AMOUNT {
        return Err(RepositoryError::validation_error("saleAmount is too large"));
    }
    Ok(stored)
}
