//! Pricing

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{cart::CartLine, products::ProductId};

/// A price in one of the catalog's ISO currencies.
pub type Price = Money<'static, Currency>;

/// Errors that can occur while calculating totals.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A line is priced in a different currency from the requested total.
    #[error("product {product} is priced in {actual}, but the total is in {expected}")]
    CurrencyMismatch {
        /// Product on the offending line
        product: ProductId,
        /// Currency of the total
        expected: &'static str,
        /// Currency of the line
        actual: &'static str,
    },

    /// Price times quantity, or the running total, does not fit in minor units.
    #[error("total overflows at product {0}")]
    Overflow(ProductId),
}

/// Returns the price of a single line, unit price times quantity.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] when the line total does not fit in minor units.
pub fn line_total(line: &CartLine) -> Result<Price, PricingError> {
    let price = line.product().price;

    let minor_units = price
        .to_minor_units()
        .checked_mul(i64::from(line.quantity()))
        .ok_or_else(|| PricingError::Overflow(line.product_id().clone()))?;

    Ok(Money::from_minor(minor_units, price.currency()))
}

/// Calculates the total price of a list of lines in the given currency.
///
/// An empty list totals zero.
///
/// # Errors
///
/// - [`PricingError::CurrencyMismatch`]: a line is priced in another currency.
/// - [`PricingError::Overflow`]: the total does not fit in minor units.
pub fn total_price<'a>(
    lines: impl IntoIterator<Item = &'a CartLine>,
    currency: &'static Currency,
) -> Result<Price, PricingError> {
    let minor_units = lines.into_iter().try_fold(0_i64, |acc, line| {
        let line_currency = line.product().price.currency();

        if line_currency != currency {
            return Err(PricingError::CurrencyMismatch {
                product: line.product_id().clone(),
                expected: currency.iso_alpha_code,
                actual: line_currency.iso_alpha_code,
            });
        }

        acc.checked_add(line_total(line)?.to_minor_units())
            .ok_or_else(|| PricingError::Overflow(line.product_id().clone()))
    })?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Calculates the total of a list of lines, formatted with the currency's minor-unit digits
/// (e.g. `"30.00"` in USD, `"500"` in JPY).
///
/// # Errors
///
/// See [`total_price`].
pub fn calculate_total(
    lines: &[CartLine],
    currency: &'static Currency,
) -> Result<String, PricingError> {
    Ok(format_amount(&total_price(lines, currency)?))
}

/// Returns the decimal amount of a price, keeping every minor-unit digit of its currency.
pub fn amount(price: &Price) -> Decimal {
    Decimal::new(price.to_minor_units(), price.currency().exponent)
}

/// Formats a price as a bare amount with its currency's minor-unit digits, without a symbol.
pub fn format_amount(price: &Price) -> String {
    amount(price).to_string()
}

/// Converts a decimal amount to a price, rounding to the nearest minor unit.
///
/// Returns `None` when the amount does not fit in minor units.
pub fn price_from_amount(amount: Decimal, currency: &'static Currency) -> Option<Price> {
    minor_units(amount, currency).map(|minor_units| Money::from_minor(minor_units, currency))
}

/// Converts a decimal amount to the currency's minor units, rounding to the nearest one.
///
/// Returns `None` when the amount does not fit.
pub fn minor_units(amount: Decimal, currency: &Currency) -> Option<i64> {
    let scale = 10_i64.checked_pow(currency.exponent)?;

    amount
        .checked_mul(Decimal::from(scale))
        .and_then(|value| value.round_dp(0).to_i64())
}
