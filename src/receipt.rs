//! Receipt
//!
//! Text tables for an order or the cart: one row per line, then the total.

use std::io;

use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine},
    orders::Order,
    pricing::{PricingError, line_total, total_price},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating a line or order total.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Writes an order receipt: order details, the items table and the order total.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if a total overflows or the writer fails.
pub fn write_receipt(mut out: impl io::Write, order: &Order) -> Result<(), ReceiptError> {
    let customer = order.customer();

    writeln!(out, "Order {} ({})", order.id(), order.status()).map_err(|_err| ReceiptError::IO)?;
    writeln!(out, "Placed:   {}", order.created_at()).map_err(|_err| ReceiptError::IO)?;

    if let Some(delivered_at) = order.delivered_at() {
        writeln!(out, "Delivered: {delivered_at}").map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out, "Customer: {} <{}>", customer.name, customer.contact)
        .map_err(|_err| ReceiptError::IO)?;
    writeln!(out, "Address:  {}", customer.address).map_err(|_err| ReceiptError::IO)?;

    if let Some(notes) = &customer.notes {
        writeln!(out, "Notes:    {notes}").map_err(|_err| ReceiptError::IO)?;
    }

    write_lines(&mut out, order.lines(), order.currency())
}

/// Writes the cart as an items table followed by the cart total.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if a total overflows or the writer fails.
pub fn write_cart(mut out: impl io::Write, cart: &Cart) -> Result<(), ReceiptError> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty").map_err(|_err| ReceiptError::IO);
    }

    write_lines(&mut out, cart.lines(), cart.currency())
}

fn write_lines(
    out: &mut impl io::Write,
    lines: &[CartLine],
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Product", "Unit", "Qty", "Unit Price", "Total"]);

    for line in lines {
        let product = line.product();

        builder.push_record([
            product.name.clone(),
            product.unit.clone(),
            line.quantity().to_string(),
            product.price.to_string(),
            line_total(line)?.to_string(),
        ]);
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Columns::new(2..5), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    let total = total_price(lines, currency)?;

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;
    writeln!(out, " Total: {total}").map_err(|_err| ReceiptError::IO)
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use super::*;
    use crate::{
        orders::{CustomerInfo, OrderRegistry, OrderStatus},
        products::Product,
    };

    fn cart() -> TestResult<Cart> {
        let apples = Product {
            unit: "10kg box".to_string(),
            ..Product::new("1", "Fresh Apples", Money::from_minor(24_99, USD), "Fruits")
        };
        let carrots = Product {
            unit: "10kg sack".to_string(),
            ..Product::new("3", "Fresh Carrots", Money::from_minor(15_99, USD), "Vegetables")
        };

        let mut cart = Cart::new(USD);

        cart.add(&apples, 2)?;
        cart.add(&carrots, 1)?;

        Ok(cart)
    }

    #[test]
    fn write_cart_renders_lines_and_total() -> TestResult {
        let mut out = Vec::new();

        write_cart(&mut out, &cart()?)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Fresh Apples"));
        assert!(output.contains("10kg sack"));
        assert!(output.contains("$49.98"));
        assert!(output.contains("Total: $65.97"));

        Ok(())
    }

    #[test]
    fn write_cart_reports_empty_carts() -> TestResult {
        let mut out = Vec::new();

        write_cart(&mut out, &Cart::new(USD))?;

        assert_eq!(String::from_utf8(out)?, "Your cart is empty\n");

        Ok(())
    }

    #[test]
    fn write_receipt_renders_order_details() -> TestResult {
        let mut registry = OrderRegistry::new();
        let mut cart = cart()?;

        let customer = CustomerInfo::new("Ada Lovelace", "ada@example.com", "1 Market Street")
            .with_notes("Back door");
        let id = registry.submit(&mut cart, customer)?;

        registry.update_status(id.as_str(), OrderStatus::Delivered)?;

        let order = registry.track(id.as_str()).ok_or("order missing")?;
        let mut out = Vec::new();

        write_receipt(&mut out, order)?;

        let output = String::from_utf8(out)?;

        assert!(output.starts_with("Order 100000 (Delivered)"));
        assert!(output.contains("Ada Lovelace <ada@example.com>"));
        assert!(output.contains("Notes:    Back door"));
        assert!(output.contains("Delivered: "));
        assert!(output.contains("Total: $65.97"));

        Ok(())
    }

    #[test]
    fn write_receipt_skips_missing_optional_details() -> TestResult {
        let mut registry = OrderRegistry::new();
        let mut cart = cart()?;

        let id = registry.submit(
            &mut cart,
            CustomerInfo::new("Ada", "ada@example.com", "1 Market Street"),
        )?;

        let order = registry.track(id.as_str()).ok_or("order missing")?;
        let mut out = Vec::new();

        write_receipt(&mut out, order)?;

        let output = String::from_utf8(out)?;

        assert!(!output.contains("Notes:"));
        assert!(!output.contains("Delivered:"));
        assert!(order.created_at() <= Timestamp::now());

        Ok(())
    }
}
