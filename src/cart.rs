//! Cart

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    pricing::{Price, PricingError, calculate_total, total_price},
    products::{Product, ProductId},
};

/// Errors related to cart mutation or totals.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// Items are added one at a time at minimum.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The requested quantity does not fit the cart's quantity type.
    #[error("quantity {0} is out of range")]
    QuantityOutOfRange(i64),

    /// The product's currency differs from the cart currency.
    ///
    /// Holds the product, the product currency and the cart currency.
    #[error("Product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// A product in the cart with its quantity.
///
/// The product is a snapshot taken when it was first added.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    product: Product,
    quantity: u32,
}

impl CartLine {
    /// Creates a new line for the given product and quantity.
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// Returns the product on this line.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Returns the id of the product on this line.
    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Returns the quantity on this line.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: &'static Currency,
}

impl Cart {
    /// Create a new, empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Add a product to the cart, returning the quantity of its line afterwards.
    ///
    /// Adding a product that is already in the cart increases the quantity of its line.
    ///
    /// # Errors
    ///
    /// - [`CartError::ZeroQuantity`]: `quantity` is zero.
    /// - [`CartError::QuantityOutOfRange`]: the new line quantity would overflow.
    /// - [`CartError::CurrencyMismatch`]: the product is priced in another currency.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<u32, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                product.id.clone(),
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        match self
            .position(&product.id)
            .and_then(|index| self.lines.get_mut(index))
        {
            Some(line) => {
                line.quantity = line.quantity.checked_add(quantity).ok_or_else(|| {
                    CartError::QuantityOutOfRange(
                        i64::from(line.quantity).saturating_add(i64::from(quantity)),
                    )
                })?;

                Ok(line.quantity)
            }
            None => {
                self.lines.push(CartLine::new(product.clone(), quantity));

                Ok(quantity)
            }
        }
    }

    /// Remove the line for a product. Removing a product that isn't in the cart does nothing.
    ///
    /// Returns the removed line, if there was one.
    pub fn remove(&mut self, product: &ProductId) -> Option<CartLine> {
        let index = self.position(product)?;

        Some(self.lines.remove(index))
    }

    /// Set the quantity of a product's line.
    ///
    /// A quantity of zero or less removes the line. Unknown products are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOutOfRange`] if `quantity` is larger than a line can hold.
    pub fn update_quantity(&mut self, product: &ProductId, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            self.remove(product);

            return Ok(());
        }

        let quantity =
            u32::try_from(quantity).map_err(|_err| CartError::QuantityOutOfRange(quantity))?;

        if let Some(line) = self.lines.iter_mut().find(|line| line.product.id == *product) {
            line.quantity = quantity;
        }

        Ok(())
    }

    /// Remove every line from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Calculate the total of the cart.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError` if the total overflows.
    pub fn total(&self) -> Result<Price, PricingError> {
        total_price(&self.lines, self.currency)
    }

    /// Calculate the total of the cart, formatted with the currency's minor-unit digits.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError` if the total overflows.
    pub fn formatted_total(&self) -> Result<String, PricingError> {
        calculate_total(&self.lines, self.currency)
    }

    /// Get the line for a product.
    pub fn line(&self, product: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == *product)
    }

    /// Get the lines in the order they were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Get the total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn position(&self, product: &ProductId) -> Option<usize> {
        self.lines.iter().position(|line| line.product.id == *product)
    }
}
