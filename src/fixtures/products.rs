//! Product Fixtures

use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    pricing::minor_units,
    products::{Category, Product, ProductId},
};

/// Catalog fixture file
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// ISO code of the catalog currency, e.g. "USD"
    pub currency: String,

    /// Categories, in display order
    #[serde(default)]
    pub categories: Vec<CategoryFixture>,

    /// Products, in catalog order
    pub products: Vec<ProductFixture>,
}

/// Ids may be written as numbers or strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FixtureId {
    /// Numeric id, e.g. `1`
    Number(u64),

    /// String id, e.g. `"apples"`
    Text(String),
}

impl From<FixtureId> for ProductId {
    fn from(id: FixtureId) -> Self {
        match id {
            FixtureId::Number(number) => ProductId::from(number),
            FixtureId::Text(text) => ProductId::from(text),
        }
    }
}

impl From<FixtureId> for String {
    fn from(id: FixtureId) -> Self {
        match id {
            FixtureId::Number(number) => number.to_string(),
            FixtureId::Text(text) => text,
        }
    }
}

/// Category Fixture
#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    /// Category id
    pub id: FixtureId,

    /// Display name
    pub name: String,
}

impl From<CategoryFixture> for Category {
    fn from(fixture: CategoryFixture) -> Self {
        Category {
            id: fixture.id.into(),
            name: fixture.name,
        }
    }
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: FixtureId,

    /// Product name
    pub name: String,

    /// Product price (e.g., "24.99 USD")
    pub price: String,

    /// Category name
    pub category: String,

    /// Packaging, e.g. "10kg box"
    #[serde(default)]
    pub unit: String,

    /// Units in stock
    #[serde(default)]
    pub stock: Option<u32>,

    /// Average rating between 0 and 5
    #[serde(default)]
    pub rating: Option<Decimal>,

    /// Show on the landing page
    #[serde(default)]
    pub featured: bool,

    /// Product description
    #[serde(default)]
    pub description: String,
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        if let Some(rating) = fixture
            .rating
            .filter(|rating| !(Decimal::ZERO..=Decimal::new(5, 0)).contains(rating))
        {
            return Err(FixtureError::InvalidRating(rating.to_string()));
        }

        Ok(Product {
            id: fixture.id.into(),
            name: fixture.name,
            price: Money::from_minor(minor_units, currency),
            category: fixture.category,
            unit: fixture.unit,
            stock_quantity: fixture.stock,
            rating: fixture.rating,
            featured: fixture.featured,
            description: fixture.description,
        })
    }
}

/// Parse price string (e.g., "24.99 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the amount is not a
/// non-negative decimal, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;
    let currency = parse_currency(currency_code)?;

    let minor_units =
        minor_units(amount, currency).ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Parse a supported ISO currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for anything but GBP, USD or EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99USD");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_negative_amounts() {
        let result = parse_price("-1.00 USD");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_accepts_supported_currencies() -> Result<(), FixtureError> {
        let (usd_minor, usd) = parse_price("24.99 USD")?;
        let (gbp_minor, gbp) = parse_price("1 GBP")?;
        let (eur_minor, eur) = parse_price("2.50 EUR")?;

        assert_eq!(usd_minor, 2499);
        assert_eq!(usd, USD);
        assert_eq!(gbp_minor, 100);
        assert_eq!(gbp, GBP);
        assert_eq!(eur_minor, 250);
        assert_eq!(eur, EUR);

        Ok(())
    }

    #[test]
    fn numeric_and_string_ids_are_accepted() -> TestResult {
        let fixture: CatalogFixture = serde_norway::from_str(
            r#"
currency: USD
products:
  - id: 1
    name: Fresh Apples
    price: 24.99 USD
    category: Fruits
  - id: "melon"
    name: Melon
    price: 3.00 USD
    category: Fruits
"#,
        )?;

        let ids: Vec<ProductId> = fixture
            .products
            .into_iter()
            .map(|product| ProductId::from(product.id))
            .collect();

        assert_eq!(ids, [ProductId::from("1"), ProductId::from("melon")]);

        Ok(())
    }

    #[test]
    fn out_of_range_ratings_are_rejected() -> TestResult {
        let fixture: ProductFixture = serde_norway::from_str(
            r#"
id: 1
name: Fresh Apples
price: 24.99 USD
category: Fruits
rating: "5.5"
"#,
        )?;

        let result = Product::try_from(fixture);

        assert!(matches!(result, Err(FixtureError::InvalidRating(rating)) if rating == "5.5"));

        Ok(())
    }
}
