//! Products

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::Price;

/// Product identifier.
///
/// Catalog sources use either numeric or string ids; both are stored as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product id, unique within a catalog
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price
    pub price: Price,

    /// Category name
    pub category: String,

    /// How the product is packaged, e.g. "10kg box"
    pub unit: String,

    /// Units in stock, when tracked
    pub stock_quantity: Option<u32>,

    /// Average rating between 0 and 5
    pub rating: Option<Decimal>,

    /// Whether the product is shown on the landing page
    pub featured: bool,

    /// Product description
    pub description: String,
}

impl Product {
    /// Create a product with the given id, name, price and category.
    ///
    /// The remaining fields start empty and can be filled in with struct update syntax.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Price,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category: category.into(),
            unit: String::new(),
            stock_quantity: None,
            rating: None,
            featured: false,
            description: String::new(),
        }
    }
}

/// Product category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category id
    pub id: String,

    /// Display name, matched against [`Product::category`]
    pub name: String,
}
