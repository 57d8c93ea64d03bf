//! Catalog
//!
//! The products and categories on sale, loaded once and read-only afterwards.

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::products::{Category, Product, ProductId};

pub mod filter;
pub mod query;

pub use filter::{Filter, SortBy, parse_price_bound};
pub use query::query_catalog;

/// Errors related to catalog construction or lookups.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Two products share an id.
    #[error("Product {0} is listed more than once")]
    DuplicateProduct(ProductId),

    /// A product's currency differs from the catalog currency.
    ///
    /// Holds the product, the product currency and the catalog currency.
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// A product has a price below zero.
    #[error("Product {0} has a negative price")]
    NegativePrice(ProductId),

    /// No product has the given id.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
    categories: Vec<Category>,
    currency: &'static Currency,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: Vec::new(),
            index: FxHashMap::default(),
            categories: Vec::new(),
            currency,
        }
    }

    /// Create a catalog with the given products and categories.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if two products share an id, or a product is priced below zero or
    /// in another currency.
    pub fn with_products(
        products: impl Into<Vec<Product>>,
        categories: impl Into<Vec<Category>>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let products = products.into();
        let mut index = FxHashMap::default();

        for (position, product) in products.iter().enumerate() {
            let product_currency = product.price.currency();

            if product_currency != currency {
                return Err(CatalogError::CurrencyMismatch(
                    product.id.clone(),
                    product_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if product.price.is_negative() {
                return Err(CatalogError::NegativePrice(product.id.clone()));
            }

            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }

        Ok(Self {
            products,
            index,
            categories: categories.into(),
            currency,
        })
    }

    /// Look up a product by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index
            .get(id)
            .and_then(|position| self.products.get(*position))
    }

    /// Look up a product by id, treating a miss as an error.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if no product has the id.
    pub fn require(&self, id: &ProductId) -> Result<&Product, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))
    }

    /// Run a filter against the catalog.
    pub fn query(&self, filter: &Filter) -> Vec<Product> {
        query_catalog(&self.products, filter)
    }

    /// Products flagged for the landing page, in catalog order.
    pub fn featured(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|product| product.featured)
    }

    /// All products, in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All categories, including ones with no products.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Distinct category names used by at least one product, in first-seen order.
    pub fn category_names_in_use(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();

        for product in &self.products {
            if !names
                .iter()
                .any(|name| name.eq_ignore_ascii_case(&product.category))
            {
                names.push(&product.category);
            }
        }

        names
    }

    /// Get the number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Get the currency of the catalog.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
