//! Fixtures
//!
//! Catalogs loaded from YAML files under `fixtures/catalogs`.

use std::{fs, path::PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{Catalog, CatalogError},
    fixtures::products::{CatalogFixture, parse_currency},
    products::{Category, Product},
};

pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Rating outside 0 to 5
    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between the catalog and a product
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Catalog rejected the products
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Fixture {
    /// Create a fixture loader with the default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a fixture loader with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load a catalog from `<base>/catalogs/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the catalog is invalid.
    pub fn load_catalog(&self, name: &str) -> Result<Catalog, FixtureError> {
        let file_path = self.base_path.join("catalogs").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        let catalog = parse_catalog(&contents)?;

        debug!(
            path = %file_path.display(),
            products = catalog.len(),
            "loaded catalog fixture"
        );

        Ok(catalog)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a catalog from fixture YAML
///
/// # Errors
///
/// Returns an error if the YAML is invalid, a price or currency can't be parsed, a product is
/// priced in another currency, or two products share an id.
pub fn parse_catalog(yaml: &str) -> Result<Catalog, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(yaml)?;
    let currency = parse_currency(&fixture.currency)?;

    let products = fixture
        .products
        .into_iter()
        .map(|product_fixture| {
            let product = Product::try_from(product_fixture)?;
            let product_currency = product.price.currency();

            if product_currency != currency {
                return Err(FixtureError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    product_currency.iso_alpha_code.to_string(),
                ));
            }

            Ok(product)
        })
        .collect::<Result<Vec<_>, FixtureError>>()?;

    let categories: Vec<Category> = fixture.categories.into_iter().map(Category::from).collect();

    Ok(Catalog::with_products(products, categories, currency)?)
}
