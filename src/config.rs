//! Storefront configuration

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::{
    catalog::Catalog,
    fixtures::{Fixture, FixtureError},
    mirror::{CartMirror, FileBlobStore},
    orders::OrderIdStrategy,
    store::Storefront,
};

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Clone, Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Catalog and cart storage settings.
#[derive(Clone, Debug, Args)]
pub struct StorageConfig {
    /// Directory holding `catalogs/<name>.yml` fixture files
    #[arg(long, env = "HARVEST_FIXTURES_DIR", default_value = "./fixtures")]
    pub fixtures_dir: PathBuf,

    /// Catalog fixture to load
    #[arg(short, long, env = "HARVEST_CATALOG", default_value = "produce")]
    pub catalog: String,

    /// Directory to mirror the cart into. The cart is not mirrored when unset.
    #[arg(long, env = "HARVEST_CART_DIR")]
    pub cart_dir: Option<PathBuf>,

    /// How order ids are generated (sequential, uuid)
    #[arg(
        long,
        env = "HARVEST_ORDER_IDS",
        value_enum,
        default_value_t = OrderIdStrategy::Sequential
    )]
    pub order_ids: OrderIdStrategy,
}

/// Harvest storefront configuration
#[derive(Clone, Debug, Parser)]
#[command(name = "harvest", about = "Harvest storefront", long_about = None)]
pub struct StorefrontConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Catalog and cart storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,
}

impl StorefrontConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Load the configured catalog fixture.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the catalog can't be loaded.
    pub fn load_catalog(&self) -> Result<Catalog, FixtureError> {
        Fixture::with_base_path(&self.storage.fixtures_dir).load_catalog(&self.storage.catalog)
    }

    /// Build a storefront from the configured catalog, order ids and cart mirror.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the catalog can't be loaded.
    pub fn build_storefront(&self) -> Result<Storefront, FixtureError> {
        let storefront = Storefront::new(self.load_catalog()?)
            .with_boxed_order_ids(self.storage.order_ids.generator());

        Ok(match &self.storage.cart_dir {
            Some(dir) => storefront.with_cart_mirror(CartMirror::new(FileBlobStore::new(dir))),
            None => storefront,
        })
    }
}
