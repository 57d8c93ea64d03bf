//! Harvest prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine},
    catalog::{Catalog, CatalogError, Filter, SortBy, parse_price_bound, query_catalog},
    config::{LogFormat, LoggingConfig, StorefrontConfig},
    fixtures::{Fixture, FixtureError, parse_catalog},
    logging::{LoggingError, build_subscriber, init_subscriber},
    mirror::{BlobStore, CartMirror, CartSnapshot, FileBlobStore, MemoryBlobStore, MirrorError},
    orders::{
        CustomerInfo, Order, OrderError, OrderId, OrderIdGenerator, OrderIdStrategy, OrderQuery,
        OrderRegistry, OrderSort, OrderStatus, OrderSummary, SequentialOrderIds, UuidOrderIds,
    },
    pricing::{Price, PricingError, calculate_total, format_amount, total_price},
    products::{Category, Product, ProductId},
    receipt::{ReceiptError, write_cart, write_receipt},
    store::{Action, ErrorKind, Outcome, StoreError, Storefront},
};
