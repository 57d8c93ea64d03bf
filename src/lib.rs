//! Harvest
//!
//! Harvest is the state engine behind a produce storefront: catalog filtering and sorting, a
//! shopping cart, and an order registry with tracking and status updates. Everything lives in
//! memory and is driven through a single [`store::Storefront`].

pub mod cart;
pub mod catalog;
pub mod config;
pub mod fixtures;
pub mod logging;
pub mod mirror;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod store;
