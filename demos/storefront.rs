//! Storefront Example
//!
//! Walks through a visit to the shop: browse the catalog, fill the cart, check out, then follow
//! the order through to delivery.
//!
//! Use `--category`, `--search` and `--sort` to filter the listing
//! Use `--cart-dir` to keep the cart between runs
//!
//! Run with: `cargo run --example storefront -- --category fruits --sort price-asc`

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use harvest::prelude::*;

/// Storefront example arguments
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Harvest storefront walkthrough", long_about = None)]
struct DemoArgs {
    /// Storefront settings
    #[command(flatten)]
    config: StorefrontConfig,

    /// Category to browse, or "all"
    #[arg(long, default_value = "all")]
    category: String,

    /// Product name search
    #[arg(long, default_value = "")]
    search: String,

    /// Sort key (name, name-desc, price-asc, price-desc)
    #[arg(long, default_value = "name")]
    sort: String,

    /// Number of each listed product to add to the cart
    #[arg(short = 'q', long, default_value_t = 1)]
    quantity: u32,
}

/// Storefront Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    _ = dotenvy::dotenv();

    let args = DemoArgs::parse();

    init_subscriber(&args.config.logging)?;

    let mut store = args.config.build_storefront()?;

    if store.restore_cart()? {
        info!(items = store.cart().item_count(), "picked up where the last visit left off");
    }

    store.dispatch(Action::SetFilter(
        Filter::for_category(&args.category)
            .with_search(&args.search)
            .sorted_by(SortBy::parse(&args.sort)),
    ))?;

    let listing = store.query();

    println!("{} products", listing.len());

    for product in &listing {
        let price = product.price.to_string();

        println!("  {:<24} {price:>10}  {}", product.name, product.unit);
    }

    for product in &listing {
        store.dispatch(Action::AddToCart {
            product_id: product.id.clone(),
            quantity: args.quantity,
        })?;
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    write_cart(&mut handle, store.cart())?;

    if store.cart().is_empty() {
        return Ok(());
    }

    let customer = CustomerInfo::new("Ada Lovelace", "ada@example.com", "1 Market Street")
        .with_notes("Deliver to the loading bay");

    let Outcome::OrderSubmitted(order_id) = store.dispatch(Action::SubmitOrder(customer))? else {
        return Ok(());
    };

    store.dispatch(Action::AdvanceOrder(order_id.clone()))?;
    store.dispatch(Action::AdvanceOrder(order_id.clone()))?;

    if let Some(order) = store.track_order(order_id.as_str()) {
        println!();
        write_receipt(&mut handle, order)?;
    }

    let summary = store.order_summary()?;

    println!(
        "\n{} order(s), revenue {}, average {}",
        summary.total_orders, summary.revenue, summary.average_order_value
    );

    Ok(())
}
