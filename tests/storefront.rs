//! Integration tests driving the storefront end to end against the `basics` and `produce`
//! catalog fixtures.
//!
//! The `basics` catalog holds Apple (2.00, Fruits), Carrot (1.00, Vegetables) and Melon
//! (10.00, Fruits), all in USD.

use rusty_money::iso::USD;
use testresult::TestResult;

use harvest::prelude::*;

fn storefront() -> Result<Storefront, FixtureError> {
    Ok(Storefront::new(Fixture::new().load_catalog("basics")?))
}

fn names(products: &[Product]) -> Vec<&str> {
    products.iter().map(|product| product.name.as_str()).collect()
}

fn customer() -> CustomerInfo {
    CustomerInfo::new("Ada Lovelace", "ada@example.com", "1 Market Street")
}

#[test]
fn empty_filter_lists_everything_by_name() -> TestResult {
    let store = storefront()?;

    assert_eq!(names(&store.query()), ["Apple", "Carrot", "Melon"]);

    Ok(())
}

#[test]
fn category_min_price_and_sort_scenarios() -> TestResult {
    let mut store = storefront()?;

    store.navigate_to_category("Fruits");
    assert_eq!(names(&store.query()), ["Apple", "Melon"]);

    store.set_filter(Filter::from_raw("", "", "1.5", "", ""));
    assert_eq!(names(&store.query()), ["Apple", "Melon"]);

    store.set_filter(Filter::from_raw("", "", "", "", "price-asc"));
    assert_eq!(names(&store.query()), ["Carrot", "Apple", "Melon"]);

    store.set_filter(Filter::from_raw("Vegetables", "", "", "", "price-high"));
    assert_eq!(names(&store.query()), ["Carrot"]);

    store.reset_filter();
    assert_eq!(store.query().len(), 3);

    Ok(())
}

#[test]
fn malformed_price_bounds_apply_no_bound() -> TestResult {
    let mut store = storefront()?;

    store.set_filter(Filter::from_raw("", "", "cheap", "lots", "name-desc"));

    assert_eq!(names(&store.query()), ["Melon", "Carrot", "Apple"]);

    Ok(())
}

#[test]
fn repeated_adds_accumulate_into_one_line() -> TestResult {
    let mut store = storefront()?;
    let melon = ProductId::from(5_u64);

    store.add_to_cart(&melon, 1)?;
    store.add_to_cart(&melon, 2)?;

    let line = store.cart().line(&melon).ok_or("melon missing from cart")?;

    assert_eq!(line.quantity(), 3);
    assert_eq!(store.cart().len(), 1);
    assert_eq!(store.cart_total()?, "30.00");

    Ok(())
}

#[test]
fn non_positive_quantities_remove_lines() -> TestResult {
    let mut store = storefront()?;
    let apple = ProductId::from("1");
    let carrot = ProductId::from("2");

    store.add_to_cart(&apple, 2)?;
    store.add_to_cart(&carrot, 2)?;

    store.update_cart_item_quantity(&apple, 0)?;
    store.update_cart_item_quantity(&carrot, -3)?;

    assert!(store.cart().is_empty());
    assert_eq!(store.cart_total()?, "0.00");

    Ok(())
}

#[test]
fn totals_add_up_across_disjoint_lines() -> TestResult {
    let mut store = storefront()?;

    store.add_to_cart(&ProductId::from("1"), 3)?;
    store.add_to_cart(&ProductId::from("2"), 4)?;
    store.add_to_cart(&ProductId::from("5"), 1)?;

    let lines = store.cart().lines();
    let (left, right) = lines.split_at(1);

    let whole = total_price(lines, USD)?;
    let sum = total_price(left, USD)?.to_minor_units() + total_price(right, USD)?.to_minor_units();

    assert_eq!(whole.to_minor_units(), sum);
    assert_eq!(calculate_total(lines, USD)?, "20.00");

    Ok(())
}

#[test]
fn checkout_snapshots_cart_and_tracks_order() -> TestResult {
    let mut store = storefront()?;

    store.add_to_cart(&ProductId::from("1"), 2)?;
    store.add_to_cart(&ProductId::from("2"), 1)?;

    let before = store.cart().lines().to_vec();
    let id = store.submit_order(customer().with_notes("Leave with reception"))?;

    assert!(store.cart().is_empty());

    let order = store.track_order(id.as_str()).ok_or("order not tracked")?;

    assert_eq!(order.lines(), before.as_slice());
    assert_eq!(order.status(), OrderStatus::Pending);
    assert_eq!(order.formatted_total()?, "5.00");
    assert_eq!(order.customer().notes.as_deref(), Some("Leave with reception"));

    Ok(())
}

#[test]
fn never_issued_ids_are_not_tracked() -> TestResult {
    let mut store = storefront()?;

    store.add_to_cart(&ProductId::from("1"), 1)?;
    store.submit_order(customer())?;

    assert!(store.track_order("000001").is_none());
    assert!(store.track_order("").is_none());

    Ok(())
}

#[test]
fn orders_move_forward_to_delivery() -> TestResult {
    let mut store = storefront()?;

    store.add_to_cart(&ProductId::from("5"), 1)?;

    let id = store.submit_order(customer())?;

    store.advance_order(id.as_str())?;

    let order = store.update_order_status(id.as_str(), OrderStatus::Delivered)?;

    assert_eq!(order.status(), OrderStatus::Delivered);
    assert!(order.delivered_at().is_some());

    let error = store
        .update_order_status(id.as_str(), OrderStatus::InProgress)
        .map(Order::status)
        .err()
        .ok_or("moving backwards should fail")?;

    assert_eq!(error.kind(), ErrorKind::InvalidInput);

    Ok(())
}

#[test]
fn admin_listing_and_summary() -> TestResult {
    let mut store = storefront()?;

    store.add_to_cart(&ProductId::from("1"), 1)?;
    let grace = CustomerInfo::new("Grace Hopper", "grace@example.com", "2 Dock Road");
    let first = store.submit_order(grace)?;

    store.add_to_cart(&ProductId::from("5"), 2)?;
    let second = store.submit_order(customer())?;

    store.advance_order(first.as_str())?;

    let by_total = store.list_orders(&OrderQuery::default().sorted_by(OrderSort::TotalDesc));
    let ids: Vec<&OrderId> = by_total.iter().map(|order| order.id()).collect();

    assert_eq!(ids, [&second, &first]);

    let in_progress =
        store.list_orders(&OrderQuery::default().with_status(Some(OrderStatus::InProgress)));

    assert_eq!(in_progress.len(), 1);

    let grace = store.list_orders(&OrderQuery::default().with_search("grace"));

    assert_eq!(grace.first().map(|order| order.id()), Some(&first));

    let summary = store.order_summary()?;

    assert_eq!(summary.total_orders, 2);
    assert_eq!(format_amount(&summary.revenue), "22.00");
    assert_eq!(format_amount(&summary.average_order_value), "11.00");
    assert_eq!(summary.count(OrderStatus::Pending), 1);
    assert_eq!(summary.count(OrderStatus::InProgress), 1);

    Ok(())
}

#[test]
fn uuid_order_ids_are_unique() -> TestResult {
    let mut store = storefront()?.with_order_ids(UuidOrderIds);

    store.add_to_cart(&ProductId::from("1"), 1)?;
    let first = store.submit_order(customer())?;

    store.add_to_cart(&ProductId::from("1"), 1)?;
    let second = store.submit_order(customer())?;

    assert_ne!(first, second);

    Ok(())
}

#[test]
fn cart_survives_a_restart_through_the_file_mirror() -> TestResult {
    let dir = tempfile::tempdir()?;

    let mut store = storefront()?.with_cart_mirror(CartMirror::new(FileBlobStore::new(dir.path())));

    store.add_to_cart(&ProductId::from("1"), 2)?;
    store.add_to_cart(&ProductId::from("5"), 1)?;

    let before = store.cart().lines().to_vec();

    let mut restarted =
        storefront()?.with_cart_mirror(CartMirror::new(FileBlobStore::new(dir.path())));

    assert!(restarted.restore_cart()?);
    assert_eq!(restarted.cart().lines(), before.as_slice());

    Ok(())
}

#[test]
fn produce_catalog_matches_the_shop() -> TestResult {
    let catalog = Fixture::new().load_catalog("produce")?;

    let featured: Vec<&str> = catalog.featured().map(|product| product.name.as_str()).collect();

    assert_eq!(
        featured,
        ["Fresh Apples", "Organic Bananas", "Fresh Carrots", "Red Potatoes"]
    );

    let organic = catalog.query(
        &Filter::default()
            .with_search("organic")
            .sorted_by(SortBy::PriceAsc),
    );

    assert_eq!(
        names(&organic),
        ["Organic Bananas", "Organic Strawberries", "Organic Avocados"]
    );
    assert_eq!(catalog.category_names_in_use(), ["Fruits", "Vegetables"]);

    Ok(())
}

#[test]
fn receipts_render_the_order() -> TestResult {
    let mut store = storefront()?;

    store.add_to_cart(&ProductId::from("5"), 3)?;

    let id = store.submit_order(customer())?;
    let order = store.track_order(id.as_str()).ok_or("order not tracked")?;

    let mut out = Vec::new();
    write_receipt(&mut out, order)?;

    let output = String::from_utf8(out)?;

    assert!(output.contains("Melon"));
    assert!(output.contains("Total: $30.00"));

    Ok(())
}
