//! Catalog Queries

use std::cmp::Reverse;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{
    catalog::filter::{Filter, SortBy},
    pricing::amount,
    products::Product,
};

/// Returns the products matching `filter`, in the filter's sort order.
///
/// All supplied criteria must match. A blank category or search query matches everything. Price
/// bounds are inclusive. Sorting is stable, so products that compare equal keep their catalog
/// order. The input is left untouched.
pub fn query_catalog(products: &[Product], filter: &Filter) -> Vec<Product> {
    let category = lowercase_term(filter.category.as_deref());
    let search = lowercase_term(filter.search_query.as_deref());

    let mut matches: Vec<Product> = products
        .iter()
        .filter(|product| {
            category
                .as_deref()
                .is_none_or(|category| product.category.to_lowercase() == category)
        })
        .filter(|product| {
            search
                .as_deref()
                .is_none_or(|search| product.name.to_lowercase().contains(search))
        })
        .filter(|product| {
            filter
                .min_price
                .is_none_or(|min| amount(&product.price) >= min)
        })
        .filter(|product| {
            filter
                .max_price
                .is_none_or(|max| amount(&product.price) <= max)
        })
        .cloned()
        .collect();

    match filter.sort_by {
        SortBy::Name => matches.sort_by_cached_key(|product| collation_key(&product.name)),
        SortBy::NameDesc => {
            matches.sort_by_cached_key(|product| Reverse(collation_key(&product.name)));
        }
        SortBy::PriceAsc => matches.sort_by_key(|product| product.price.to_minor_units()),
        SortBy::PriceDesc => matches.sort_by_key(|product| Reverse(product.price.to_minor_units())),
    }

    matches
}

fn lowercase_term(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
}

/// Dictionary order: accents and case are ignored, exact text breaks ties.
fn collation_key(name: &str) -> (String, String) {
    let folded = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();

    (folded, name.to_string())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::{
        Money,
        iso::{JPY, USD},
    };

    use super::*;

    fn product(id: &str, name: &str, minor_units: i64, category: &str) -> Product {
        Product::new(id, name, Money::from_minor(minor_units, USD), category)
    }

    fn apple_and_carrot() -> Vec<Product> {
        vec![
            product("1", "Apple", 2_00, "Fruits"),
            product("2", "Carrot", 1_00, "Vegetables"),
        ]
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|product| product.id.as_str()).collect()
    }

    #[test]
    fn empty_filter_returns_everything_sorted_by_name() {
        let products = vec![
            product("1", "banana", 1_00, "Fruits"),
            product("2", "Cherry", 1_00, "Fruits"),
            product("3", "apple", 1_00, "Fruits"),
        ];

        let result = query_catalog(&products, &Filter::default());

        assert_eq!(ids(&result), ["3", "1", "2"]);
    }

    #[test]
    fn category_matches_case_insensitively() {
        let products = apple_and_carrot();

        let result = query_catalog(&products, &Filter::for_category("fruits"));

        assert_eq!(ids(&result), ["1"]);
    }

    #[test]
    fn blank_criteria_match_everything() {
        let products = apple_and_carrot();
        let filter = Filter {
            category: Some(String::new()),
            search_query: Some("  ".to_string()),
            ..Filter::default()
        };

        assert_eq!(ids(&query_catalog(&products, &filter)), ["1", "2"]);
    }

    #[test]
    fn search_matches_name_substrings() {
        let products = vec![
            product("1", "Fresh Apples", 24_99, "Fruits"),
            product("2", "Organic Bananas", 19_99, "Fruits"),
            product("3", "Fresh Carrots", 15_99, "Vegetables"),
        ];

        let result = query_catalog(&products, &Filter::default().with_search("FRESH"));

        assert_eq!(ids(&result), ["1", "3"]);
    }

    #[test]
    fn min_price_excludes_cheaper_products() {
        let products = apple_and_carrot();
        let filter = Filter::default().with_price_range(Some(Decimal::new(15, 1)), None);

        assert_eq!(ids(&query_catalog(&products, &filter)), ["1"]);
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let products = apple_and_carrot();
        let filter =
            Filter::default().with_price_range(Some(Decimal::new(1, 0)), Some(Decimal::new(2, 0)));

        assert_eq!(ids(&query_catalog(&products, &filter)), ["1", "2"]);
    }

    #[test]
    fn price_bounds_use_the_currency_minor_digits() {
        let products = vec![
            Product::new("1", "Rice", Money::from_minor(500, JPY), "Grains"),
            Product::new("2", "Mochi", Money::from_minor(80, JPY), "Grains"),
        ];
        let filter = Filter::default().with_price_range(Some(Decimal::new(100, 0)), None);

        assert_eq!(ids(&query_catalog(&products, &filter)), ["1"]);
    }

    #[test]
    fn max_price_excludes_dearer_products() {
        let products = apple_and_carrot();
        let filter = Filter::default().with_price_range(None, Some(Decimal::new(199, 2)));

        assert_eq!(ids(&query_catalog(&products, &filter)), ["2"]);
    }

    #[test]
    fn criteria_are_combined() {
        let products = vec![
            product("1", "Fresh Apples", 24_99, "Fruits"),
            product("2", "Organic Bananas", 19_99, "Fruits"),
            product("3", "Fresh Carrots", 15_99, "Vegetables"),
            product("4", "Organic Avocados", 35_99, "Fruits"),
        ];

        let filter = Filter::for_category("Fruits")
            .with_search("organic")
            .with_price_range(None, Some(Decimal::new(30, 0)));

        assert_eq!(ids(&query_catalog(&products, &filter)), ["2"]);
    }

    #[test]
    fn sorts_by_price_ascending() {
        let products = apple_and_carrot();
        let filter = Filter::default().sorted_by(SortBy::PriceAsc);

        assert_eq!(ids(&query_catalog(&products, &filter)), ["2", "1"]);
    }

    #[test]
    fn sorts_by_price_descending() {
        let products = vec![
            product("1", "A", 1_00, "Fruits"),
            product("2", "B", 3_00, "Fruits"),
            product("3", "C", 2_00, "Fruits"),
        ];
        let filter = Filter::default().sorted_by(SortBy::PriceDesc);

        assert_eq!(ids(&query_catalog(&products, &filter)), ["2", "3", "1"]);
    }

    #[test]
    fn sorts_by_name_descending() {
        let products = apple_and_carrot();
        let filter = Filter::default().sorted_by(SortBy::NameDesc);

        assert_eq!(ids(&query_catalog(&products, &filter)), ["2", "1"]);
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let products = vec![
            product("1", "Zucchini", 1_00, "Vegetables"),
            product("2", "Éclair", 1_00, "Bakery"),
            product("3", "elderberry", 1_00, "Fruits"),
        ];

        assert_eq!(ids(&query_catalog(&products, &Filter::default())), ["2", "3", "1"]);
    }

    #[test]
    fn equal_prices_keep_catalog_order() {
        let products = vec![
            product("1", "Zucchini", 1_00, "Vegetables"),
            product("2", "Apple", 1_00, "Fruits"),
        ];
        let filter = Filter::default().sorted_by(SortBy::PriceAsc);

        assert_eq!(ids(&query_catalog(&products, &filter)), ["1", "2"]);
    }

    #[test]
    fn query_leaves_input_untouched() {
        let products = vec![
            product("2", "Carrot", 1_00, "Vegetables"),
            product("1", "Apple", 2_00, "Fruits"),
        ];
        let before = products.clone();

        let _result = query_catalog(&products, &Filter::default());

        assert_eq!(products, before);
    }

    #[test]
    fn no_matches_returns_empty() {
        let products = apple_and_carrot();

        let result = query_catalog(&products, &Filter::for_category("Organic"));

        assert!(result.is_empty());
    }
}
