//! Catalog Filters

use std::{convert::Infallible, str::FromStr};

use rust_decimal::Decimal;

/// Sort orders for catalog listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Name, A to Z
    #[default]
    Name,

    /// Name, Z to A
    NameDesc,

    /// Cheapest first
    PriceAsc,

    /// Most expensive first
    PriceDesc,
}

impl SortBy {
    /// Returns the sort key as used in listing URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::NameDesc => "name-desc",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }

    /// Parse a sort key. Unrecognised keys sort by name.
    pub fn parse(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "name-desc" => Self::NameDesc,
            "price-asc" | "price-low" => Self::PriceAsc,
            "price-desc" | "price-high" => Self::PriceDesc,
            _ => Self::Name,
        }
    }
}

impl FromStr for SortBy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// A catalog query: which products to show, and in what order.
///
/// Every `None` field matches all products. The default filter is also the reset filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    /// Category name, matched case-insensitively
    pub category: Option<String>,

    /// Substring of the product name, matched case-insensitively
    pub search_query: Option<String>,

    /// Lowest price to include
    pub min_price: Option<Decimal>,

    /// Highest price to include
    pub max_price: Option<Decimal>,

    /// Result order
    pub sort_by: SortBy,
}

impl Filter {
    /// Filter for a single category. `"all"` or an empty name clears the category.
    pub fn for_category(name: &str) -> Self {
        Self::default().with_category(name)
    }

    /// Build a filter from raw form values.
    ///
    /// Empty strings are treated as absent, and price bounds that fail to parse apply no bound.
    pub fn from_raw(
        category: &str,
        search_query: &str,
        min_price: &str,
        max_price: &str,
        sort_by: &str,
    ) -> Self {
        Self {
            category: non_empty(category),
            search_query: non_empty(search_query),
            min_price: parse_price_bound(min_price),
            max_price: parse_price_bound(max_price),
            sort_by: SortBy::parse(sort_by),
        }
    }

    /// Replace the category, keeping the other fields. `"all"` or an empty name clears it.
    #[must_use]
    pub fn with_category(mut self, name: &str) -> Self {
        self.category = non_empty(name).filter(|name| !name.eq_ignore_ascii_case("all"));
        self
    }

    /// Replace the search query, keeping the other fields.
    #[must_use]
    pub fn with_search(mut self, query: &str) -> Self {
        self.search_query = non_empty(query);
        self
    }

    /// Replace the price bounds, keeping the other fields.
    #[must_use]
    pub fn with_price_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Replace the sort order, keeping the other fields.
    #[must_use]
    pub fn sorted_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }
}

/// Parse a price bound typed by a shopper.
///
/// Returns `None` for empty or malformed input, which means no bound is applied.
pub fn parse_price_bound(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return None;
    }

    trimmed.parse::<Decimal>().ok()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
