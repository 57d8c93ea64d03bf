//! Order Listing
//!
//! Search, filter and sort for the admin order view, plus the dashboard summary.

use std::{convert::Infallible, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    orders::{Order, OrderStatus},
    pricing::{Price, PricingError, amount, price_from_amount, total_price},
};

/// Sort orders for the admin order listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderSort {
    /// Newest first
    #[default]
    DateDesc,

    /// Oldest first
    DateAsc,

    /// Smallest total first
    TotalAsc,

    /// Largest total first
    TotalDesc,
}

impl OrderSort {
    /// Returns the sort key as used by the admin view.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::TotalAsc => "total-asc",
            Self::TotalDesc => "total-desc",
        }
    }

    /// Parse a sort key. Unrecognised keys sort newest first.
    pub fn parse(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "date-asc" => Self::DateAsc,
            "total-asc" => Self::TotalAsc,
            "total-desc" => Self::TotalDesc,
            _ => Self::DateDesc,
        }
    }
}

impl FromStr for OrderSort {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Admin order listing query. The default query lists every order, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    /// Matched case-insensitively against the customer name and the order id
    pub search: Option<String>,

    /// Only list orders with this status
    pub status: Option<OrderStatus>,

    /// Result order
    pub sort: OrderSort,
}

impl OrderQuery {
    /// Replace the search term. An empty term matches everything.
    #[must_use]
    pub fn with_search(mut self, search: &str) -> Self {
        let search = search.trim();

        self.search = (!search.is_empty()).then(|| search.to_string());
        self
    }

    /// Only list orders with the given status.
    #[must_use]
    pub fn with_status(mut self, status: Option<OrderStatus>) -> Self {
        self.status = status;
        self
    }

    /// Replace the sort order.
    #[must_use]
    pub fn sorted_by(mut self, sort: OrderSort) -> Self {
        self.sort = sort;
        self
    }
}

/// Returns the orders matching `query`, in the query's sort order.
pub fn query_orders<'a>(orders: &'a [Order], query: &OrderQuery) -> Vec<&'a Order> {
    let search = query.search.as_deref().map(str::to_lowercase);

    let mut matches: Vec<&Order> = orders
        .iter()
        .filter(|order| query.status.is_none_or(|status| order.status() == status))
        .filter(|order| {
            search.as_deref().is_none_or(|search| {
                order.customer().name.to_lowercase().contains(search)
                    || order.id().as_str().to_lowercase().contains(search)
            })
        })
        .collect();

    match query.sort {
        OrderSort::DateDesc => {
            matches.sort_by_key(|order| std::cmp::Reverse((order.created_at(), order.sequence())));
        }
        OrderSort::DateAsc => matches.sort_by_key(|order| (order.created_at(), order.sequence())),
        OrderSort::TotalAsc => matches.sort_by_cached_key(|order| total_minor_units(order)),
        OrderSort::TotalDesc => {
            matches.sort_by_cached_key(|order| std::cmp::Reverse(total_minor_units(order)));
        }
    }

    matches
}

/// Orders whose total overflows sort as if they were free.
fn total_minor_units(order: &Order) -> i64 {
    order.total().map_or(0, |total| total.to_minor_units())
}

/// Headline figures for the admin dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    /// Number of orders
    pub total_orders: usize,

    /// Sum of all order totals
    pub revenue: Price,

    /// Revenue divided by the number of orders, rounded to the nearest minor unit
    pub average_order_value: Price,

    /// Order count for every status, in fulfilment order
    pub by_status: SmallVec<[(OrderStatus, usize); 3]>,
}

impl OrderSummary {
    /// Summarise a list of orders.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if an order is in another currency, or revenue overflows.
    pub fn from_orders(
        orders: &[Order],
        currency: &'static Currency,
    ) -> Result<Self, PricingError> {
        let revenue = total_price(orders.iter().flat_map(Order::lines), currency)?;

        let average_order_value = if orders.is_empty() {
            Money::from_minor(0, currency)
        } else {
            let mean = (amount(&revenue) / Decimal::from(orders.len()))
                .round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero);

            price_from_amount(mean, currency).unwrap_or(revenue)
        };

        let by_status = OrderStatus::ALL
            .into_iter()
            .map(|status| {
                let count = orders.iter().filter(|order| order.status() == status).count();

                (status, count)
            })
            .collect();

        Ok(Self {
            total_orders: orders.len(),
            revenue,
            average_order_value,
            by_status,
        })
    }

    /// Number of orders with the given status.
    pub fn count(&self, status: OrderStatus) -> usize {
        self.by_status
            .iter()
            .find(|(candidate, _)| *candidate == status)
            .map_or(0, |(_, count)| *count)
    }
}
