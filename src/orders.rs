//! Orders
//!
//! Orders are created from the cart at checkout, kept newest first, and never deleted. Their
//! status is the only thing that changes after submission.

use jiff::Timestamp;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::CartLine,
    pricing::{Price, PricingError, calculate_total, total_price},
};

pub mod ids;
pub mod query;
pub mod registry;
pub mod status;

pub use ids::{OrderId, OrderIdGenerator, OrderIdStrategy, SequentialOrderIds, UuidOrderIds};
pub use query::{OrderQuery, OrderSort, OrderSummary, query_orders};
pub use registry::OrderRegistry;
pub use status::OrderStatus;

/// Errors related to order submission or status changes.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    /// No order has the given id.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// Checkout needs at least one line in the cart.
    #[error("cannot submit an order from an empty cart")]
    EmptyCart,

    /// Status changes only move forward.
    #[error("order {id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Order being updated
        id: OrderId,
        /// Current status
        from: OrderStatus,
        /// Requested status
        to: OrderStatus,
    },

    /// The order is delivered and has no next status.
    #[error("order {0} is already delivered")]
    AlreadyDelivered(OrderId),

    /// The id generator returned an id that is already in use.
    #[error("order id {0} is already in use")]
    DuplicateId(OrderId),

    /// Status label not recognised.
    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Who the order is for and where it goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerInfo {
    /// Customer name
    pub name: String,

    /// Email address or phone number
    pub contact: String,

    /// Delivery address
    pub address: String,

    /// Delivery notes
    pub notes: Option<String>,
}

impl CustomerInfo {
    /// Create customer details without notes.
    pub fn new(
        name: impl Into<String>,
        contact: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            address: address.into(),
            notes: None,
        }
    }

    /// Attach delivery notes. Blank notes are dropped.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();

        self.notes = (!notes.trim().is_empty()).then_some(notes);
        self
    }
}

/// A submitted order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    sequence: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
    delivered_at: Option<Timestamp>,
    customer: CustomerInfo,
    status: OrderStatus,
    lines: Vec<CartLine>,
    currency: &'static Currency,
}

impl Order {
    pub(crate) fn new(
        id: OrderId,
        sequence: u64,
        customer: CustomerInfo,
        lines: Vec<CartLine>,
        currency: &'static Currency,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            sequence,
            created_at: now,
            updated_at: now,
            delivered_at: None,
            customer,
            status: OrderStatus::Pending,
            lines,
            currency,
        }
    }

    /// Returns the order id.
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// Submission order within the registry, starting at zero.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// When the order was submitted.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// When the status last changed, or the submission time if it never has.
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// When the order reached [`OrderStatus::Delivered`].
    pub fn delivered_at(&self) -> Option<Timestamp> {
        self.delivered_at
    }

    /// Customer details given at checkout.
    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    /// Current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Cart lines as they were at checkout.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Currency the order was placed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Total number of items on the order.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Order total.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the total overflows.
    pub fn total(&self) -> Result<Price, PricingError> {
        total_price(&self.lines, self.currency)
    }

    /// Order total as a bare amount string, e.g. `"30.00"`.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the total overflows.
    pub fn formatted_total(&self) -> Result<String, PricingError> {
        calculate_total(&self.lines, self.currency)
    }

    /// Move the order to `status`, stamping the change time.
    ///
    /// Returns whether anything changed.
    pub(crate) fn transition(
        &mut self,
        status: OrderStatus,
        now: Timestamp,
    ) -> Result<bool, OrderError> {
        if status == self.status {
            return Ok(false);
        }

        if !self.status.can_transition_to(status) {
            return Err(OrderError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to: status,
            });
        }

        self.status = status;
        self.updated_at = now;

        if status == OrderStatus::Delivered {
            self.delivered_at = Some(now);
        }

        Ok(true)
    }
}
