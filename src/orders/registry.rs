//! Order Registry

use jiff::Timestamp;
use rusty_money::iso::Currency;
use tracing::{debug, info};

use crate::{
    cart::Cart,
    orders::{
        CustomerInfo, Order, OrderError, OrderId, OrderIdGenerator, OrderQuery, OrderStatus,
        OrderSummary, SequentialOrderIds, query_orders,
    },
    pricing::PricingError,
};

/// Every order submitted during this session, newest first.
#[derive(Debug)]
pub struct OrderRegistry {
    orders: Vec<Order>,
    ids: Box<dyn OrderIdGenerator>,
    submitted: u64,
}

impl OrderRegistry {
    /// Create an empty registry using sequential ids.
    pub fn new() -> Self {
        Self::with_id_generator(SequentialOrderIds::new())
    }

    /// Create an empty registry using the given id generator.
    pub fn with_id_generator(ids: impl OrderIdGenerator + 'static) -> Self {
        Self::with_boxed_id_generator(Box::new(ids))
    }

    /// Create an empty registry using an already boxed id generator.
    pub fn with_boxed_id_generator(ids: Box<dyn OrderIdGenerator>) -> Self {
        Self {
            orders: Vec::new(),
            ids,
            submitted: 0,
        }
    }

    /// Turn the cart into a pending order and empty the cart.
    ///
    /// The order keeps a copy of the cart lines, so later cart changes don't affect it.
    ///
    /// # Errors
    ///
    /// - [`OrderError::EmptyCart`]: the cart has no lines.
    /// - [`OrderError::DuplicateId`]: the id generator repeated an id.
    /// - [`OrderError::Pricing`]: the cart total overflows.
    ///
    /// The cart is left untouched on error.
    pub fn submit(
        &mut self,
        cart: &mut Cart,
        customer: CustomerInfo,
    ) -> Result<OrderId, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let total = cart.formatted_total()?;
        let id = self.ids.next_id();

        if self.track(id.as_str()).is_some() {
            return Err(OrderError::DuplicateId(id));
        }

        let order = Order::new(
            id.clone(),
            self.submitted,
            customer,
            cart.lines().to_vec(),
            cart.currency(),
            Timestamp::now(),
        );

        self.submitted = self.submitted.saturating_add(1);
        self.orders.insert(0, order);

        cart.clear();

        info!(order_id = %id, %total, "order submitted");

        Ok(id)
    }

    /// Look up an order by id. Unknown and empty ids return `None`.
    pub fn track(&self, id: &str) -> Option<&Order> {
        if id.is_empty() {
            return None;
        }

        self.orders.iter().find(|order| order.id().as_str() == id)
    }

    /// Move an order to a new status.
    ///
    /// Setting the status an order already has changes nothing.
    ///
    /// # Errors
    ///
    /// - [`OrderError::NotFound`]: no order has the id.
    /// - [`OrderError::InvalidTransition`]: the new status is behind the current one.
    pub fn update_status(&mut self, id: &str, status: OrderStatus) -> Result<&Order, OrderError> {
        let order = self.find_mut(id)?;
        let from = order.status();

        if order.transition(status, Timestamp::now())? {
            info!(order_id = %order.id(), %from, to = %status, "order status updated");
        } else {
            debug!(order_id = %order.id(), %status, "order status unchanged");
        }

        Ok(order)
    }

    /// Move an order to the status after its current one.
    ///
    /// # Errors
    ///
    /// - [`OrderError::NotFound`]: no order has the id.
    /// - [`OrderError::AlreadyDelivered`]: the order has no next status.
    pub fn advance(&mut self, id: &str) -> Result<&Order, OrderError> {
        let order = self.find_mut(id)?;
        let from = order.status();

        let Some(to) = from.next() else {
            return Err(OrderError::AlreadyDelivered(order.id().clone()));
        };

        order.transition(to, Timestamp::now())?;

        info!(order_id = %order.id(), %from, %to, "order advanced");

        Ok(order)
    }

    /// Orders matching the admin listing query.
    pub fn list(&self, query: &OrderQuery) -> Vec<&Order> {
        query_orders(&self.orders, query)
    }

    /// Dashboard figures for every order in the registry.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if an order is in another currency or revenue overflows.
    pub fn summary(&self, currency: &'static Currency) -> Result<OrderSummary, PricingError> {
        OrderSummary::from_orders(&self.orders, currency)
    }

    /// All orders, newest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Get the number of orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if no orders have been submitted.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Order, OrderError> {
        self.orders
            .iter_mut()
            .find(|order| order.id().as_str() == id)
            .ok_or_else(|| OrderError::NotFound(OrderId::from(id)))
    }
}

impl Default for OrderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
