//! Storefront
//!
//! The shop's state in one place: the catalog, the active filter, the cart, submitted orders and
//! an optional cart mirror. Every change goes through a `&mut self` method, or through
//! [`Storefront::dispatch`] for callers that prefer to pass actions around.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cart::{Cart, CartError, CartLine},
    catalog::{Catalog, CatalogError, Filter},
    mirror::{CartMirror, MirrorError},
    orders::{
        CustomerInfo, Order, OrderError, OrderId, OrderIdGenerator, OrderQuery, OrderRegistry,
        OrderStatus, OrderSummary,
    },
    pricing::PricingError,
    products::{Product, ProductId},
};

/// Broad classes of failure callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The product or order doesn't exist.
    NotFound,

    /// The request can't be carried out as given.
    InvalidInput,
}

/// Errors returned by storefront operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Wrapped catalog error.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Wrapped cart error.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapped order error.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Wrapped mirror error.
    #[error(transparent)]
    Mirror(#[from] MirrorError),
}

impl StoreError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Catalog(CatalogError::ProductNotFound(_))
            | Self::Order(OrderError::NotFound(_)) => ErrorKind::NotFound,
            _ => ErrorKind::InvalidInput,
        }
    }
}

/// A state change, as a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the active filter.
    SetFilter(Filter),

    /// Show a single category, or every category for `"all"`.
    NavigateToCategory(String),

    /// Clear the active filter.
    ResetFilter,

    /// Add a catalog product to the cart.
    AddToCart {
        /// Product to add
        product_id: ProductId,
        /// Number to add
        quantity: u32,
    },

    /// Remove a product's line from the cart.
    RemoveFromCart(ProductId),

    /// Set the quantity of a cart line. Zero or less removes it.
    UpdateCartItemQuantity {
        /// Product on the line
        product_id: ProductId,
        /// New quantity
        quantity: i64,
    },

    /// Empty the cart.
    ClearCart,

    /// Turn the cart into an order.
    SubmitOrder(CustomerInfo),

    /// Set an order's status.
    UpdateOrderStatus {
        /// Order to update
        order_id: OrderId,
        /// New status
        status: OrderStatus,
    },

    /// Move an order to its next status.
    AdvanceOrder(OrderId),
}

/// What a dispatched [`Action`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed, with nothing further to report.
    Updated,

    /// Quantity of the cart line after adding to it.
    Quantity(u32),

    /// Whether a cart line was removed.
    Removed(bool),

    /// Id of the newly submitted order.
    OrderSubmitted(OrderId),

    /// Status of an order after the change.
    OrderStatus(OrderId, OrderStatus),
}

/// Storefront state.
#[derive(Debug)]
pub struct Storefront {
    catalog: Catalog,
    filter: Filter,
    cart: Cart,
    orders: OrderRegistry,
    mirror: Option<CartMirror>,
}

impl Storefront {
    /// Create a storefront over a catalog, with an empty cart and no orders.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            cart: Cart::new(catalog.currency()),
            catalog,
            filter: Filter::default(),
            orders: OrderRegistry::new(),
            mirror: None,
        }
    }

    /// Use the given order id generator. Replaces any orders already submitted.
    #[must_use]
    pub fn with_order_ids(mut self, ids: impl OrderIdGenerator + 'static) -> Self {
        self.orders = OrderRegistry::with_id_generator(ids);
        self
    }

    /// Use an already boxed order id generator. Replaces any orders already submitted.
    #[must_use]
    pub fn with_boxed_order_ids(mut self, ids: Box<dyn OrderIdGenerator>) -> Self {
        self.orders = OrderRegistry::with_boxed_id_generator(ids);
        self
    }

    /// Mirror the cart after every change.
    #[must_use]
    pub fn with_cart_mirror(mut self, mirror: CartMirror) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Returns the catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the active filter.
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Returns the cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Returns the order registry.
    pub fn orders(&self) -> &OrderRegistry {
        &self.orders
    }

    /// Products matching the active filter.
    pub fn query(&self) -> Vec<Product> {
        self.catalog.query(&self.filter)
    }

    /// Replace the active filter.
    pub fn set_filter(&mut self, filter: Filter) {
        debug!(?filter, "filter changed");

        self.filter = filter;
    }

    /// Show a single category, keeping the rest of the filter. `"all"` shows every category.
    pub fn navigate_to_category(&mut self, category: &str) {
        let filter = self.filter.clone().with_category(category);

        self.set_filter(filter);
    }

    /// Clear the active filter.
    pub fn reset_filter(&mut self) {
        self.set_filter(Filter::default());
    }

    /// Add a catalog product to the cart, returning the line quantity afterwards.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::ProductNotFound`]: the product isn't in the catalog.
    /// - [`CartError`]: the quantity is zero or too large.
    #[tracing::instrument(name = "storefront.add_to_cart", skip(self), err)]
    pub fn add_to_cart(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<u32, StoreError> {
        let product = self.catalog.require(product_id)?;
        let quantity = self.cart.add(product, quantity)?;

        self.mirror_cart();

        Ok(quantity)
    }

    /// Remove a product's line from the cart. Returns the removed line, if there was one.
    #[tracing::instrument(name = "storefront.remove_from_cart", skip(self))]
    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> Option<CartLine> {
        let removed = self.cart.remove(product_id);

        if removed.is_some() {
            self.mirror_cart();
        }

        removed
    }

    /// Set the quantity of a cart line. Zero or less removes it, and unknown products are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOutOfRange`] if the quantity is too large.
    #[tracing::instrument(name = "storefront.update_cart_item_quantity", skip(self), err)]
    pub fn update_cart_item_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<(), StoreError> {
        self.cart.update_quantity(product_id, quantity)?;

        self.mirror_cart();

        Ok(())
    }

    /// Empty the cart.
    #[tracing::instrument(name = "storefront.clear_cart", skip(self))]
    pub fn clear_cart(&mut self) {
        self.cart.clear();

        self.mirror_cart();
    }

    /// Cart total as a bare amount string, e.g. `"30.00"`.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the total overflows.
    pub fn cart_total(&self) -> Result<String, StoreError> {
        Ok(self.cart.formatted_total()?)
    }

    /// Turn the cart into a pending order and empty the cart.
    ///
    /// # Errors
    ///
    /// - [`OrderError::EmptyCart`]: the cart is empty.
    /// - [`OrderError::DuplicateId`]: the id generator repeated an id.
    #[tracing::instrument(
        name = "storefront.submit_order",
        skip(self, customer),
        fields(lines = self.cart.len()),
        err
    )]
    pub fn submit_order(&mut self, customer: CustomerInfo) -> Result<OrderId, StoreError> {
        let id = self.orders.submit(&mut self.cart, customer)?;

        self.mirror_cart();

        Ok(id)
    }

    /// Look up an order. Unknown and empty ids return `None`.
    pub fn track_order(&self, order_id: &str) -> Option<&Order> {
        self.orders.track(order_id)
    }

    /// Set an order's status. Orders only move forward.
    ///
    /// # Errors
    ///
    /// - [`OrderError::NotFound`]: no order has the id.
    /// - [`OrderError::InvalidTransition`]: the status is behind the current one.
    #[tracing::instrument(name = "storefront.update_order_status", skip(self))]
    pub fn update_order_status(
        &mut self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<&Order, StoreError> {
        self.orders
            .update_status(order_id, status)
            .inspect_err(|error| warn!(%error, "order status not updated"))
            .map_err(StoreError::from)
    }

    /// Move an order to its next status.
    ///
    /// # Errors
    ///
    /// - [`OrderError::NotFound`]: no order has the id.
    /// - [`OrderError::AlreadyDelivered`]: the order is delivered.
    #[tracing::instrument(name = "storefront.advance_order", skip(self))]
    pub fn advance_order(&mut self, order_id: &str) -> Result<&Order, StoreError> {
        self.orders
            .advance(order_id)
            .inspect_err(|error| warn!(%error, "order not advanced"))
            .map_err(StoreError::from)
    }

    /// Orders for the admin listing.
    pub fn list_orders(&self, query: &OrderQuery) -> Vec<&Order> {
        self.orders.list(query)
    }

    /// Dashboard figures for every order.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if revenue overflows.
    pub fn order_summary(&self) -> Result<OrderSummary, StoreError> {
        Ok(self.orders.summary(self.catalog.currency())?)
    }

    /// Replace the cart with the mirrored copy, if there is one.
    ///
    /// Returns whether a cart was restored. Products no longer in the catalog are dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`MirrorError`] if the mirror can't be read, or holds a cart in another
    /// currency.
    #[tracing::instrument(name = "storefront.restore_cart", skip(self), err)]
    pub fn restore_cart(&mut self) -> Result<bool, StoreError> {
        let Some(mirror) = &self.mirror else {
            return Ok(false);
        };

        let Some(snapshot) = mirror.load()? else {
            return Ok(false);
        };

        self.cart = snapshot.to_cart(&self.catalog)?;

        info!(lines = self.cart.len(), "cart restored");

        Ok(true)
    }

    /// Apply an action.
    ///
    /// # Errors
    ///
    /// Returns whatever error the matching method returns.
    pub fn dispatch(&mut self, action: Action) -> Result<Outcome, StoreError> {
        let outcome = match action {
            Action::SetFilter(filter) => {
                self.set_filter(filter);
                Outcome::Updated
            }
            Action::NavigateToCategory(category) => {
                self.navigate_to_category(&category);
                Outcome::Updated
            }
            Action::ResetFilter => {
                self.reset_filter();
                Outcome::Updated
            }
            Action::AddToCart {
                product_id,
                quantity,
            } => Outcome::Quantity(self.add_to_cart(&product_id, quantity)?),
            Action::RemoveFromCart(product_id) => {
                Outcome::Removed(self.remove_from_cart(&product_id).is_some())
            }
            Action::UpdateCartItemQuantity {
                product_id,
                quantity,
            } => {
                self.update_cart_item_quantity(&product_id, quantity)?;
                Outcome::Updated
            }
            Action::ClearCart => {
                self.clear_cart();
                Outcome::Updated
            }
            Action::SubmitOrder(customer) => Outcome::OrderSubmitted(self.submit_order(customer)?),
            Action::UpdateOrderStatus { order_id, status } => {
                let order = self.update_order_status(order_id.as_str(), status)?;
                Outcome::OrderStatus(order.id().clone(), order.status())
            }
            Action::AdvanceOrder(order_id) => {
                let order = self.advance_order(order_id.as_str())?;
                Outcome::OrderStatus(order.id().clone(), order.status())
            }
        };

        Ok(outcome)
    }

    fn mirror_cart(&mut self) {
        if let Some(mirror) = &mut self.mirror {
            mirror.sync(&self.cart);
        }
    }
}
