//! The device-local cart session: aggregate plus persistence mirror.

use std::sync::Arc;

use tracing::{debug, warn};

use shopici_core::cart::{CART_STORAGE_KEY, CartAggregate, CartChanged, CartItem, CartStore};
use shopici_core::checkout::{PlacedOrder, generate_order_id};
use shopici_core::error::{Result, StoreError};

/// Owns the cart aggregate for one running session and mirrors every
/// mutation to the persistence store.
///
/// Durability is best-effort: hydration falls back to an empty cart on any
/// read or parse problem, and a failed mirror write is logged and swallowed
/// while the in-memory aggregate stays authoritative. A user never sees a
/// cart mutation rejected because device storage misbehaved.
///
/// The session is the single mutating owner; screens hold it by reference
/// and go through these methods.
pub struct CartSession {
    cart: CartAggregate,
    store: Arc<dyn CartStore>,
}

impl CartSession {
    /// Hydrates a session from the mirror, silently starting empty when no
    /// usable state exists.
    pub fn new(store: Arc<dyn CartStore>) -> Self {
        let cart = match store.read(CART_STORAGE_KEY) {
            Ok(Some(payload)) => match CartAggregate::from_mirror_payload(&payload) {
                Ok(cart) => cart,
                Err(err) => {
                    warn!("stored cart is unreadable, starting empty: {err}");
                    CartAggregate::new()
                }
            },
            Ok(None) => CartAggregate::new(),
            Err(err) => {
                warn!("cart mirror read failed, starting empty: {err}");
                CartAggregate::new()
            }
        };
        Self { cart, store }
    }

    /// Read access to the aggregate (lines, derived totals).
    pub fn cart(&self) -> &CartAggregate {
        &self.cart
    }

    pub fn add_item(&mut self, item: CartItem, quantity: u32) {
        let changed = self.cart.add_item(item, quantity);
        self.mirror(changed);
    }

    pub fn remove_item(&mut self, product_id: &str) {
        let changed = self.cart.remove_item(product_id);
        self.mirror(changed);
    }

    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        let changed = self.cart.update_quantity(product_id, quantity);
        self.mirror(changed);
    }

    pub fn clear(&mut self) {
        let changed = self.cart.clear();
        self.mirror(changed);
    }

    /// Simulated checkout: generates a local order id, records the totals,
    /// empties the cart. No network is involved and no order row is written
    /// anywhere; the id is cosmetic.
    pub fn place_order(&mut self) -> Result<PlacedOrder> {
        if self.cart.is_empty() {
            return Err(StoreError::validation("the cart is empty"));
        }

        let order = PlacedOrder {
            order_id: generate_order_id(),
            line_count: self.cart.len(),
            total_item_count: self.cart.total_item_count(),
            total_price: self.cart.total_price(),
        };
        debug!(order_id = %order.order_id, "simulated order placed");

        let changed = self.cart.clear();
        self.mirror(changed);
        Ok(order)
    }

    /// Writes the full current state to the mirror, best-effort.
    ///
    /// Consuming [`CartChanged`] here keeps the mutate-then-mirror pairing
    /// checkable: a mutator that skips this step trips the `must_use` lint
    /// at its call site.
    fn mirror(&self, _changed: CartChanged) {
        let result = self
            .cart
            .to_mirror_payload()
            .and_then(|payload| self.store.write(CART_STORAGE_KEY, &payload));
        if let Err(err) = result {
            warn!("cart mirror write failed, in-memory cart stays authoritative: {err}");
        }
    }
}

impl std::fmt::Debug for CartSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartSession")
            .field("lines", &self.cart.len())
            .finish()
    }
}
