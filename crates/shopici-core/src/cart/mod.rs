//! Shopping cart domain.
//!
//! The cart is a device-local aggregate: an ordered list of line items,
//! uniquely keyed by product id, with derived totals computed on demand.
//! It has no server-side counterpart; durability comes from a best-effort
//! persistence mirror keyed by [`CART_STORAGE_KEY`].

pub mod aggregate;
pub mod model;
pub mod store;

pub use aggregate::{CartAggregate, CartChanged};
pub use model::{CartItem, CartLine};
pub use store::{CART_STORAGE_KEY, CartStore};
