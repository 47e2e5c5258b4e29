//! Application layer for the Shopici storefront.
//!
//! Each use case carries the behavioral content of one screen of the
//! storefront: it reads through the core repository traits, applies the
//! screen's rules, and writes rows back. No rendering or navigation lives
//! here.

pub mod account;
pub mod cart_session;
pub mod catalog;
pub mod messaging;
pub mod seller;

pub use account::{AccountUseCase, ProfileUpdate};
pub use cart_session::CartSession;
pub use catalog::{CatalogQuery, CatalogSort, CatalogUseCase};
pub use messaging::{
    DEFAULT_OPENER, MessageFeed, MessagingUseCase, NotificationFeed, SUGGESTED_OPENERS,
};
pub use seller::{ListingForm, SellerUseCase};
