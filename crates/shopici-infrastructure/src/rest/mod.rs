//! Thin HTTP adapters consuming the hosted backend.
//!
//! Row storage follows PostgREST conventions, identity follows GoTrue
//! conventions, uploads follow the storage API. Nothing here implements
//! server behavior; these are the request/response shapes the hosted
//! service already speaks.

pub mod client;
pub mod data;
pub mod identity;
pub mod object_store;

pub use client::RestClient;
pub use data::{
    RestConversationRepository, RestMessageRepository, RestNotificationRepository,
    RestProductRepository, RestProfileRepository,
};
pub use identity::RestIdentityService;
pub use object_store::RestObjectStore;
