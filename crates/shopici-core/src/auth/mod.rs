//! Identity and session domain.
//!
//! The identity service itself (token issuance, password storage) is a
//! hosted external collaborator; this module only defines the narrow
//! contract the storefront consumes.

pub mod model;
pub mod service;

pub use model::{AuthChange, AuthSession, AuthUser};
pub use service::{AuthWatcher, IdentityService};
