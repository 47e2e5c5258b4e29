//! User notification domain.

pub mod model;
pub mod repository;

pub use model::{NewNotification, Notification};
pub use repository::NotificationRepository;
