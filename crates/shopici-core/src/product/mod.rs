//! Product listings domain.

pub mod model;
pub mod repository;

pub use model::{NewProduct, Product, ProductCategory, ProductStatus};
pub use repository::ProductRepository;
