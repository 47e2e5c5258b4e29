//! Product repository trait.

use async_trait::async_trait;

use super::model::{NewProduct, Product};
use crate::error::Result;

/// An abstract repository over the remote `products` table.
///
/// Implementations are thin: filtering beyond the listed queries (search,
/// price range, sorting) is applied client-side by the catalog use case.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All active listings, newest first.
    async fn list_active(&self) -> Result<Vec<Product>>;

    /// Every listing owned by the given seller, regardless of status.
    async fn list_by_seller(&self, user_id: &str) -> Result<Vec<Product>>;

    /// Looks up one listing by row id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>>;

    /// Inserts a draft and returns the stored row with its assigned id.
    async fn insert(&self, draft: &NewProduct) -> Result<Product>;

    /// Deletes a listing by row id.
    async fn delete(&self, id: &str) -> Result<()>;
}
