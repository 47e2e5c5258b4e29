//! Seller-side product management.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use shopici_core::auth::IdentityService;
use shopici_core::error::{Result, StoreError};
use shopici_core::media::{ITEM_IMAGE_BUCKET, ImageUpload, ObjectStore};
use shopici_core::product::{NewProduct, Product, ProductCategory, ProductRepository, ProductStatus};

/// Input of the listing creation form.
#[derive(Debug, Clone)]
pub struct ListingForm {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: ProductCategory,
    /// Required for a new listing; validated and uploaded before the row is
    /// inserted.
    pub image: Option<ImageUpload>,
}

/// Use case behind the "my products" screen: session-gated listing
/// management for the signed-in seller.
pub struct SellerUseCase {
    identity: Arc<dyn IdentityService>,
    products: Arc<dyn ProductRepository>,
    media: Arc<dyn ObjectStore>,
}

impl SellerUseCase {
    pub fn new(
        identity: Arc<dyn IdentityService>,
        products: Arc<dyn ProductRepository>,
        media: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            identity,
            products,
            media,
        }
    }

    /// Every listing owned by the signed-in seller.
    pub async fn my_products(&self) -> Result<Vec<Product>> {
        let user_id = self.require_user().await?;
        self.products.list_by_seller(&user_id).await
    }

    /// Validates the form, uploads the image, inserts the listing.
    ///
    /// The image is checked (type, size) before any bytes leave the device;
    /// the stored row carries the upload's public URL.
    pub async fn create_listing(&self, form: ListingForm) -> Result<Product> {
        let user_id = self.require_user().await?;

        let mut draft = NewProduct {
            user_id: user_id.clone(),
            title: form.title,
            description: form.description,
            price: form.price,
            category: form.category,
            image_urls: None,
            status: ProductStatus::Active,
            created_at: Utc::now(),
        };
        draft.validate()?;

        let Some(image) = form.image else {
            return Err(StoreError::validation("a listing image is required"));
        };
        image.validate()?;

        let path = image.object_path(&user_id);
        let url = self
            .media
            .upload(ITEM_IMAGE_BUCKET, &path, image.bytes, &image.content_type)
            .await?;
        draft.image_urls = Some(url);

        let product = self.products.insert(&draft).await?;
        info!(product_id = %product.id, "listing created");
        Ok(product)
    }

    /// Removes one of the seller's listings.
    ///
    /// Ownership is enforced by the backend's row policies; this only gates
    /// on having a session at all.
    pub async fn delete_listing(&self, product_id: &str) -> Result<()> {
        self.require_user().await?;
        self.products.delete(product_id).await
    }

    async fn require_user(&self) -> Result<String> {
        let session = self.identity.session().await?;
        session
            .map(|s| s.user.id)
            .ok_or_else(|| StoreError::security("sign in to manage your listings"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopici_infrastructure::{MemoryDataService, MemoryIdentityService, MemoryObjectStore};

    struct Fixture {
        seller: SellerUseCase,
        identity: MemoryIdentityService,
        media: MemoryObjectStore,
    }

    fn fixture() -> Fixture {
        let (identity, _) = MemoryIdentityService::new().with_account("s@example.com", "pw");
        let data = MemoryDataService::new();
        let media = MemoryObjectStore::new();
        let seller = SellerUseCase::new(
            Arc::new(identity.clone()),
            Arc::new(data),
            Arc::new(media.clone()),
        );
        Fixture {
            seller,
            identity,
            media,
        }
    }

    fn form() -> ListingForm {
        ListingForm {
            title: "Desk lamp".into(),
            description: "Warm light, walnut base".into(),
            price: 39.0,
            category: ProductCategory::Home,
            image: Some(ImageUpload {
                file_name: "lamp.jpg".into(),
                content_type: "image/jpeg".into(),
                bytes: vec![0u8; 64],
            }),
        }
    }

    async fn sign_in(fx: &Fixture) {
        fx.identity
            .sign_in_with_password("s@example.com", "pw")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_listing_uploads_image_and_inserts_row() {
        let fx = fixture();
        sign_in(&fx).await;

        let product = fx.seller.create_listing(form()).await.unwrap();

        let url = product.image_urls.clone().unwrap();
        assert!(url.contains(ITEM_IMAGE_BUCKET));
        // The stored object lives under the seller's prefix.
        let path = url.strip_prefix("memory://item-images/").unwrap();
        assert!(path.starts_with(&product.user_id));
        assert!(fx.media.stored(ITEM_IMAGE_BUCKET, path).is_some());

        let mine = fx.seller.my_products().await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, product.id);
    }

    #[tokio::test]
    async fn test_create_listing_requires_session() {
        let fx = fixture();
        let err = fx.seller.create_listing(form()).await.unwrap_err();
        assert!(err.is_security());
    }

    #[tokio::test]
    async fn test_create_listing_requires_an_image() {
        let fx = fixture();
        sign_in(&fx).await;

        let mut no_image = form();
        no_image.image = None;

        let err = fx.seller.create_listing(no_image).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_create_listing_rejects_bad_upload_before_storing() {
        let fx = fixture();
        sign_in(&fx).await;

        let mut bad = form();
        bad.image = Some(ImageUpload {
            file_name: "notes.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: vec![0u8; 64],
        });

        let err = fx.seller.create_listing(bad).await.unwrap_err();
        assert!(err.is_validation());
        assert!(fx.seller.my_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_listing_rejects_blank_fields() {
        let fx = fixture();
        sign_in(&fx).await;

        let mut blank = form();
        blank.title = "  ".into();

        assert!(fx.seller.create_listing(blank).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_delete_listing_removes_row() {
        let fx = fixture();
        sign_in(&fx).await;

        let product = fx.seller.create_listing(form()).await.unwrap();
        fx.seller.delete_listing(&product.id).await.unwrap();

        assert!(fx.seller.my_products().await.unwrap().is_empty());
    }
}
