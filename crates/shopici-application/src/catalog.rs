//! Public catalog browsing.

use std::sync::Arc;

use shopici_core::error::{Result, StoreError};
use shopici_core::product::{Product, ProductCategory, ProductRepository};

/// Sort orders offered by the catalog screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogSort {
    #[default]
    Newest,
    Oldest,
    PriceLowHigh,
    PriceHighLow,
}

/// Client-side filter and sort settings over the fetched active listings.
///
/// The backend only narrows to active rows; search, category, price range
/// and ordering are applied here, like the original catalog screen did.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub category: Option<ProductCategory>,
    /// Case-insensitive match against title or description.
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: CatalogSort,
}

impl CatalogQuery {
    /// Applies the filters and sort order to a fetched row set.
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        let needle = self.search.as_deref().map(str::to_lowercase);

        let mut rows: Vec<Product> = products
            .into_iter()
            .filter(|p| self.category.is_none_or(|c| p.category == c))
            .filter(|p| {
                needle.as_deref().is_none_or(|needle| {
                    p.title.to_lowercase().contains(needle)
                        || p.description.to_lowercase().contains(needle)
                })
            })
            .filter(|p| {
                p.price >= self.min_price.unwrap_or(0.0)
                    && self.max_price.is_none_or(|max| p.price <= max)
            })
            .collect();

        match self.sort {
            CatalogSort::Newest => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            CatalogSort::Oldest => rows.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            CatalogSort::PriceLowHigh => rows.sort_by(|a, b| a.price.total_cmp(&b.price)),
            CatalogSort::PriceHighLow => rows.sort_by(|a, b| b.price.total_cmp(&a.price)),
        }

        rows
    }
}

/// Use case behind the catalog and product-details screens.
pub struct CatalogUseCase {
    products: Arc<dyn ProductRepository>,
}

impl CatalogUseCase {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    /// Fetches the active listings and applies the query client-side.
    pub async fn browse(&self, query: &CatalogQuery) -> Result<Vec<Product>> {
        let rows = self.products.list_active().await?;
        Ok(query.apply(rows))
    }

    /// One listing by id, as shown on the details screen.
    pub async fn product_details(&self, product_id: &str) -> Result<Product> {
        self.products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| StoreError::not_found("product", product_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use shopici_core::product::ProductStatus;
    use shopici_infrastructure::MemoryDataService;

    fn product(id: &str, category: ProductCategory, price: f64, age_minutes: i64) -> Product {
        Product {
            id: id.to_string(),
            user_id: "seller-1".into(),
            title: format!("{id} listing"),
            description: "A well-loved thing".into(),
            price,
            category,
            image_urls: None,
            status: ProductStatus::Active,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    fn sample() -> Vec<Product> {
        vec![
            product("phone", ProductCategory::Electronics, 300.0, 30),
            product("lamp", ProductCategory::Home, 40.0, 10),
            product("jacket", ProductCategory::Fashion, 80.0, 20),
        ]
    }

    #[test]
    fn test_default_query_keeps_everything_newest_first() {
        let rows = CatalogQuery::default().apply(sample());
        let ids: Vec<&str> = rows.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["lamp", "jacket", "phone"]);
    }

    #[test]
    fn test_category_filter() {
        let query = CatalogQuery {
            category: Some(ProductCategory::Home),
            ..Default::default()
        };
        let rows = query.apply(sample());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "lamp");
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_description() {
        let query = CatalogQuery {
            search: Some("JACKET".into()),
            ..Default::default()
        };
        assert_eq!(query.apply(sample()).len(), 1);

        let query = CatalogQuery {
            search: Some("well-loved".into()),
            ..Default::default()
        };
        assert_eq!(query.apply(sample()).len(), 3);
    }

    #[test]
    fn test_price_range_bounds_are_inclusive() {
        let query = CatalogQuery {
            min_price: Some(40.0),
            max_price: Some(80.0),
            ..Default::default()
        };
        let mut ids: Vec<String> = query.apply(sample()).into_iter().map(|p| p.id).collect();
        ids.sort();
        assert_eq!(ids, ["jacket", "lamp"]);
    }

    #[test]
    fn test_price_sorts() {
        let query = CatalogQuery {
            sort: CatalogSort::PriceLowHigh,
            ..Default::default()
        };
        let ids: Vec<String> = query.apply(sample()).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["lamp", "jacket", "phone"]);

        let query = CatalogQuery {
            sort: CatalogSort::PriceHighLow,
            ..Default::default()
        };
        let ids: Vec<String> = query.apply(sample()).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["phone", "jacket", "lamp"]);
    }

    #[tokio::test]
    async fn test_browse_only_sees_active_rows() {
        let data = MemoryDataService::new();
        for p in sample() {
            data.seed_product(p);
        }
        let mut hidden = product("drawer", ProductCategory::Home, 15.0, 5);
        hidden.status = ProductStatus::Inactive;
        data.seed_product(hidden);

        let catalog = CatalogUseCase::new(Arc::new(data));
        let rows = catalog.browse(&CatalogQuery::default()).await.unwrap();

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|p| p.id != "drawer"));
    }

    #[tokio::test]
    async fn test_product_details_unknown_id_is_not_found() {
        let catalog = CatalogUseCase::new(Arc::new(MemoryDataService::new()));
        let err = catalog.product_details("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
