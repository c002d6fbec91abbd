//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::error::{ProductError, ProductResult};
use crate::filter::{total_pages, AppliedFilters, ListProductsParams, ProductPage, ProductQuery};
use crate::form::ProductForm;
use crate::models::{Product, KNOWN_BRANDS};
use crate::repository::ProductRepository;
use crate::storage::{ImageStore, ImageUpload};

/// Product service
///
/// Validates submitted forms once, then sequences image staging and the row
/// write so that a failed write never leaves a newly stored file behind.
pub struct ProductService<R: ProductRepository, S: ImageStore> {
    repository: Arc<R>,
    images: Arc<S>,
}

impl<R: ProductRepository, S: ImageStore> ProductService<R, S> {
    pub fn new(repository: R, images: S) -> Self {
        Self {
            repository: Arc::new(repository),
            images: Arc::new(images),
        }
    }

    /// Filtered, paginated listing with the total match count
    #[instrument(skip(self))]
    pub async fn list_products(&self, params: ListProductsParams) -> ProductResult<ProductPage> {
        let query = ProductQuery::try_from(params)?;

        let (data, total_count) = tokio::try_join!(
            self.repository.list(&query),
            self.repository.count(&query.filter)
        )?;

        Ok(ProductPage {
            data,
            total_pages: total_pages(total_count, query.pagination.limit),
            total_count,
            filters: AppliedFilters::from(&query.filter),
        })
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self, form))]
    pub async fn create_product(&self, form: ProductForm) -> ProductResult<Product> {
        let (input, upload) = form.into_parts()?;
        let image = self.stage(upload).await?;

        match self.repository.create(input.into_create(image.clone())).await {
            Ok(product) => {
                info!(product_id = product.id, image = %product.image, "Created product");
                Ok(product)
            }
            Err(e) => {
                self.discard(image.as_deref()).await;
                Err(e)
            }
        }
    }

    /// Overwrite name, price and brand; replace the image only when a new one is sent.
    #[instrument(skip(self, form))]
    pub async fn update_product(&self, id: i32, form: ProductForm) -> ProductResult<Product> {
        let (input, upload) = form.into_parts()?;
        let image = self.stage(upload).await?;

        match self.repository.update(id, input.into_update(image.clone())).await {
            Ok(product) => {
                info!(product_id = id, image = %product.image, "Updated product");
                Ok(product)
            }
            Err(e) => {
                self.discard(image.as_deref()).await;
                Err(e)
            }
        }
    }

    /// Remove the row; returns whether it existed. The stored image is kept.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> ProductResult<bool> {
        let deleted = self.repository.delete(id).await?;
        info!(product_id = id, deleted, "Deleted product");
        Ok(deleted)
    }

    pub fn known_brands(&self) -> Vec<String> {
        KNOWN_BRANDS.iter().map(|b| b.to_string()).collect()
    }

    async fn stage(&self, upload: Option<ImageUpload>) -> ProductResult<Option<String>> {
        let Some(upload) = upload else {
            return Ok(None);
        };

        match self.images.store(upload).await {
            Ok(reference) => Ok(Some(reference)),
            Err(e) => {
                if !matches!(e, ProductError::InvalidImage(_)) {
                    error!(error = %e, "Failed to store product image");
                }
                Err(e)
            }
        }
    }

    async fn discard(&self, reference: Option<&str>) {
        let Some(reference) = reference else {
            return;
        };
        if let Err(e) = self.images.discard(reference).await {
            error!(error = %e, reference, "Failed to discard staged image");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateProduct;
    use crate::repository::MockProductRepository;
    use crate::storage::MockImageStore;
    use bytes::Bytes;
    use mockall::predicate::eq;

    fn form(image: Option<ImageUpload>) -> ProductForm {
        ProductForm {
            name: Some("Pocket 3".into()),
            price: Some("519".into()),
            brand: Some("DJI".into()),
            image,
        }
    }

    fn upload() -> ImageUpload {
        ImageUpload {
            file_name: "pocket.png".into(),
            content_type: Some("image/png".into()),
            bytes: Bytes::from_static(b"png"),
        }
    }

    fn product_from(input: CreateProduct) -> Product {
        Product::new(1, input)
    }

    #[tokio::test]
    async fn test_create_without_image_stores_nothing() {
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .withf(|input| input.image.is_empty() && input.brand.as_deref() == Some("DJI"))
            .returning(|input| Ok(product_from(input)));

        let mut images = MockImageStore::new();
        images.expect_store().never();

        let service = ProductService::new(repo, images);
        let product = service.create_product(form(None)).await.unwrap();
        assert_eq!(product.image, "");
    }

    #[tokio::test]
    async fn test_create_records_stored_reference() {
        let mut images = MockImageStore::new();
        images
            .expect_store()
            .times(1)
            .returning(|_| Ok("/uploads/1_pocket.png".to_string()));

        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .withf(|input| input.image == "/uploads/1_pocket.png")
            .returning(|input| Ok(product_from(input)));

        let service = ProductService::new(repo, images);
        let product = service.create_product(form(Some(upload()))).await.unwrap();
        assert_eq!(product.image, "/uploads/1_pocket.png");
    }

    #[tokio::test]
    async fn test_invalid_form_touches_nothing() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();
        let mut images = MockImageStore::new();
        images.expect_store().never();

        let service = ProductService::new(repo, images);
        let mut bad = form(Some(upload()));
        bad.name = Some("x".repeat(192));

        let err = service.create_product(bad).await.unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_failed_insert_discards_staged_image() {
        let mut images = MockImageStore::new();
        images
            .expect_store()
            .returning(|_| Ok("/uploads/1_pocket.png".to_string()));
        images
            .expect_discard()
            .withf(|reference| reference == "/uploads/1_pocket.png")
            .times(1)
            .returning(|_| Ok(()));

        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .returning(|_| Err(ProductError::Database("connection reset".into())));

        let service = ProductService::new(repo, images);
        let err = service.create_product(form(Some(upload()))).await.unwrap_err();
        assert!(matches!(err, ProductError::Database(_)));
    }

    #[tokio::test]
    async fn test_update_missing_row_discards_staged_image() {
        let mut images = MockImageStore::new();
        images
            .expect_store()
            .returning(|_| Ok("/uploads/2_pocket.png".to_string()));
        images
            .expect_discard()
            .withf(|reference| reference == "/uploads/2_pocket.png")
            .times(1)
            .returning(|_| Ok(()));

        let mut repo = MockProductRepository::new();
        repo.expect_update()
            .with(eq(404), mockall::predicate::always())
            .returning(|id, _| Err(ProductError::NotFound(id)));

        let service = ProductService::new(repo, images);
        let err = service.update_product(404, form(Some(upload()))).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound(404)));
    }

    #[tokio::test]
    async fn test_update_without_image_leaves_it_unset() {
        let mut repo = MockProductRepository::new();
        repo.expect_update()
            .withf(|id, input| *id == 3 && input.image.is_none() && input.price == 519.0)
            .returning(|id, input| {
                let mut product = Product::new(
                    id,
                    CreateProduct {
                        name: "old".into(),
                        price: 1.0,
                        brand: None,
                        image: "/uploads/old.png".into(),
                    },
                );
                product.apply_update(input);
                Ok(product)
            });

        let mut images = MockImageStore::new();
        images.expect_store().never();
        images.expect_discard().never();

        let service = ProductService::new(repo, images);
        let product = service.update_product(3, form(None)).await.unwrap();
        assert_eq!(product.image, "/uploads/old.png");
        assert_eq!(product.name, "Pocket 3");
    }

    #[tokio::test]
    async fn test_rejected_image_skips_the_write() {
        let mut images = MockImageStore::new();
        images
            .expect_store()
            .returning(|_| Err(ProductError::InvalidImage("unsupported content type".into())));
        images.expect_discard().never();

        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let service = ProductService::new(repo, images);
        let err = service.create_product(form(Some(upload()))).await.unwrap_err();
        assert!(matches!(err, ProductError::InvalidImage(_)));
    }

    #[tokio::test]
    async fn test_list_combines_page_and_count() {
        let mut repo = MockProductRepository::new();
        repo.expect_list().returning(|query| {
            assert_eq!(query.pagination.skip(), 5);
            Ok(vec![])
        });
        repo.expect_count().returning(|_| Ok(12));

        let service = ProductService::new(repo, MockImageStore::new());
        let page = service
            .list_products(ListProductsParams {
                page: Some("2".into()),
                brand: Some("sony".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.total_count, 12);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.filters.brand, "sony");
        assert_eq!(page.filters.max_price, None);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_params_before_querying() {
        let mut repo = MockProductRepository::new();
        repo.expect_list().never();
        repo.expect_count().never();

        let service = ProductService::new(repo, MockImageStore::new());
        let err = service
            .list_products(ListProductsParams {
                limit: Some("0".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id().with(eq(8)).returning(|_| Ok(None));

        let service = ProductService::new(repo, MockImageStore::new());
        assert!(matches!(
            service.get_product(8).await,
            Err(ProductError::NotFound(8))
        ));
    }

    #[tokio::test]
    async fn test_known_brands() {
        let service = ProductService::new(MockProductRepository::new(), MockImageStore::new());
        let brands = service.known_brands();
        assert_eq!(brands.len(), 23);
        assert_eq!(brands.first().map(String::as_str), Some("Xerox"));
    }
}
