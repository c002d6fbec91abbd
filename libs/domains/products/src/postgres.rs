use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::{
    entity,
    error::{ProductError, ProductResult},
    filter::{ProductFilter, ProductQuery},
    models::{CreateProduct, Product, UpdateProduct},
    repository::ProductRepository,
};

pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let active_model = entity::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            price: Set(input.price),
            brand: Set(input.brand),
            image: Set(input.image),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let model = active_model.insert(&self.db).await?;
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self, query: &ProductQuery) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .filter(query.filter.condition())
            .order_by_desc(entity::Column::Id)
            .offset(query.pagination.skip())
            .limit(query.pagination.take())
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64> {
        let count = entity::Entity::find()
            .filter(filter.condition())
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn update(&self, id: i32, input: UpdateProduct) -> ProductResult<Product> {
        let active_model = entity::ActiveModel {
            id: Unchanged(id),
            name: Set(input.name),
            price: Set(input.price),
            brand: Set(input.brand),
            image: input.image.map(Set).unwrap_or(NotSet),
            created_at: NotSet,
            updated_at: Set(Utc::now().into()),
        };

        match active_model.update(&self.db).await {
            Ok(model) => Ok(model.into()),
            Err(DbErr::RecordNotUpdated) => Err(ProductError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
