use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::products::models::{
    NewProduct, NewReview, Product, ProductFilter, ProductStatus, ProductUpdate, Review,
};

/// Persistence for products and their reviews
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, product: NewProduct) -> Result<Product>;

    /// Returns `None` when no product has the id
    async fn update(&self, id: Uuid, changes: ProductUpdate) -> Result<Option<Product>>;

    /// Deletes the product and its reviews, returning the deleted product
    async fn delete(&self, id: Uuid) -> Result<Option<Product>>;

    /// Any status
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>>;

    /// Any status; unknown ids are absent from the result
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>>;

    async fn find_public(&self, id: Uuid) -> Result<Option<Product>>;

    /// PUBLIC products matching the filter, newest first
    async fn list_public(&self, filter: &ProductFilter) -> Result<Vec<Product>>;

    /// Appends one review to a product
    async fn add_review(&self, review: NewReview) -> Result<Review>;

    /// Reviews of the given products, oldest first
    async fn reviews_for(&self, product_ids: &[Uuid]) -> Result<Vec<Review>>;
}

const PRODUCT_COLUMNS: &str = "id, name, description, image, category_id, quantity, price, \
                               status, created_at, updated_at";

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let sql = format!(
            r#"
            INSERT INTO products (name, description, image, category_id, quantity, price, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Product>(&sql)
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.image)
            .bind(product.category_id)
            .bind(product.quantity)
            .bind(product.price)
            .bind(product.status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create product: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(
            "Product created: id={}, name={}, status={}",
            created.id,
            created.name,
            created.status
        );

        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: ProductUpdate) -> Result<Option<Product>> {
        let sql = format!(
            r#"
            UPDATE products
            SET name = $2,
                description = $3,
                image = $4,
                category_id = $5,
                quantity = COALESCE($6, quantity),
                price = $7,
                status = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(&changes.image)
            .bind(changes.category_id)
            .bind(changes.quantity)
            .bind(changes.price)
            .bind(changes.status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update product {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if let Some(product) = &updated {
            tracing::info!("Product updated: id={}, status={}", id, product.status);
        }

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Product>> {
        let sql = format!("DELETE FROM products WHERE id = $1 RETURNING {PRODUCT_COLUMNS}");

        let deleted = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete product {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if deleted.is_some() {
            tracing::info!("Product deleted: id={}", id);
        }

        Ok(deleted)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");

        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get product by id: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)");

        sqlx::query_as::<_, Product>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get products by ids: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_public(&self, id: Uuid) -> Result<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND status = $2");

        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(ProductStatus::Public)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get public product: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list_public(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE status = "
        ));
        query.push_bind(ProductStatus::Public);

        if let Some(category_id) = filter.category_id {
            query.push(" AND category_id = ").push_bind(category_id);
        }
        query.push(" ORDER BY created_at DESC");

        query
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list products: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn add_review(&self, review: NewReview) -> Result<Review> {
        let created = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO product_reviews (product_id, user_id, order_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, product_id, user_id, order_id, rating, comment, created_at
            "#,
        )
        .bind(review.product_id)
        .bind(review.user_id)
        .bind(review.order_id)
        .bind(review.rating)
        .bind(&review.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to add review: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Review added: id={}, product_id={}, rating={}",
            created.id,
            created.product_id,
            created.rating
        );

        Ok(created)
    }

    async fn reviews_for(&self, product_ids: &[Uuid]) -> Result<Vec<Review>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Review>(
            r#"
            SELECT id, product_id, user_id, order_id, rating, comment, created_at
            FROM product_reviews
            WHERE product_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load reviews: {:?}", e);
            AppError::Database(e)
        })
    }
}
