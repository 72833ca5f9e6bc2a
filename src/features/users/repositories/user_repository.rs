use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::users::models::{CartItem, User};

/// Read access to users and their carts
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>>;

    /// Cart lines in the order they were added
    async fn cart_items(&self, user_id: Uuid) -> Result<Vec<CartItem>>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT id, name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get user by id: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, User>("SELECT id, name FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get users by ids: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn cart_items(&self, user_id: Uuid) -> Result<Vec<CartItem>> {
        sqlx::query_as::<_, CartItem>(
            r#"
            SELECT user_id, product_id, quantity, added_at
            FROM cart_items
            WHERE user_id = $1
            ORDER BY added_at, product_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load cart for user {}: {:?}", user_id, e);
            AppError::Database(e)
        })
    }
}
