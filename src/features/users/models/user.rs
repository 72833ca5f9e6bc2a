use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Storefront user as seen by the catalog
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
}

/// One line of a user's cart
#[derive(Debug, Clone, FromRow)]
pub struct CartItem {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub added_at: DateTime<Utc>,
}
