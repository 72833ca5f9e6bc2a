use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a product review
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub order_id: Option<Uuid>,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub order_id: Option<Uuid>,
    pub rating: i32,
    pub comment: String,
}
