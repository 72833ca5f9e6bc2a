use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::products::models::{Product, ProductStatus, Review};

/// Request body for creating or replacing a product.
///
/// Every field is optional on the wire so that missing values surface as the
/// catalog's own validation messages instead of JSON decoding errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductInputDto {
    #[serde(default)]
    #[validate(length(min = 1, message = "Enter name!"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Enter description!"))]
    pub description: String,

    /// Image reference (URL or storage key)
    #[serde(default)]
    #[validate(length(min = 1, message = "Upload image!"))]
    pub image: String,

    /// Category id
    pub category: Option<String>,

    pub quantity: Option<i32>,

    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,

    /// `PRIVATE` or `PUBLIC`
    pub status: Option<String>,
}

impl ProductInputDto {
    /// Trim the free-text fields
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            image: self.image.trim().to_string(),
            ..self
        }
    }
}

/// Query params for listing products
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ProductListQuery {
    /// Case-insensitive regular expression matched against product names
    pub search: Option<String>,
}

/// Request body for reviewing a product
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReviewDto {
    /// Order the reviewed purchase belongs to
    pub order: Option<Uuid>,

    #[serde(default)]
    #[validate(range(min = 1, max = 5, message = "Give rating!"))]
    pub rating: i32,

    #[serde(default)]
    #[validate(length(min = 1, message = "Enter the review!"))]
    pub comment: String,
}

impl CreateReviewDto {
    pub fn trimmed(self) -> Self {
        Self {
            comment: self.comment.trim().to_string(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewAuthorDto {
    pub id: Uuid,
    /// `None` when the author no longer exists
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponseDto {
    pub id: Uuid,
    pub user: ReviewAuthorDto,
    pub order: Option<Uuid>,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl ReviewResponseDto {
    pub fn new(review: Review, author_name: Option<String>) -> Self {
        Self {
            id: review.id,
            user: ReviewAuthorDto {
                id: review.user_id,
                name: author_name,
            },
            order: review.order_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

/// Product with its category and review authors populated
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: String,
    /// `None` when the referenced category no longer exists
    pub category: Option<CategoryResponseDto>,
    pub quantity: i32,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub status: ProductStatus,
    pub reviews: Vec<ReviewResponseDto>,
    pub created_at: DateTime<Utc>,
}

impl ProductResponseDto {
    pub fn new(
        product: Product,
        category: Option<CategoryResponseDto>,
        reviews: Vec<ReviewResponseDto>,
    ) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            image: product.image,
            category,
            quantity: product.quantity,
            price: product.price,
            status: product.status,
            reviews,
            created_at: product.created_at,
        }
    }
}

/// `{ product }`; `null` when nothing matched
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductPayload {
    pub product: Option<ProductResponseDto>,
}

/// `{ products }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductListPayload {
    pub products: Vec<ProductResponseDto>,
}

/// `{ recommended_prod }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendedProductsPayload {
    pub recommended_prod: Vec<ProductResponseDto>,
}
