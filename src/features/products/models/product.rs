use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Product visibility; only PUBLIC products are customer-facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "product_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductStatus {
    Private,
    Public,
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductStatus::Private => write!(f, "PRIVATE"),
            ProductStatus::Public => write!(f, "PUBLIC"),
        }
    }
}

/// Accepts exactly `PRIVATE` or `PUBLIC`
impl FromStr for ProductStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRIVATE" => Ok(ProductStatus::Private),
            "PUBLIC" => Ok(ProductStatus::Public),
            _ => Err(()),
        }
    }
}

/// Database model for product
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: String,
    pub category_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated values for a new product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub image: String,
    pub category_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    pub status: ProductStatus,
}

/// Validated replacement values for an existing product.
/// `quantity: None` keeps the stored quantity.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub image: String,
    pub category_id: Uuid,
    pub quantity: Option<i32>,
    pub price: Decimal,
    pub status: ProductStatus,
}

/// Filter for public product listings.
/// Name search is not part of it; callers match names with `regex` after loading.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
}

impl ProductFilter {
    pub fn by_category(category_id: Uuid) -> Self {
        Self {
            category_id: Some(category_id),
        }
    }
}
