use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath};
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::products::dtos::{
    CreateReviewDto, ProductInputDto, ProductListPayload, ProductListQuery, ProductPayload,
    ProductResponseDto,
};
use crate::features::products::services::ProductService;
use crate::shared::types::{ApiResponse, Meta};

fn listing(products: Vec<ProductResponseDto>) -> ApiResponse<ProductListPayload> {
    let meta = Meta {
        total: products.len() as i64,
    };
    ApiResponse::success(Some(ProductListPayload { products }), None, Some(meta))
}

// ==================== Admin Handlers ====================

/// Create a product
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductInputDto,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<ProductPayload>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 422, description = "Validation error")
    ),
    tag = "products",
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    State(service): State<Arc<ProductService>>,
    RequireAdmin(admin): RequireAdmin,
    AppJson(dto): AppJson<ProductInputDto>,
) -> Result<Json<ApiResponse<ProductPayload>>> {
    tracing::debug!("Product create requested by {}", admin.user_id);
    let product = service.create(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(ProductPayload {
            product: Some(product),
        }),
        Some("Product created".to_string()),
        None,
    )))
}

/// Update a product
#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product id")
    ),
    request_body = ProductInputDto,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductPayload>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 500, description = "Product not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "products",
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    State(service): State<Arc<ProductService>>,
    RequireAdmin(_admin): RequireAdmin,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<ProductInputDto>,
) -> Result<Json<ApiResponse<ProductPayload>>> {
    let product = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(ProductPayload {
            product: Some(product),
        }),
        Some("Product updated".to_string()),
        None,
    )))
}

/// Delete a product
///
/// Returns `product: null` when no product had the id.
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Deleted product, or null", body = ApiResponse<ProductPayload>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "products",
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    State(service): State<Arc<ProductService>>,
    RequireAdmin(_admin): RequireAdmin,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<ProductPayload>>> {
    let product = service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        Some(ProductPayload { product }),
        None,
        None,
    )))
}

// ==================== Public Handlers ====================

/// Get a public product
///
/// Returns `product: null` when the product is missing or private.
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product, or null", body = ApiResponse<ProductPayload>)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(service): State<Arc<ProductService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<ProductPayload>>> {
    let product = service.get_public(id).await?;
    Ok(Json(ApiResponse::success(
        Some(ProductPayload { product }),
        None,
        None,
    )))
}

/// List public products, newest first
#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "List of products", body = ApiResponse<ProductListPayload>),
        (status = 400, description = "Invalid search pattern")
    ),
    tag = "products"
)]
pub async fn list_products(
    State(service): State<Arc<ProductService>>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ApiResponse<ProductListPayload>>> {
    let products = service.list_public(query.search.as_deref()).await?;
    Ok(Json(listing(products)))
}

/// List public products of a category, newest first
#[utoipa::path(
    get,
    path = "/api/categories/{id}/products",
    params(
        ("id" = Uuid, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "List of products", body = ApiResponse<ProductListPayload>)
    ),
    tag = "products"
)]
pub async fn list_category_products(
    State(service): State<Arc<ProductService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<ProductListPayload>>> {
    let products = service.list_by_category(id).await?;
    Ok(Json(listing(products)))
}

// ==================== Customer Handlers ====================

/// Review a product
#[utoipa::path(
    post,
    path = "/api/products/{id}/reviews",
    params(
        ("id" = Uuid, Path, description = "Product id")
    ),
    request_body = CreateReviewDto,
    responses(
        (status = 200, description = "Reviewed product", body = ApiResponse<ProductPayload>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Product not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "products",
    security(("bearer_auth" = []))
)]
pub async fn create_review(
    user: AuthenticatedUser,
    State(service): State<Arc<ProductService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<CreateReviewDto>,
) -> Result<Json<ApiResponse<ProductPayload>>> {
    let user_id = user
        .user_uuid()
        .ok_or_else(|| AppError::Unauthorized("Invalid user id in token".to_string()))?;

    let product = service.add_review(id, user_id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(ProductPayload {
            product: Some(product),
        }),
        None,
        None,
    )))
}
