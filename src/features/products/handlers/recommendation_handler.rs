use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::products::dtos::RecommendedProductsPayload;
use crate::features::products::services::RecommendationService;
use crate::shared::types::{ApiResponse, Meta};

/// Products recommended from the caller's cart
#[utoipa::path(
    get,
    path = "/api/products/recommended",
    responses(
        (status = 200, description = "Recommended products", body = ApiResponse<RecommendedProductsPayload>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "No user found"),
        (status = 502, description = "Recommendation service failed")
    ),
    tag = "products",
    security(("bearer_auth" = []))
)]
pub async fn list_recommended_products(
    user: AuthenticatedUser,
    State(service): State<Arc<RecommendationService>>,
) -> Result<Json<ApiResponse<RecommendedProductsPayload>>> {
    let user_id = user
        .user_uuid()
        .ok_or_else(|| AppError::NotFound("No user found".to_string()))?;

    let recommended_prod = service.recommend(user_id).await?;
    let meta = Meta {
        total: recommended_prod.len() as i64,
    };
    Ok(Json(ApiResponse::success(
        Some(RecommendedProductsPayload { recommended_prod }),
        None,
        Some(meta),
    )))
}
