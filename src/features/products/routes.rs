use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::products::handlers;
use crate::features::products::services::{ProductService, RecommendationService};

/// Catalog browsing, no authentication required
pub fn public_routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route("/api/products", get(handlers::list_products))
        .route("/api/products/{id}", get(handlers::get_product))
        .route(
            "/api/categories/{id}/products",
            get(handlers::list_category_products),
        )
        .with_state(service)
}

/// Product administration and reviews, behind the auth middleware
pub fn protected_routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route("/api/products", post(handlers::create_product))
        .route(
            "/api/products/{id}",
            patch(handlers::update_product).delete(handlers::delete_product),
        )
        .route("/api/products/{id}/reviews", post(handlers::create_review))
        .with_state(service)
}

/// Cart-based recommendations, behind the auth middleware
pub fn recommendation_routes(service: Arc<RecommendationService>) -> Router {
    Router::new()
        .route(
            "/api/products/recommended",
            get(handlers::list_recommended_products),
        )
        .with_state(service)
}
