use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::products::{
    dtos as products_dtos, handlers as products_handlers, models as products_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories (public)
        categories_handlers::list_categories,
        categories_handlers::get_category,
        // Products (admin)
        products_handlers::create_product,
        products_handlers::update_product,
        products_handlers::delete_product,
        // Products (public)
        products_handlers::get_product,
        products_handlers::list_products,
        products_handlers::list_category_products,
        // Products (customer)
        products_handlers::create_review,
        products_handlers::list_recommended_products,
    ),
    components(
        schemas(
            Meta,
            // Categories
            categories_dtos::CategoryResponseDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            // Products
            products_models::ProductStatus,
            products_dtos::ProductInputDto,
            products_dtos::CreateReviewDto,
            products_dtos::ReviewAuthorDto,
            products_dtos::ReviewResponseDto,
            products_dtos::ProductResponseDto,
            products_dtos::ProductPayload,
            products_dtos::ProductListPayload,
            products_dtos::RecommendedProductsPayload,
            ApiResponse<products_dtos::ProductPayload>,
            ApiResponse<products_dtos::ProductListPayload>,
            ApiResponse<products_dtos::RecommendedProductsPayload>,
        )
    ),
    tags(
        (name = "categories", description = "Product categories (public)"),
        (name = "products", description = "Product catalog, reviews and recommendations"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "API documentation for the product catalog",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
