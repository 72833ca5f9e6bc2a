mod product_service;
mod recommendation_service;

pub use product_service::ProductService;
pub use recommendation_service::RecommendationService;
