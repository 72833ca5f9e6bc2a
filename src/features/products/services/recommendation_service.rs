use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::repositories::CategoryRepository;
use crate::features::products::clients::BasketRecommender;
use crate::features::products::dtos::ProductResponseDto;
use crate::features::products::models::{Product, ProductFilter};
use crate::features::products::repositories::ProductRepository;
use crate::features::products::services::ProductService;
use crate::features::users::repositories::UserRepository;

/// Category listings queried at once for one recommendation
const MAX_CONCURRENT_LISTINGS: usize = 8;

/// Builds a user's recommended product list from their cart.
///
/// The cart's category names form the basket sent to the recommender. The
/// result is the PUBLIC products of every recommended category, in the
/// recommender's order, followed by the PUBLIC products of each cart item's
/// category, in cart order. Products are not de-duplicated across the two
/// parts. An empty basket falls back to the full PUBLIC listing.
pub struct RecommendationService {
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    products: Arc<dyn ProductRepository>,
    catalog: Arc<ProductService>,
    recommender: Arc<dyn BasketRecommender>,
}

impl RecommendationService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
        catalog: Arc<ProductService>,
        recommender: Arc<dyn BasketRecommender>,
    ) -> Self {
        Self {
            users,
            categories,
            products,
            catalog,
            recommender,
        }
    }

    pub async fn recommend(&self, user_id: Uuid) -> Result<Vec<ProductResponseDto>> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No user found".to_string()))?;

        let cart = self.users.cart_items(user.id).await?;
        let cart_product_ids: Vec<Uuid> = cart.iter().map(|item| item.product_id).collect();
        let cart_products: HashMap<Uuid, Product> = self
            .products
            .find_by_ids(&cart_product_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut cart_category_ids = Vec::with_capacity(cart.len());
        for item in &cart {
            match cart_products.get(&item.product_id) {
                Some(product) => cart_category_ids.push(product.category_id),
                None => tracing::warn!(
                    "Skipping cart item of user {}: product {} no longer exists",
                    user.id,
                    item.product_id
                ),
            }
        }

        let all_categories = self.categories.list().await?;
        let names_by_id: HashMap<Uuid, &str> = all_categories
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect();
        let ids_by_name: HashMap<&str, Uuid> = all_categories
            .iter()
            .map(|c| (c.name.as_str(), c.id))
            .collect();

        let mut basket = Vec::with_capacity(cart_category_ids.len());
        for category_id in &cart_category_ids {
            match names_by_id.get(category_id) {
                Some(name) => basket.push(name.to_string()),
                None => tracing::warn!(
                    "Skipping cart category {} of user {}: category not found",
                    category_id,
                    user.id
                ),
            }
        }

        if basket.is_empty() {
            tracing::debug!("User {} has no cart categories, using full listing", user.id);
            return self.catalog.list_public(None).await;
        }

        let recommended = self.recommender.recommend(&basket).await?;

        let mut filters = Vec::with_capacity(recommended.len() + cart_category_ids.len());
        for name in &recommended {
            match ids_by_name.get(name.as_str()) {
                Some(id) => filters.push(ProductFilter::by_category(*id)),
                None => tracing::warn!("Skipping unknown recommended category '{}'", name),
            }
        }
        filters.extend(cart_category_ids.into_iter().map(ProductFilter::by_category));

        // bounded concurrency, `buffered` yields in request order
        let lookups: Vec<_> = filters
            .iter()
            .map(|filter| self.products.list_public(filter))
            .collect();
        let listings: Vec<Vec<Product>> = stream::iter(lookups)
            .buffered(MAX_CONCURRENT_LISTINGS)
            .try_collect()
            .await?;
        let products: Vec<Product> = listings.into_iter().flatten().collect();

        tracing::info!(
            "Recommended {} products for user {} from {} categories",
            products.len(),
            user.id,
            filters.len()
        );

        self.catalog.populate(products).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    use crate::features::products::clients::MockBasketRecommender;
    use crate::features::products::models::ProductStatus;
    use crate::shared::test_helpers::InMemoryStore;

    fn service(store: &InMemoryStore, recommender: MockBasketRecommender) -> RecommendationService {
        let catalog = Arc::new(ProductService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        ));
        RecommendationService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            catalog,
            Arc::new(recommender),
        )
    }

    fn names(products: &[ProductResponseDto]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_unknown_user_is_server_error() {
        let store = InMemoryStore::new();
        let mut recommender = MockBasketRecommender::new();
        recommender.expect_recommend().never();

        let err = service(&store, recommender)
            .recommend(Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(&err, AppError::NotFound(message) if message == "No user found"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_empty_cart_returns_public_listing() {
        let store = InMemoryStore::new();
        let shoes = store.add_category("Shoes").await;
        store.add_product("Runner", shoes.id, ProductStatus::Public).await;
        store.add_product("Prototype", shoes.id, ProductStatus::Private).await;
        store.add_product("Boot", shoes.id, ProductStatus::Public).await;
        let user = store.add_user("Dina").await;

        let mut recommender = MockBasketRecommender::new();
        recommender.expect_recommend().never();

        let result = service(&store, recommender).recommend(user.id).await.unwrap();
        assert_eq!(names(&result), vec!["Boot", "Runner"]);
    }

    #[tokio::test]
    async fn test_recommended_then_cart_categories_with_duplicates() {
        let store = InMemoryStore::new();
        let a = store.add_category("A").await;
        let b = store.add_category("B").await;
        let a1 = store.add_product("a1", a.id, ProductStatus::Public).await;
        let b1 = store.add_product("b1", b.id, ProductStatus::Public).await;
        store.add_product("b2", b.id, ProductStatus::Public).await;
        store.add_product("b-hidden", b.id, ProductStatus::Private).await;
        let user = store.add_user("Dina").await;
        store.add_cart_item(user.id, a1.id).await;
        store.add_cart_item(user.id, b1.id).await;

        let mut recommender = MockBasketRecommender::new();
        recommender
            .expect_recommend()
            .withf(|basket| basket.iter().map(String::as_str).eq(["A", "B"]))
            .times(1)
            .returning(|_| Ok(vec!["B".to_string()]));

        let result = service(&store, recommender).recommend(user.id).await.unwrap();
        assert_eq!(names(&result), vec!["b2", "b1", "a1", "b2", "b1"]);
        assert_eq!(result[0].category.as_ref().unwrap().name, "B");
    }

    #[tokio::test]
    async fn test_basket_keeps_duplicate_categories() {
        let store = InMemoryStore::new();
        let a = store.add_category("A").await;
        let a1 = store.add_product("a1", a.id, ProductStatus::Public).await;
        let a2 = store.add_product("a2", a.id, ProductStatus::Private).await;
        let user = store.add_user("Dina").await;
        store.add_cart_item(user.id, a1.id).await;
        store.add_cart_item(user.id, a2.id).await;

        let mut recommender = MockBasketRecommender::new();
        recommender
            .expect_recommend()
            .withf(|basket| basket.iter().map(String::as_str).eq(["A", "A"]))
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let result = service(&store, recommender).recommend(user.id).await.unwrap();
        assert_eq!(names(&result), vec!["a1", "a1"]);
    }

    #[tokio::test]
    async fn test_skips_unknown_names_and_deleted_cart_products() {
        let store = InMemoryStore::new();
        let a = store.add_category("A").await;
        let a1 = store.add_product("a1", a.id, ProductStatus::Public).await;
        let user = store.add_user("Dina").await;
        store.add_cart_item(user.id, Uuid::new_v4()).await;
        store.add_cart_item(user.id, a1.id).await;

        let mut recommender = MockBasketRecommender::new();
        recommender
            .expect_recommend()
            .withf(|basket| basket.iter().map(String::as_str).eq(["A"]))
            .times(1)
            .returning(|_| Ok(vec!["Gadgets".to_string(), "A".to_string()]));

        let result = service(&store, recommender).recommend(user.id).await.unwrap();
        assert_eq!(names(&result), vec!["a1", "a1"]);
    }

    #[tokio::test]
    async fn test_recommender_failure_has_no_fallback() {
        let store = InMemoryStore::new();
        let a = store.add_category("A").await;
        let a1 = store.add_product("a1", a.id, ProductStatus::Public).await;
        let user = store.add_user("Dina").await;
        store.add_cart_item(user.id, a1.id).await;

        let mut recommender = MockBasketRecommender::new();
        recommender
            .expect_recommend()
            .times(1)
            .returning(|_| Err(AppError::ExternalServiceError("down".to_string())));

        let result = service(&store, recommender).recommend(user.id).await;
        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }

    #[tokio::test]
    async fn test_many_categories_keep_cart_order() {
        let store = InMemoryStore::new();
        let user = store.add_user("Dina").await;
        let mut expected = Vec::new();
        for i in 0..(MAX_CONCURRENT_LISTINGS * 3) {
            let category = store.add_category(&format!("C{:02}", i)).await;
            let name = format!("p{:02}", i);
            let product = store.add_product(&name, category.id, ProductStatus::Public).await;
            store.add_cart_item(user.id, product.id).await;
            expected.push(name);
        }

        let mut recommender = MockBasketRecommender::new();
        recommender
            .expect_recommend()
            .times(1)
            .returning(|basket| Ok(basket.iter().rev().cloned().collect()));

        let result = service(&store, recommender).recommend(user.id).await.unwrap();
        let mut expected_order: Vec<String> = expected.iter().rev().cloned().collect();
        expected_order.extend(expected);
        assert_eq!(names(&result), expected_order);
    }
}
