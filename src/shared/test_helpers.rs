use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, Router};
use chrono::{DateTime, Utc};
use fake::faker::lorem::en::{Sentence, Word};
use fake::Fake;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::{AuthenticatedUser, ROLE_ADMIN};
use crate::features::categories::models::Category;
use crate::features::categories::repositories::CategoryRepository;
use crate::features::products::models::{
    NewProduct, NewReview, Product, ProductFilter, ProductStatus, ProductUpdate, Review,
};
use crate::features::products::repositories::ProductRepository;
use crate::features::users::models::{CartItem, User};
use crate::features::users::repositories::UserRepository;

pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: Uuid::new_v4().to_string(),
        roles: vec![ROLE_ADMIN.to_string()],
    }
}

pub fn create_customer(user_id: Uuid) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: user_id.to_string(),
        roles: Vec::new(),
    }
}

/// Puts `user` in the request extensions the way the auth middleware does
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}

#[derive(Default)]
struct StoreState {
    categories: Vec<Category>,
    users: Vec<User>,
    cart: Vec<CartItem>,
    products: Vec<Product>,
    reviews: Vec<Review>,
    clock: i64,
}

impl StoreState {
    /// Strictly increasing timestamps so "newest first" is deterministic
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        DateTime::from_timestamp(1_700_000_000 + self.clock, 0).unwrap()
    }
}

/// In-memory stand-in for the Postgres repositories
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_category(&self, name: &str) -> Category {
        let mut state = self.state.write().await;
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: state.tick(),
        };
        state.categories.push(category.clone());
        category
    }

    pub async fn add_user(&self, name: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.state.write().await.users.push(user.clone());
        user
    }

    pub async fn add_product(&self, name: &str, category_id: Uuid, status: ProductStatus) -> Product {
        self.insert(NewProduct {
            name: name.to_string(),
            description: Sentence(3..8).fake(),
            image: format!("{}.png", Word().fake::<String>()),
            category_id,
            quantity: (1..50).fake(),
            price: Decimal::new((100..10_000).fake(), 2),
            status,
        })
        .await
        .unwrap()
    }

    pub async fn add_cart_item(&self, user_id: Uuid, product_id: Uuid) {
        let mut state = self.state.write().await;
        let added_at = state.tick();
        state.cart.push(CartItem {
            user_id,
            product_id,
            quantity: 1,
            added_at,
        });
    }

    pub async fn product_count(&self) -> usize {
        self.state.read().await.products.len()
    }

    pub async fn review_count(&self) -> usize {
        self.state.read().await.reviews.len()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>> {
        let state = self.state.read().await;
        Ok(state
            .categories
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let mut categories = self.state.read().await.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.created_at.cmp(&b.created_at)));
        Ok(categories)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn cart_items(&self, user_id: Uuid) -> Result<Vec<CartItem>> {
        let state = self.state.read().await;
        Ok(state
            .cart
            .iter()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let mut state = self.state.write().await;
        let now = state.tick();
        let created = Product {
            id: Uuid::new_v4(),
            name: product.name,
            description: product.description,
            image: product.image,
            category_id: product.category_id,
            quantity: product.quantity,
            price: product.price,
            status: product.status,
            created_at: now,
            updated_at: now,
        };
        state.products.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: ProductUpdate) -> Result<Option<Product>> {
        let mut state = self.state.write().await;
        let now = state.tick();
        let Some(product) = state.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        product.name = changes.name;
        product.description = changes.description;
        product.image = changes.image;
        product.category_id = changes.category_id;
        if let Some(quantity) = changes.quantity {
            product.quantity = quantity;
        }
        product.price = changes.price;
        product.status = changes.status;
        product.updated_at = now;

        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Product>> {
        let mut state = self.state.write().await;
        let Some(index) = state.products.iter().position(|p| p.id == id) else {
            return Ok(None);
        };
        state.reviews.retain(|r| r.product_id != id);
        Ok(Some(state.products.remove(index)))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn find_public(&self, id: Uuid) -> Result<Option<Product>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .iter()
            .find(|p| p.id == id && p.status == ProductStatus::Public)
            .cloned())
    }

    async fn list_public(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let state = self.state.read().await;
        let mut products: Vec<Product> = state
            .products
            .iter()
            .filter(|p| p.status == ProductStatus::Public)
            .filter(|p| filter.category_id.is_none_or(|id| p.category_id == id))
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn add_review(&self, review: NewReview) -> Result<Review> {
        let mut state = self.state.write().await;
        let created = Review {
            id: Uuid::new_v4(),
            product_id: review.product_id,
            user_id: review.user_id,
            order_id: review.order_id,
            rating: review.rating,
            comment: review.comment,
            created_at: state.tick(),
        };
        state.reviews.push(created.clone());
        Ok(created)
    }

    async fn reviews_for(&self, product_ids: &[Uuid]) -> Result<Vec<Review>> {
        let state = self.state.read().await;
        Ok(state
            .reviews
            .iter()
            .filter(|r| product_ids.contains(&r.product_id))
            .cloned()
            .collect())
    }
}
