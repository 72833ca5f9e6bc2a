use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::models::Category;
use crate::features::categories::repositories::CategoryRepository;
use crate::features::products::dtos::{
    CreateReviewDto, ProductInputDto, ProductResponseDto, ReviewResponseDto,
};
use crate::features::products::models::{
    NewProduct, NewReview, Product, ProductFilter, ProductStatus, ProductUpdate, Review,
};
use crate::features::products::repositories::ProductRepository;
use crate::features::users::repositories::UserRepository;
use crate::shared::validation::{compile_search_pattern, first_message};

/// Decimal places kept for prices, matching the `products.price` column
const PRICE_SCALE: u32 = 2;

/// Largest price the `NUMERIC(12, 2)` column holds, 9999999999.99
const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Product input that passed every catalog rule
struct ValidProductInput {
    name: String,
    description: String,
    image: String,
    category: Category,
    quantity: Option<i32>,
    price: Decimal,
    status: ProductStatus,
}

/// Service for product catalog operations
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
    users: Arc<dyn UserRepository>,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            products,
            categories,
            users,
        }
    }

    /// Create a product
    pub async fn create(&self, dto: ProductInputDto) -> Result<ProductResponseDto> {
        let input = self.validate_input(dto, true).await?;

        let product = self
            .products
            .insert(NewProduct {
                name: input.name,
                description: input.description,
                image: input.image,
                category_id: input.category.id,
                quantity: input.quantity.unwrap_or_default(),
                price: input.price,
                status: input.status,
            })
            .await?;

        Ok(ProductResponseDto::new(
            product,
            Some(CategoryResponseDto::from(input.category)),
            Vec::new(),
        ))
    }

    /// Replace a product's fields; an omitted quantity keeps the stored one
    pub async fn update(&self, id: Uuid, dto: ProductInputDto) -> Result<ProductResponseDto> {
        let input = self.validate_input(dto, false).await?;

        let product = self
            .products
            .update(
                id,
                ProductUpdate {
                    name: input.name,
                    description: input.description,
                    image: input.image,
                    category_id: input.category.id,
                    quantity: input.quantity,
                    price: input.price,
                    status: input.status,
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        self.populate_one(product).await
    }

    /// Delete a product, returning it as it was; `None` when nothing was deleted
    pub async fn delete(&self, id: Uuid) -> Result<Option<ProductResponseDto>> {
        // reviews go with the product, read them first
        let reviews = self.products.reviews_for(&[id]).await?;

        match self.products.delete(id).await? {
            Some(product) => {
                let mut populated = self.assemble(vec![product], reviews).await?;
                Ok(populated.pop())
            }
            None => Ok(None),
        }
    }

    /// A PUBLIC product; `None` when missing or private
    pub async fn get_public(&self, id: Uuid) -> Result<Option<ProductResponseDto>> {
        match self.products.find_public(id).await? {
            Some(product) => self.populate_one(product).await.map(Some),
            None => Ok(None),
        }
    }

    /// PUBLIC products, newest first, optionally filtered by a name pattern.
    ///
    /// The pattern is matched here with `regex` rather than in SQL, so the
    /// accepted syntax and its meaning are the same in every store.
    pub async fn list_public(&self, search: Option<&str>) -> Result<Vec<ProductResponseDto>> {
        let pattern = compile_search_pattern(search)?;

        let mut products = self.products.list_public(&ProductFilter::default()).await?;
        if let Some(regex) = &pattern {
            products.retain(|product| regex.is_match(&product.name));
        }
        self.populate(products).await
    }

    /// PUBLIC products of one category, newest first
    pub async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<ProductResponseDto>> {
        let products = self
            .products
            .list_public(&ProductFilter::by_category(category_id))
            .await?;
        self.populate(products).await
    }

    /// Append a review by `user_id` to a product.
    ///
    /// An invalid comment or rating is reported as a validation error, but the
    /// review is stored all the same as long as the product exists.
    pub async fn add_review(
        &self,
        product_id: Uuid,
        user_id: Uuid,
        dto: CreateReviewDto,
    ) -> Result<ProductResponseDto> {
        let dto = dto.trimmed();
        let rejection = dto
            .validate()
            .err()
            .and_then(|errors| first_message(&errors, &["comment", "rating"]));

        let Some(product) = self.products.find_by_id(product_id).await? else {
            return Err(match rejection {
                Some(message) => AppError::Validation(message),
                None => AppError::NotFound("Product not found".to_string()),
            });
        };

        self.products
            .add_review(NewReview {
                product_id,
                user_id,
                order_id: dto.order,
                rating: dto.rating,
                comment: dto.comment,
            })
            .await?;

        if let Some(message) = rejection {
            tracing::warn!(
                "Review stored for product {} despite failed validation: {}",
                product_id,
                message
            );
            return Err(AppError::Validation(message));
        }

        self.populate_one(product).await
    }

    /// Attach categories and reviews (with author names) to products, keeping order
    pub async fn populate(&self, products: Vec<Product>) -> Result<Vec<ProductResponseDto>> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
        let reviews = self.products.reviews_for(&ids).await?;
        self.assemble(products, reviews).await
    }

    async fn populate_one(&self, product: Product) -> Result<ProductResponseDto> {
        self.populate(vec![product])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("Populated product went missing".to_string()))
    }

    async fn assemble(
        &self,
        products: Vec<Product>,
        reviews: Vec<Review>,
    ) -> Result<Vec<ProductResponseDto>> {
        let category_ids: Vec<Uuid> = products
            .iter()
            .map(|p| p.category_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let categories: HashMap<Uuid, Category> = self
            .categories
            .find_by_ids(&category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let author_ids: Vec<Uuid> = reviews
            .iter()
            .map(|r| r.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let authors: HashMap<Uuid, String> = if author_ids.is_empty() {
            HashMap::new()
        } else {
            self.users
                .find_by_ids(&author_ids)
                .await?
                .into_iter()
                .map(|u| (u.id, u.name))
                .collect()
        };

        let mut reviews_by_product: HashMap<Uuid, Vec<ReviewResponseDto>> = HashMap::new();
        for review in reviews {
            let author = authors.get(&review.user_id).cloned();
            reviews_by_product
                .entry(review.product_id)
                .or_default()
                .push(ReviewResponseDto::new(review, author));
        }

        Ok(products
            .into_iter()
            .map(|product| {
                let category = categories.get(&product.category_id).map(CategoryResponseDto::from);
                let reviews = reviews_by_product.remove(&product.id).unwrap_or_default();
                ProductResponseDto::new(product, category, reviews)
            })
            .collect())
    }

    async fn validate_input(
        &self,
        dto: ProductInputDto,
        require_quantity: bool,
    ) -> Result<ValidProductInput> {
        let dto = dto.trimmed();

        if let Err(errors) = dto.validate() {
            if let Some(message) = first_message(&errors, &["name", "description", "image"]) {
                return Err(AppError::Validation(message));
            }
        }

        let category_id = dto
            .category
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok());
        let category = match category_id {
            Some(id) => self.categories.find_by_id(id).await?,
            None => None,
        }
        .ok_or_else(|| AppError::Validation("Category not found!".to_string()))?;

        if require_quantity && dto.quantity.unwrap_or_default() == 0 {
            return Err(AppError::Validation("Quantity shouldn't be 0!".to_string()));
        }

        // stored with two decimals, so round before judging it
        let price = dto
            .price
            .unwrap_or_default()
            .round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
        if price.is_zero() {
            return Err(AppError::Validation("Price shouldn't be 0!".to_string()));
        }
        if price.is_sign_negative() {
            return Err(AppError::Validation(
                "Price should be greater than 0!".to_string(),
            ));
        }
        if price > MAX_PRICE {
            return Err(AppError::Validation(format!(
                "Price shouldn't exceed {}!",
                MAX_PRICE
            )));
        }

        let status = dto
            .status
            .as_deref()
            .and_then(|s| s.parse::<ProductStatus>().ok())
            .ok_or_else(|| {
                AppError::Validation("Status should either be PRIVATE or PUBLIC!".to_string())
            })?;

        Ok(ValidProductInput {
            name: dto.name,
            description: dto.description,
            image: dto.image,
            category,
            quantity: dto.quantity,
            price,
            status,
        })
    }
}
