//! Product catalog: administration, public browsing, reviews and
//! cart-based recommendations.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/products` | Admin | Create a product |
//! | PATCH | `/api/products/{id}` | Admin | Replace a product's fields |
//! | DELETE | `/api/products/{id}` | Admin | Delete a product |
//! | GET | `/api/products` | No | List public products (`?search=` regex on name) |
//! | GET | `/api/products/{id}` | No | Get a public product |
//! | GET | `/api/categories/{id}/products` | No | List public products of a category |
//! | GET | `/api/products/recommended` | User | Recommendations from the caller's cart |
//! | POST | `/api/products/{id}/reviews` | User | Review a product |

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use clients::{BasketRecommender, HttpBasketRecommender};
pub use repositories::{PgProductRepository, ProductRepository};
pub use services::{ProductService, RecommendationService};
