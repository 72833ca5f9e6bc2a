//! Product categories (read-only from the catalog's point of view).
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/categories` | No | List categories |
//! | GET | `/api/categories/{id}` | No | Get one category |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{CategoryRepository, PgCategoryRepository};
pub use services::CategoryService;
