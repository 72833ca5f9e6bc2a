//! Users and carts, owned by the storefront's account service.
//!
//! The catalog only reads them: review authors are resolved to display names
//! and the cart drives product recommendations. There are no endpoints here.

pub mod models;
pub mod repositories;

pub use repositories::{PgUserRepository, UserRepository};
