//! Bearer token authentication for the catalog API.
//!
//! Tokens are HS256 JWTs issued by the storefront's session service. The `sub`
//! claim is the user id; `roles` grants admin access to catalog mutations.

mod validator;

pub mod guards;
pub mod model;

pub use validator::JwtValidator;
