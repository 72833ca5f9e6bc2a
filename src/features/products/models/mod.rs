mod product;
mod review;

pub use product::{NewProduct, Product, ProductFilter, ProductStatus, ProductUpdate};
pub use review::{NewReview, Review};
