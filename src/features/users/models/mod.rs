mod user;

pub use user::{CartItem, User};
